//! Host-scoped subkey sync.
//!
//! Items carry the parent's full public key and the target subkey's secret
//! material only; sibling subkeys' secrets never leave the keyring.

use tracing::debug;

use super::{Export, Reconciler};
use crate::backend::{Keyring, SecretStore};
use crate::error::KeysyncError;
use crate::report::Outcome;
use crate::resolve::ResolvedRef;

impl<'a, K: Keyring, S: SecretStore> Reconciler<'a, K, S> {
    /// Sync one `key.subkey` reference
    pub fn sync_ref(&self, reference: &str) -> Result<Outcome, KeysyncError> {
        let resolved = self.config.resolve_ref(reference)?;
        self.authenticate()?;
        self.sync_resolved(&resolved)
    }

    /// Sync every reference of a host in configured order, stopping at the first failure
    pub fn sync_host(&self, host_name: &str) -> Result<Vec<Outcome>, KeysyncError> {
        let refs = self.config.resolve_host(host_name)?;
        self.authenticate()?;

        let mut outcomes = Vec::with_capacity(refs.len());
        for resolved in &refs {
            outcomes.push(self.sync_resolved(resolved)?);
        }
        Ok(outcomes)
    }

    /// Sync each unique reference across all hosts once, in sorted order,
    /// continuing past failures
    pub fn sync_all(&self) -> Result<Vec<Outcome>, KeysyncError> {
        self.authenticate()?;
        self.run_batch("sync", self.config.all_host_refs(), |reference| {
            let resolved = self.config.resolve_ref(reference)?;
            self.sync_resolved(&resolved)
        })
    }

    fn sync_resolved(&self, resolved: &ResolvedRef) -> Result<Outcome, KeysyncError> {
        let reference = resolved.reference();
        debug!(
            reference = %reference,
            parent = %resolved.parent_fingerprint,
            subkey = %resolved.fingerprint,
            "exporting subkey"
        );

        let public = self
            .keyring
            .export_public(&resolved.parent_fingerprint)
            .map_err(|e| KeysyncError::ExportFailed {
                what: "public key",
                target: reference.clone(),
                source: Box::new(e),
            })?;

        let secret = self
            .keyring
            .export_secret_subkey(&resolved.fingerprint)
            .map_err(|e| KeysyncError::ExportFailed {
                what: "secret subkey",
                target: reference.clone(),
                source: Box::new(e),
            })?;

        // Algorithm and capabilities come from the parent key, not the subkey.
        let metadata = self
            .keyring
            .read_metadata(&resolved.parent_fingerprint)
            .map_err(|e| KeysyncError::MetadataFailed {
                target: reference.clone(),
                source: Box::new(e),
            })?;

        self.push_item(Export {
            title: &resolved.item_title,
            fingerprint: &resolved.fingerprint,
            public,
            secret,
            metadata,
        })
    }
}
