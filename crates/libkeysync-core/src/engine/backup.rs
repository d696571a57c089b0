//! Full backups of top-level keys.

use tracing::debug;

use super::{Export, Reconciler};
use crate::backend::{Keyring, SecretStore};
use crate::config::Key;
use crate::error::KeysyncError;
use crate::report::Outcome;

impl<'a, K: Keyring, S: SecretStore> Reconciler<'a, K, S> {
    /// Back up one top-level key under its title
    pub fn backup_one(&self, key_name: &str) -> Result<Outcome, KeysyncError> {
        let key = self.config.key(key_name)?;
        self.authenticate()?;
        self.backup_key(key_name, key)
    }

    /// Back up every key in sorted name order, continuing past failures
    pub fn backup_all(&self) -> Result<Vec<Outcome>, KeysyncError> {
        self.authenticate()?;
        self.run_batch("backup", self.config.all_key_names(), |name| {
            let key = self.config.key(name)?;
            self.backup_key(name, key)
        })
    }

    fn backup_key(&self, key_name: &str, key: &Key) -> Result<Outcome, KeysyncError> {
        debug!(key = key_name, fingerprint = %key.fingerprint, "exporting full key");

        let public = self
            .keyring
            .export_public(&key.fingerprint)
            .map_err(|e| KeysyncError::ExportFailed {
                what: "public key",
                target: key_name.to_string(),
                source: Box::new(e),
            })?;

        let secret = self
            .keyring
            .export_secret(&key.fingerprint)
            .map_err(|e| KeysyncError::ExportFailed {
                what: "secret key",
                target: key_name.to_string(),
                source: Box::new(e),
            })?;

        let metadata = self
            .keyring
            .read_metadata(&key.fingerprint)
            .map_err(|e| KeysyncError::MetadataFailed {
                target: key_name.to_string(),
                source: Box::new(e),
            })?;

        self.push_item(Export {
            title: &key.title,
            fingerprint: &key.fingerprint,
            public,
            secret,
            metadata,
        })
    }
}
