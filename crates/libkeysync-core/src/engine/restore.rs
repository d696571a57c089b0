//! Restore items from the secret store into the local keyring.
//!
//! Each item runs fetch, validate, verify, dry-run, delete, import in that
//! order, stopping at the first failing state.

use tracing::{debug, info};

use super::Reconciler;
use crate::backend::{Keyring, SecretStore};
use crate::digest::digest;
use crate::error::KeysyncError;
use crate::item::{labels, MaterialKind, RemoteItem};
use crate::report::Outcome;

/// Restore behaviour switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreOptions {
    /// Stop after verification and report what would be restored
    pub dry_run: bool,
    /// Skip verification and delete existing local material before import
    pub force: bool,
    /// Compare stored digests against the fetched material
    pub verify_hash: bool,
}

impl Default for RestoreOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            force: false,
            verify_hash: true,
        }
    }
}

impl<'a, K: Keyring, S: SecretStore> Reconciler<'a, K, S> {
    /// Restore one top-level key backup
    pub fn restore_one(
        &self,
        key_name: &str,
        opts: RestoreOptions,
    ) -> Result<Outcome, KeysyncError> {
        let key = self.config.key(key_name)?;
        self.authenticate()?;
        self.restore_item(&key.title, &key.fingerprint, opts)
    }

    /// Restore every reference of a host in configured order, stopping at the first failure
    pub fn restore_host(
        &self,
        host_name: &str,
        opts: RestoreOptions,
    ) -> Result<Vec<Outcome>, KeysyncError> {
        let refs = self.config.resolve_host(host_name)?;
        self.authenticate()?;

        let mut outcomes = Vec::with_capacity(refs.len());
        for resolved in &refs {
            outcomes.push(self.restore_item(&resolved.item_title, &resolved.fingerprint, opts)?);
        }
        Ok(outcomes)
    }

    fn restore_item(
        &self,
        title: &str,
        fingerprint: &str,
        opts: RestoreOptions,
    ) -> Result<Outcome, KeysyncError> {
        let vault = &self.config.vault;

        let item = self
            .store
            .get_item(title, vault)
            .map_err(|e| KeysyncError::StoreFailed {
                action: "fetch",
                title: title.to_string(),
                source: Box::new(e),
            })?
            .ok_or_else(|| KeysyncError::ItemNotFound {
                title: title.to_string(),
                vault: vault.clone(),
            })?;

        let (public_key, secret_key) = match (
            item.field_value(labels::PUBLIC_KEY),
            item.field_value(labels::SECRET_KEY),
        ) {
            (Some(public), Some(secret)) => (public, secret),
            _ => return Err(KeysyncError::IncompleteItem(title.to_string())),
        };

        if opts.verify_hash && !opts.force {
            verify_item_digests(&item)?;
            debug!(title, "stored digests verified");
        }

        if opts.dry_run {
            return Ok(self.emit(Outcome::WouldRestore {
                title: title.to_string(),
            }));
        }

        if opts.force {
            debug!(title, fingerprint, "deleting existing local key");
            self.keyring
                .delete_keypair(fingerprint)
                .map_err(|e| KeysyncError::DeleteFailed {
                    fingerprint: fingerprint.to_string(),
                    source: Box::new(e),
                })?;
        }

        self.keyring
            .import(public_key.as_bytes())
            .map_err(|e| KeysyncError::ImportFailed {
                title: title.to_string(),
                step: MaterialKind::Public,
                completed: None,
                source: Box::new(e),
            })?;

        // No rollback: a failure here leaves the public key imported.
        self.keyring
            .import(secret_key.as_bytes())
            .map_err(|e| KeysyncError::ImportFailed {
                title: title.to_string(),
                step: MaterialKind::Secret,
                completed: Some(MaterialKind::Public),
                source: Box::new(e),
            })?;

        info!(title, fingerprint, "restored into keyring");
        Ok(self.emit(Outcome::Restored {
            title: title.to_string(),
        }))
    }
}

/// Check both stored digests of `item` against its own key material.
///
/// Both digest fields must be present; a mismatch names the side plus the
/// stored and actual values.
pub fn verify_item_digests(item: &RemoteItem) -> Result<(), KeysyncError> {
    const SIDES: [MaterialKind; 2] = [MaterialKind::Public, MaterialKind::Secret];

    let stored: Vec<&str> = SIDES
        .iter()
        .map(|side| item.field_value(side.digest_label()))
        .collect::<Option<_>>()
        .ok_or_else(|| KeysyncError::MissingDigest(item.title.clone()))?;

    for (side, stored) in SIDES.into_iter().zip(stored) {
        let material = item
            .field_value(side.label())
            .ok_or_else(|| KeysyncError::IncompleteItem(item.title.clone()))?;
        let actual = digest(material.as_bytes());
        if actual != stored {
            return Err(KeysyncError::DigestMismatch {
                title: item.title.clone(),
                side,
                stored: stored.to_string(),
                actual,
            });
        }
    }

    Ok(())
}
