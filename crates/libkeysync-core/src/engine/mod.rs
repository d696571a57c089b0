//! Reconciliation engine.
//!
//! A [`Reconciler`] binds the read-only config to a keyring, a secret store,
//! and a reporter. Backup and sync push local material to the store when its
//! digests changed; restore pulls items back into the keyring.

mod backup;
mod restore;
mod sync;

pub use restore::{verify_item_digests, RestoreOptions};

use tracing::{debug, info, warn};

use crate::backend::{Keyring, SecretStore};
use crate::config::Config;
use crate::digest::digest;
use crate::error::{BatchFailure, KeysyncError};
use crate::item::{ItemFields, KeyMetadata};
use crate::report::{Outcome, Reporter};

/// Drives backup, sync, and restore against one config
pub struct Reconciler<'a, K, S> {
    config: &'a Config,
    keyring: K,
    store: S,
    reporter: &'a dyn Reporter,
}

/// Exported key material bound for one item
struct Export<'m> {
    title: &'m str,
    fingerprint: &'m str,
    public: Vec<u8>,
    secret: Vec<u8>,
    metadata: KeyMetadata,
}

impl<'a, K: Keyring, S: SecretStore> Reconciler<'a, K, S> {
    pub fn new(config: &'a Config, keyring: K, store: S, reporter: &'a dyn Reporter) -> Self {
        Self {
            config,
            keyring,
            store,
            reporter,
        }
    }

    /// Session pre-flight. Runs at the start of every top-level operation.
    fn authenticate(&self) -> Result<(), KeysyncError> {
        debug!("checking secret-store session");
        self.store.ensure_authenticated().map_err(|e| {
            if self.store.is_sign_in_error(&e) {
                KeysyncError::AuthenticationRequired(e.to_string())
            } else {
                KeysyncError::StoreUnavailable {
                    source: Box::new(e),
                }
            }
        })
    }

    fn emit(&self, outcome: Outcome) -> Outcome {
        self.reporter.report(&outcome);
        outcome
    }

    /// Create, update, or skip the item for `export`.
    ///
    /// Only the two digests decide "unchanged"; metadata differences never force a write.
    fn push_item(&self, export: Export<'_>) -> Result<Outcome, KeysyncError> {
        let title = export.title;
        let vault = &self.config.vault;
        let sha256_public = digest(&export.public);
        let sha256_secret = digest(&export.secret);

        let existing = self
            .store
            .get_item(title, vault)
            .map_err(|e| KeysyncError::StoreFailed {
                action: "check",
                title: title.to_string(),
                source: Box::new(e),
            })?;

        if let Some(item) = &existing {
            if item.digests_match(&sha256_public, &sha256_secret) {
                debug!(title, "stored digests match local material");
                return Ok(self.emit(Outcome::Unchanged {
                    title: title.to_string(),
                }));
            }
        }

        let fields = ItemFields {
            fingerprint: export.fingerprint.to_string(),
            metadata: export.metadata,
            public_key: String::from_utf8_lossy(&export.public).into_owned(),
            secret_key: String::from_utf8_lossy(&export.secret).into_owned(),
            sha256_public,
            sha256_secret,
            synced_at: None,
        };

        let outcome = if existing.is_some() {
            self.store
                .edit_item(title, vault, &fields)
                .map_err(|e| KeysyncError::StoreFailed {
                    action: "update",
                    title: title.to_string(),
                    source: Box::new(e),
                })?;
            Outcome::Updated {
                title: title.to_string(),
            }
        } else {
            self.store
                .create_item(title, vault, &fields)
                .map_err(|e| KeysyncError::StoreFailed {
                    action: "create",
                    title: title.to_string(),
                    source: Box::new(e),
                })?;
            Outcome::Created {
                title: title.to_string(),
            }
        };

        info!(title, vault = %vault, outcome = ?outcome, "item written");
        Ok(self.emit(outcome))
    }

    /// Run `step` for every name, continuing past failures.
    ///
    /// Each failure is reported as it happens; the call fails with
    /// [`KeysyncError::AggregateFailure`] if any entry failed.
    fn run_batch<F>(
        &self,
        operation: &'static str,
        names: Vec<String>,
        mut step: F,
    ) -> Result<Vec<Outcome>, KeysyncError>
    where
        F: FnMut(&str) -> Result<Outcome, KeysyncError>,
    {
        let mut outcomes = Vec::with_capacity(names.len());
        let mut failures = Vec::new();

        for name in names {
            match step(&name) {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    let message = e.to_string();
                    warn!(operation, name = %name, error = %message, "batch entry failed");
                    outcomes.push(self.emit(Outcome::Failed {
                        name: name.clone(),
                        message: message.clone(),
                    }));
                    failures.push(BatchFailure { name, message });
                }
            }
        }

        if failures.is_empty() {
            Ok(outcomes)
        } else {
            Err(KeysyncError::AggregateFailure {
                operation,
                failures,
            })
        }
    }
}
