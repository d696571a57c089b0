//! Core library for keysync
//!
//! Resolves configured key references, fingerprints exported material with
//! SHA-256, and reconciles the local keyring against a remote secret store:
//! - backup: whole top-level keys
//! - sync: host-scoped subkeys (parent public key + one subkey's secret)
//! - restore: verified import of either shape back into the keyring

pub mod backend;
pub mod config;
pub mod digest;
pub mod engine;
pub mod error;
pub mod item;
pub mod report;
pub mod resolve;

pub use backend::{Keyring, SecretStore};
pub use config::{Config, Host, Key, Subkey};
pub use digest::digest;
pub use engine::{Reconciler, RestoreOptions};
pub use error::{BatchFailure, BoxError, KeysyncError};
pub use item::{ItemField, ItemFields, KeyMetadata, MaterialKind, RemoteItem};
pub use report::{CollectingReporter, NullReporter, Outcome, Reporter};
pub use resolve::ResolvedRef;
