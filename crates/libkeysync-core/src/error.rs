use serde::Serialize;
use thiserror::Error;

use crate::item::MaterialKind;

/// Boxed collaborator error carried as the `source` of a contextual keysync error
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// One failed entry of a batch operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    /// Key name or host reference that failed
    pub name: String,
    /// Rendered error message
    pub message: String,
}

impl std::fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

fn join_failures(failures: &[BatchFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Main error type for keysync operations
#[derive(Debug, Error)]
pub enum KeysyncError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Config(String),

    #[error("invalid key reference {0:?} (expected key.subkey)")]
    InvalidReference(String),

    #[error("key {0:?} not found")]
    KeyNotFound(String),

    #[error("subkey {subkey:?} not found under key {key:?}")]
    SubkeyNotFound { key: String, subkey: String },

    #[error("host {0:?} not found")]
    HostNotFound(String),

    #[error("{0}")]
    AuthenticationRequired(String),

    #[error("cannot reach 1Password CLI: {source}")]
    StoreUnavailable {
        #[source]
        source: BoxError,
    },

    #[error("1Password item {title:?} not found in vault {vault:?}")]
    ItemNotFound { title: String, vault: String },

    #[error("1Password item {0:?} is missing public_key or secret_key fields")]
    IncompleteItem(String),

    #[error("1Password item {0:?} is missing hash fields; use --force to skip verification")]
    MissingDigest(String),

    #[error("sha256 mismatch on {side} for {title:?} (stored: {stored}, actual: {actual})")]
    DigestMismatch {
        title: String,
        side: MaterialKind,
        stored: String,
        actual: String,
    },

    #[error("failed to export {what} for {target}: {source}")]
    ExportFailed {
        what: &'static str,
        target: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to read key metadata for {target}: {source}")]
    MetadataFailed {
        target: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to {action} 1Password item {title:?}: {source}")]
    StoreFailed {
        action: &'static str,
        title: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to import {step} for {title:?}{}: {source}", completed_note(.completed))]
    ImportFailed {
        title: String,
        step: MaterialKind,
        completed: Option<MaterialKind>,
        #[source]
        source: BoxError,
    },

    #[error("failed to delete existing key {fingerprint:?}: {source}")]
    DeleteFailed {
        fingerprint: String,
        #[source]
        source: BoxError,
    },

    #[error("{operation} failures: {}", join_failures(.failures))]
    AggregateFailure {
        operation: &'static str,
        failures: Vec<BatchFailure>,
    },

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
}

fn completed_note(completed: &Option<MaterialKind>) -> String {
    match completed {
        Some(step) => format!(" ({} already imported, keyring left partial)", step),
        None => String::new(),
    }
}

impl KeysyncError {
    /// Get the error code for JSON output
    pub fn error_code(&self) -> &'static str {
        match self {
            KeysyncError::InvalidArgs(_) => "invalid_args",
            KeysyncError::Config(_) => "invalid_config",
            KeysyncError::InvalidReference(_) => "invalid_reference",
            KeysyncError::KeyNotFound(_) => "key_not_found",
            KeysyncError::SubkeyNotFound { .. } => "subkey_not_found",
            KeysyncError::HostNotFound(_) => "host_not_found",
            KeysyncError::AuthenticationRequired(_) => "authentication_required",
            KeysyncError::StoreUnavailable { .. } => "store_unavailable",
            KeysyncError::ItemNotFound { .. } => "item_not_found",
            KeysyncError::IncompleteItem(_) => "incomplete_item",
            KeysyncError::MissingDigest(_) => "missing_digest",
            KeysyncError::DigestMismatch { .. } => "digest_mismatch",
            KeysyncError::ExportFailed { .. } => "export_failed",
            KeysyncError::MetadataFailed { .. } => "metadata_failed",
            KeysyncError::StoreFailed { .. } => "store_failed",
            KeysyncError::ImportFailed { .. } => "import_failed",
            KeysyncError::DeleteFailed { .. } => "delete_failed",
            KeysyncError::AggregateFailure { .. } => "aggregate_failure",
            KeysyncError::Yaml(_) => "invalid_config",
            KeysyncError::TomlParse(_) => "invalid_config",
        }
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            KeysyncError::InvalidArgs(_)
            | KeysyncError::Config(_)
            | KeysyncError::InvalidReference(_)
            | KeysyncError::KeyNotFound(_)
            | KeysyncError::SubkeyNotFound { .. }
            | KeysyncError::HostNotFound(_)
            | KeysyncError::Yaml(_)
            | KeysyncError::TomlParse(_) => 2,
            _ => 1,
        }
    }

    /// Get actionable suggestions for fixing the error
    pub fn suggestions(&self) -> Vec<&'static str> {
        match self {
            KeysyncError::AuthenticationRequired(_) => vec![
                "Sign in with 'eval $(op signin)'",
                "Or enable 1Password desktop app integration for the CLI",
            ],
            KeysyncError::StoreUnavailable { .. } => vec![
                "Check that the 1Password CLI is installed and on PATH",
                "Or point --op at the op binary",
            ],
            KeysyncError::KeyNotFound(_)
            | KeysyncError::SubkeyNotFound { .. }
            | KeysyncError::HostNotFound(_)
            | KeysyncError::InvalidReference(_) => {
                vec!["Run 'keysync check' to list configured hosts and references"]
            }
            KeysyncError::ItemNotFound { .. } => {
                vec!["Run 'keysync sync' or 'keysync backup' to create the item first"]
            }
            KeysyncError::MissingDigest(_) => vec![
                "Re-run with --force to skip hash verification",
                "Or re-run sync/backup to store fresh hashes",
            ],
            KeysyncError::DigestMismatch { .. } => vec![
                "The stored item may have been edited outside keysync",
                "Re-run with --force to restore without verification",
            ],
            KeysyncError::ImportFailed { completed: Some(_), .. } => vec![
                "The keyring now holds a public-only key; re-run restore with --force",
            ],
            KeysyncError::AggregateFailure { .. } => {
                vec!["Fix the failed entries listed above and re-run; unchanged entries are skipped"]
            }
            _ => vec![],
        }
    }

    /// Names of failed entries when this is an aggregate batch failure
    pub fn failures(&self) -> &[BatchFailure] {
        match self {
            KeysyncError::AggregateFailure { failures, .. } => failures,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_message_lists_every_failure() {
        let err = KeysyncError::AggregateFailure {
            operation: "backup",
            failures: vec![
                BatchFailure {
                    name: "alpha".to_string(),
                    message: "boom".to_string(),
                },
                BatchFailure {
                    name: "gamma".to_string(),
                    message: "bang".to_string(),
                },
            ],
        };
        assert_eq!(err.to_string(), "backup failures: alpha: boom; gamma: bang");
        assert_eq!(err.failures().len(), 2);
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_import_failed_names_completed_step() {
        let err = KeysyncError::ImportFailed {
            title: "Laptop/ssh".to_string(),
            step: MaterialKind::Secret,
            completed: Some(MaterialKind::Public),
            source: "gpg --import failed".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("secret_key"));
        assert!(msg.contains("public_key already imported"));
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn test_resolution_errors_are_usage_errors() {
        assert_eq!(KeysyncError::KeyNotFound("x".into()).exit_code(), 2);
        assert_eq!(KeysyncError::HostNotFound("x".into()).exit_code(), 2);
        assert_eq!(
            KeysyncError::IncompleteItem("x".into()).error_code(),
            "incomplete_item"
        );
    }
}
