//! Remote item model: field labels, the written field set, and the read-only item view.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Field labels written to and read from secret-store items
pub mod labels {
    pub const FINGERPRINT: &str = "fingerprint";
    pub const ALGORITHM: &str = "algorithm";
    pub const CAPABILITIES: &str = "capabilities";
    pub const UID: &str = "uid";
    pub const CREATED: &str = "created";
    pub const EXPIRES: &str = "expires";
    pub const PUBLIC_KEY: &str = "public_key";
    pub const SECRET_KEY: &str = "secret_key";
    pub const SHA256_PUBLIC: &str = "sha256_public";
    pub const SHA256_SECRET: &str = "sha256_secret";
    pub const SYNCED_AT: &str = "synced_at";
}

/// Which half of a keypair a blob or field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    Public,
    Secret,
}

impl MaterialKind {
    /// Label of the field holding this material
    pub fn label(&self) -> &'static str {
        match self {
            MaterialKind::Public => labels::PUBLIC_KEY,
            MaterialKind::Secret => labels::SECRET_KEY,
        }
    }

    /// Label of the field holding this material's digest
    pub fn digest_label(&self) -> &'static str {
        match self {
            MaterialKind::Public => labels::SHA256_PUBLIC,
            MaterialKind::Secret => labels::SHA256_SECRET,
        }
    }
}

impl std::fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Key metadata read from the local keyring for one fingerprint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMetadata {
    pub algorithm: String,
    pub capabilities: String,
    pub uid: String,
    pub created: String,
    /// Expiry timestamp, or [`KeyMetadata::NEVER_EXPIRES`]
    pub expires: String,
}

impl KeyMetadata {
    pub const NEVER_EXPIRES: &'static str = "never";
}

/// How the secret store should protect a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Concealed,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Concealed => "concealed",
        }
    }
}

/// One labelled value in a write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    pub label: &'static str,
    pub kind: FieldKind,
    pub value: String,
}

/// The full field set written on every create and edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFields {
    pub fingerprint: String,
    pub metadata: KeyMetadata,
    pub public_key: String,
    pub secret_key: String,
    pub sha256_public: String,
    pub sha256_secret: String,
    /// Captured at write time when unset
    pub synced_at: Option<DateTime<Utc>>,
}

impl ItemFields {
    /// Render the field set in write order. `secret_key` is the only concealed field.
    pub fn entries(&self) -> Vec<FieldEntry> {
        let synced_at = self
            .synced_at
            .unwrap_or_else(Utc::now)
            .to_rfc3339_opts(SecondsFormat::Secs, true);

        let text = |label, value: &str| FieldEntry {
            label,
            kind: FieldKind::Text,
            value: value.to_string(),
        };

        vec![
            text(labels::FINGERPRINT, &self.fingerprint),
            text(labels::ALGORITHM, &self.metadata.algorithm),
            text(labels::CAPABILITIES, &self.metadata.capabilities),
            text(labels::UID, &self.metadata.uid),
            text(labels::CREATED, &self.metadata.created),
            text(labels::EXPIRES, &self.metadata.expires),
            text(labels::PUBLIC_KEY, &self.public_key),
            FieldEntry {
                label: labels::SECRET_KEY,
                kind: FieldKind::Concealed,
                value: self.secret_key.clone(),
            },
            text(labels::SHA256_PUBLIC, &self.sha256_public),
            text(labels::SHA256_SECRET, &self.sha256_secret),
            text(labels::SYNCED_AT, &synced_at),
        ]
    }
}

/// A labelled value read back from the secret store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemField {
    pub label: String,
    pub value: String,
}

/// Read-only view of a secret-store item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteItem {
    pub title: String,
    pub vault: String,
    pub fields: Vec<ItemField>,
}

impl RemoteItem {
    /// Value of the first field with `label`, treating an empty value as absent
    pub fn field_value(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
            .filter(|v| !v.is_empty())
    }

    /// Whether both stored digests equal the given ones
    pub fn digests_match(&self, sha256_public: &str, sha256_secret: &str) -> bool {
        self.field_value(labels::SHA256_PUBLIC) == Some(sha256_public)
            && self.field_value(labels::SHA256_SECRET) == Some(sha256_secret)
    }
}
