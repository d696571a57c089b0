//! Reference resolution: `key.subkey` strings to concrete fingerprints and item titles.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::{Config, Host, Key};
use crate::error::KeysyncError;

/// Separator between key and subkey names in a host reference
pub const REF_SEPARATOR: char = '.';

/// A fully resolved `key.subkey` reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRef {
    pub key_name: String,
    pub subkey_name: String,
    /// Subkey fingerprint
    pub fingerprint: String,
    /// Fingerprint of the owning top-level key
    pub parent_fingerprint: String,
    /// `"<key title>/<subkey name>"`
    pub item_title: String,
}

impl ResolvedRef {
    /// Canonical `key.subkey` form of this reference
    pub fn reference(&self) -> String {
        format!("{}{}{}", self.key_name, REF_SEPARATOR, self.subkey_name)
    }
}

impl Config {
    /// Resolve a `key.subkey` reference
    pub fn resolve_ref(&self, reference: &str) -> Result<ResolvedRef, KeysyncError> {
        let mut parts = reference.split(REF_SEPARATOR);
        let (key_name, subkey_name) = match (parts.next(), parts.next(), parts.next()) {
            (Some(k), Some(s), None) if !k.trim().is_empty() && !s.trim().is_empty() => {
                (k.trim(), s.trim())
            }
            _ => return Err(KeysyncError::InvalidReference(reference.to_string())),
        };

        let key = self.key(key_name)?;
        let subkey = key
            .subkeys
            .get(subkey_name)
            .ok_or_else(|| KeysyncError::SubkeyNotFound {
                key: key_name.to_string(),
                subkey: subkey_name.to_string(),
            })?;

        Ok(ResolvedRef {
            key_name: key_name.to_string(),
            subkey_name: subkey_name.to_string(),
            fingerprint: subkey.fingerprint.clone(),
            parent_fingerprint: key.fingerprint.clone(),
            item_title: format!("{}/{}", key.title, subkey_name),
        })
    }

    /// Look up a top-level key by name
    pub fn key(&self, name: &str) -> Result<&Key, KeysyncError> {
        self.keys
            .get(name)
            .ok_or_else(|| KeysyncError::KeyNotFound(name.to_string()))
    }

    /// Look up a host by name
    pub fn host(&self, name: &str) -> Result<&Host, KeysyncError> {
        self.hosts
            .get(name)
            .ok_or_else(|| KeysyncError::HostNotFound(name.to_string()))
    }

    /// Resolve every reference of a host, in configured order.
    ///
    /// Fails on the first unresolvable reference before anything is returned.
    pub fn resolve_host(&self, name: &str) -> Result<Vec<ResolvedRef>, KeysyncError> {
        self.host(name)?
            .keys
            .iter()
            .map(|r| self.resolve_ref(r))
            .collect()
    }

    /// All key names, sorted
    pub fn all_key_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.keys.keys().cloned().collect();
        names.sort();
        names
    }

    /// The sorted set union of references across every host
    pub fn all_host_refs(&self) -> Vec<String> {
        let unique: BTreeSet<&String> = self.hosts.values().flat_map(|h| h.keys.iter()).collect();
        unique.into_iter().cloned().collect()
    }
}
