//! keysync configuration: named keys with subkeys, and hosts referencing them.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::KeysyncError;

/// Only supported config schema version
pub const CONFIG_VERSION: u32 = 1;

/// Length of a GPG v4 fingerprint in hex characters
pub const FINGERPRINT_LEN: usize = 40;

/// Default config path relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "keysync.yaml";

/// Top-level keysync configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub version: u32,
    /// 1Password vault holding every item
    #[serde(default)]
    pub vault: String,
    #[serde(default)]
    pub keys: BTreeMap<String, Key>,
    #[serde(default)]
    pub hosts: BTreeMap<String, Host>,
}

/// One named top-level key
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Key {
    /// Display title, also the backup item title
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub fingerprint: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub subkeys: BTreeMap<String, Subkey>,
}

/// A named subkey under a top-level key
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Subkey {
    #[serde(default)]
    pub fingerprint: String,
}

/// Key references for one machine, in sync/restore order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Host {
    #[serde(default)]
    pub keys: Vec<String>,
}

impl Config {
    /// Read, parse, and validate a config file.
    ///
    /// `.toml` files are parsed as TOML, everything else as YAML.
    pub fn load(path: &Path) -> Result<Self, KeysyncError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            KeysyncError::Config(format!("cannot read config file {}: {}", path.display(), e))
        })?;

        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let config = if is_toml {
            Self::from_toml_str(&content)?
        } else {
            Self::from_yaml_str(&content)?
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse YAML without validating
    pub fn from_yaml_str(content: &str) -> Result<Self, KeysyncError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse TOML without validating
    pub fn from_toml_str(content: &str) -> Result<Self, KeysyncError> {
        Ok(toml::from_str(content)?)
    }

    /// Check required fields, fingerprint shapes, and that every host reference resolves
    pub fn validate(&self) -> Result<(), KeysyncError> {
        if self.version != CONFIG_VERSION {
            return Err(config_err(format!(
                "unsupported config version: {} (expected {})",
                self.version, CONFIG_VERSION
            )));
        }

        if self.vault.trim().is_empty() {
            return Err(config_err("vault is required"));
        }

        if self.keys.is_empty() {
            return Err(config_err("keys must not be empty"));
        }

        for (name, key) in &self.keys {
            if key.title.trim().is_empty() {
                return Err(config_err(format!("keys.{}.title is required", name)));
            }
            check_fingerprint(&format!("keys.{}.fingerprint", name), &key.fingerprint)?;

            if key.subkeys.is_empty() {
                return Err(config_err(format!("keys.{}.subkeys must not be empty", name)));
            }
            for (sub_name, sub) in &key.subkeys {
                check_fingerprint(
                    &format!("keys.{}.subkeys.{}.fingerprint", name, sub_name),
                    &sub.fingerprint,
                )?;
            }
        }

        if self.hosts.is_empty() {
            return Err(config_err("hosts must not be empty"));
        }

        for (host_name, host) in &self.hosts {
            if host.keys.is_empty() {
                return Err(config_err(format!("hosts.{}.keys must not be empty", host_name)));
            }
            for (i, key_ref) in host.keys.iter().enumerate() {
                if !key_ref.contains('.') {
                    return Err(config_err(format!(
                        "hosts.{}.keys[{}] must be dot notation key.subkey: {:?}",
                        host_name, i, key_ref
                    )));
                }
                if let Err(e) = self.resolve_ref(key_ref) {
                    return Err(config_err(format!(
                        "hosts.{}.keys[{}] has invalid reference {:?}: {}",
                        host_name, i, key_ref, e
                    )));
                }
            }
        }

        Ok(())
    }
}

fn config_err(msg: impl Into<String>) -> KeysyncError {
    KeysyncError::Config(msg.into())
}

fn check_fingerprint(path: &str, fingerprint: &str) -> Result<(), KeysyncError> {
    let fpr = fingerprint.trim();
    if fpr.is_empty() {
        return Err(config_err(format!("{} is required", path)));
    }
    if fpr.len() != FINGERPRINT_LEN {
        return Err(config_err(format!(
            "{} must be {} characters",
            path, FINGERPRINT_LEN
        )));
    }
    if !fpr.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(config_err(format!("{} must be hexadecimal", path)));
    }
    Ok(())
}
