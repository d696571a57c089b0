//! JSON shape of `op item get` and the assignment syntax of `op item create/edit`.

use libkeysync_core::{ItemField, ItemFields, RemoteItem};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpVault {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpField {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub purpose: String,
}

/// An item as printed by `op item get --format json`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub vault: OpVault,
    #[serde(default)]
    pub fields: Vec<OpField>,
}

impl OpItem {
    /// Convert to the engine's view. The vault falls back to the one asked for.
    pub fn into_remote(self, vault: &str) -> RemoteItem {
        let vault = if self.vault.name.is_empty() {
            vault.to_string()
        } else {
            self.vault.name
        };
        RemoteItem {
            title: self.title,
            vault,
            fields: self
                .fields
                .into_iter()
                .map(|f| ItemField {
                    label: f.label,
                    value: f.value,
                })
                .collect(),
        }
    }
}

pub fn parse_item(json: &[u8], vault: &str) -> Result<RemoteItem, serde_json::Error> {
    let item: OpItem = serde_json::from_slice(json)?;
    Ok(item.into_remote(vault))
}

/// `label[type]=value` arguments for every written field
pub fn field_assignments(fields: &ItemFields) -> Vec<String> {
    fields
        .entries()
        .into_iter()
        .map(|e| format!("{}[{}]={}", e.label, e.kind.as_str(), e.value))
        .collect()
}
