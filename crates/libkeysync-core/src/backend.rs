//! Collaborator traits for the local keyring and the remote secret store.
//!
//! The engine only talks to these traits; `libkeysync-gpg` and `libkeysync-op`
//! provide the process-backed implementations.

use crate::item::{ItemFields, KeyMetadata, RemoteItem};

/// Local keyring primitives
pub trait Keyring {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Export the full public key (all subkeys' public parts)
    fn export_public(&self, fingerprint: &str) -> Result<Vec<u8>, Self::Error>;

    /// Export the full secret key
    fn export_secret(&self, fingerprint: &str) -> Result<Vec<u8>, Self::Error>;

    /// Export only the named subkey's secret material, excluding its siblings
    fn export_secret_subkey(&self, fingerprint: &str) -> Result<Vec<u8>, Self::Error>;

    fn read_metadata(&self, fingerprint: &str) -> Result<KeyMetadata, Self::Error>;

    /// Import armored public or secret material
    fn import(&self, material: &[u8]) -> Result<(), Self::Error>;

    /// Delete public and secret material. Absent keys are not an error.
    fn delete_keypair(&self, fingerprint: &str) -> Result<(), Self::Error>;
}

/// Remote secret-store primitives
pub trait SecretStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Check for an active session. Not cached: called at the start of every operation.
    fn ensure_authenticated(&self) -> Result<(), Self::Error>;

    /// Whether an `ensure_authenticated` error means "no session" rather than
    /// the store being unreachable
    fn is_sign_in_error(&self, error: &Self::Error) -> bool {
        let _ = error;
        true
    }

    /// Fetch an item, `None` when it does not exist
    fn get_item(&self, title: &str, vault: &str) -> Result<Option<RemoteItem>, Self::Error>;

    fn create_item(&self, title: &str, vault: &str, fields: &ItemFields) -> Result<(), Self::Error>;

    fn edit_item(&self, title: &str, vault: &str, fields: &ItemFields) -> Result<(), Self::Error>;
}

impl<T: Keyring + ?Sized> Keyring for &T {
    type Error = T::Error;

    fn export_public(&self, fingerprint: &str) -> Result<Vec<u8>, Self::Error> {
        (**self).export_public(fingerprint)
    }

    fn export_secret(&self, fingerprint: &str) -> Result<Vec<u8>, Self::Error> {
        (**self).export_secret(fingerprint)
    }

    fn export_secret_subkey(&self, fingerprint: &str) -> Result<Vec<u8>, Self::Error> {
        (**self).export_secret_subkey(fingerprint)
    }

    fn read_metadata(&self, fingerprint: &str) -> Result<KeyMetadata, Self::Error> {
        (**self).read_metadata(fingerprint)
    }

    fn import(&self, material: &[u8]) -> Result<(), Self::Error> {
        (**self).import(material)
    }

    fn delete_keypair(&self, fingerprint: &str) -> Result<(), Self::Error> {
        (**self).delete_keypair(fingerprint)
    }
}

impl<T: SecretStore + ?Sized> SecretStore for &T {
    type Error = T::Error;

    fn ensure_authenticated(&self) -> Result<(), Self::Error> {
        (**self).ensure_authenticated()
    }

    fn is_sign_in_error(&self, error: &Self::Error) -> bool {
        (**self).is_sign_in_error(error)
    }

    fn get_item(&self, title: &str, vault: &str) -> Result<Option<RemoteItem>, Self::Error> {
        (**self).get_item(title, vault)
    }

    fn create_item(&self, title: &str, vault: &str, fields: &ItemFields) -> Result<(), Self::Error> {
        (**self).create_item(title, vault, fields)
    }

    fn edit_item(&self, title: &str, vault: &str, fields: &ItemFields) -> Result<(), Self::Error> {
        (**self).edit_item(title, vault, fields)
    }
}
