//! GnuPG keyring backend for keysync
//!
//! Drives the `gpg` binary in batch mode:
//! - armored export of public keys, secret keys, and single secret subkeys
//! - `--with-colons` listing parsed into key metadata
//! - import over stdin and idempotent deletion

mod error;
mod keyring;
mod listing;

pub use error::GpgError;
pub use keyring::{exact_key_selector, GpgKeyring};
pub use listing::{algorithm_name, parse_key_listing};
