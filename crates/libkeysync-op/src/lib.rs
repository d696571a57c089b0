//! 1Password secret-store backend for keysync
//!
//! Wraps the `op` CLI with prompts disabled. Items are Secure Notes tagged
//! `keysync`, one per key or subkey reference.

mod error;
mod item;
mod store;

pub use error::{OpError, SIGN_IN_GUIDANCE};
pub use item::{field_assignments, parse_item, OpField, OpItem, OpVault};
pub use store::{is_not_found, OpStore};
