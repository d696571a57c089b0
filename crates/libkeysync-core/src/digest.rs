use sha2::{Digest, Sha256};

/// Length of a rendered digest in hex characters
pub const DIGEST_HEX_LEN: usize = 64;

/// Compute the lowercase hex SHA-256 of `data`
///
/// Used for change detection between the local keyring and stored items;
/// the material itself stays the trust anchor on restore.
pub fn digest(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
