//! Parser for `gpg --with-colons --fixed-list-mode` key listings.

use libkeysync_core::KeyMetadata;

/// Map an OpenPGP public-key algorithm id to a short name
pub fn algorithm_name(id: &str) -> String {
    match id {
        "1" => "rsa".to_string(),
        "16" => "elgamal".to_string(),
        "17" => "dsa".to_string(),
        "18" => "ecdh".to_string(),
        "19" => "ecdsa".to_string(),
        "22" | "25" => "ed25519".to_string(),
        other => format!("algo-{}", other),
    }
}

/// Extract metadata from a colon listing.
///
/// The first key record (`pub`, `sub`, `sec`, `ssb`) supplies algorithm,
/// creation, expiry, and capabilities; the first `uid` record supplies the uid.
/// A blank expiry means the key never expires.
pub fn parse_key_listing(listing: &str) -> KeyMetadata {
    let mut meta = KeyMetadata::default();
    let mut seen_key = false;
    let mut seen_uid = false;

    for line in listing.lines() {
        let fields: Vec<&str> = line.trim_end_matches('\r').split(':').collect();
        if fields.len() < 10 {
            continue;
        }

        match fields[0] {
            "pub" | "sub" | "sec" | "ssb" if !seen_key => {
                seen_key = true;
                meta.algorithm = algorithm_name(fields[3]);
                meta.created = fields[5].to_string();
                meta.expires = fields[6].to_string();
                if let Some(caps) = fields.get(11) {
                    meta.capabilities = caps.to_string();
                }
            }
            "uid" if !seen_uid => {
                seen_uid = true;
                meta.uid = fields[9].to_string();
            }
            _ => {}
        }
    }

    if meta.expires.is_empty() {
        meta.expires = KeyMetadata::NEVER_EXPIRES.to_string();
    }

    meta
}
