use sha3::{Digest, Sha3_256};

/// Lowercase hex SHA3-256 of `bytes`.
pub fn digest_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha3_256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Case-insensitive comparison against an expected hex digest.
pub fn matches_hex(bytes: &[u8], expected: &str) -> bool {
    digest_hex(bytes) == expected.to_ascii_lowercase()
}
