//! Password-based sealing of fragment payloads.
//!
//! Sealed layout (pre-base64): `salt[16] || nonce[12] || tag[16] || ciphertext`.
//! The cipher is AES-256-GCM; the key comes from [`crate::crypto::kdf`].

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};
use zeroize::Zeroize;

use crate::crypto::kdf;
use crate::error::{Result, XferError};

pub const SALT_LEN: usize = 16;
pub const NONCE_LEN: usize = 12;
pub const TAG_LEN: usize = 16;
pub const HEADER_LEN: usize = SALT_LEN + NONCE_LEN + TAG_LEN;

/// Open a sealed blob. Tag or key mismatch fails closed with
/// [`XferError::Authentication`] and exposes no partial plaintext.
pub fn open(blob: &[u8], password: &str) -> Result<Vec<u8>> {
    if blob.len() < HEADER_LEN {
        return Err(XferError::Format(format!(
            "sealed payload too short: {} bytes",
            blob.len()
        )));
    }
    let (salt, rest) = blob.split_at(SALT_LEN);
    let (nonce, rest) = rest.split_at(NONCE_LEN);
    let (tag, ciphertext) = rest.split_at(TAG_LEN);

    let mut key = kdf::derive_key(password, salt)?;
    let cipher = Aes256Gcm::new_from_slice(&key).map_err(|_| XferError::Authentication)?;
    key.zeroize();

    // The cipher wants the tag appended to the ciphertext; the wire carries
    // it up front.
    let mut joined = Vec::with_capacity(ciphertext.len() + TAG_LEN);
    joined.extend_from_slice(ciphertext);
    joined.extend_from_slice(tag);

    cipher
        .decrypt(Nonce::from_slice(nonce), joined.as_slice())
        .map_err(|_| XferError::Authentication)
}

/// Seal `plain` under a fresh random salt and nonce.
pub fn seal(plain: &[u8], password: &str) -> Result<Vec<u8>> {
    let mut salt = [0u8; SALT_LEN];
    let mut nonce = [0u8; NONCE_LEN];
    getrandom::getrandom(&mut salt).map_err(std::io::Error::from)?;
    getrandom::getrandom(&mut nonce).map_err(std::io::Error::from)?;

    let mut key = kdf::derive_key(password, &salt)?;
    let cipher = Aes256Gcm::new_from_slice(&key).map_err(|_| XferError::Authentication)?;
    key.zeroize();

    let sealed = cipher
        .encrypt(Nonce::from_slice(&nonce), plain)
        .map_err(|_| XferError::Authentication)?;
    let tag_at = sealed.len() - TAG_LEN;

    let mut out = Vec::with_capacity(HEADER_LEN + sealed.len() - TAG_LEN);
    out.extend_from_slice(&salt);
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&sealed[tag_at..]);
    out.extend_from_slice(&sealed[..tag_at]);
    Ok(out)
}
