//! Reversible transform pipeline for fragment payloads.
//!
//! Wire order on decode: base64 → optional AEAD open → zstd → brotli.
//! Encode mirrors it exactly (brotli, zstd, optional seal, base64). The
//! double compression is a protocol requirement, not a tuning choice; both
//! stages must succeed.

use crate::crypto::aead;
use crate::error::{Result, XferError};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::io::{Read, Write};

pub trait Compressor: Send + Sync {
    fn compress(&self, src: &mut dyn Read, dst: &mut dyn Write, level: i32) -> Result<u64>;
    fn decompress(&self, src: &mut dyn Read, dst: &mut dyn Write) -> Result<u64>;
}

pub mod brotlic;
pub mod zstdc;

use brotlic::BrotliCompressor;
use zstdc::ZstdCompressor;

fn has_password(password: Option<&str>) -> bool {
    password.is_some_and(|p| !p.is_empty())
}

/// Wire payload → original bytes. An empty (or absent) password means the
/// encoder applied no encryption, so the base64 output feeds the
/// decompressors directly.
pub fn decode_payload(payload_b64: &str, password: Option<&str>) -> Result<Vec<u8>> {
    let raw = BASE64
        .decode(payload_b64.trim())
        .map_err(|e| XferError::Format(format!("invalid base64 payload: {e}")))?;

    let compressed = if has_password(password) {
        aead::open(&raw, password.unwrap_or_default())?
    } else {
        raw
    };

    let mut inner = Vec::new();
    let mut src = compressed.as_slice();
    ZstdCompressor
        .decompress(&mut src, &mut inner)
        .map_err(|e| XferError::Decompression {
            stage: "zstd",
            detail: e.to_string(),
        })?;

    let mut plain = Vec::new();
    let mut src = inner.as_slice();
    BrotliCompressor
        .decompress(&mut src, &mut plain)
        .map_err(|e| XferError::Decompression {
            stage: "brotli",
            detail: e.to_string(),
        })?;

    Ok(plain)
}

/// Exact inverse of [`decode_payload`]. `level` is on the zstd scale; the
/// brotli stage clamps it to its own 0..=11 range.
pub fn encode_payload(plain: &[u8], password: Option<&str>, level: i32) -> Result<String> {
    let mut inner = Vec::new();
    let mut src = plain;
    BrotliCompressor.compress(&mut src, &mut inner, level)?;

    let mut compressed = Vec::new();
    let mut src = inner.as_slice();
    ZstdCompressor.compress(&mut src, &mut compressed, level)?;

    let sealed = if has_password(password) {
        aead::seal(&compressed, password.unwrap_or_default())?
    } else {
        compressed
    };

    Ok(BASE64.encode(sealed))
}
