use serde::Deserialize;

use crate::codec;
use crate::error::{Result, XferError};

pub const HASH_HEX_LEN: usize = 64;

/// Decoded fragment-0 payload: the authoritative description of the file
/// being reassembled. Immutable once resolved.
#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub file_name: String,
    /// Payload fragments are 1..=total_blocks.
    pub total_blocks: u32,
    /// Lowercase hex SHA3-256 of the whole reconstructed file.
    pub hash: String,
}

#[derive(Deserialize)]
struct MetadataWire {
    file_name: String,
    #[serde(default)]
    total_blocks: Option<u32>,
    hash: String,
}

/// Run fragment 0 through the full codec chain and parse the result.
///
/// `total_blocks` in the payload is authoritative; when a producer omits it,
/// `fallback_total` (the per-fragment count hint, or the highest scanned
/// index) stands in.
pub fn resolve(
    payload_b64: &str,
    password: Option<&str>,
    fallback_total: Option<u32>,
) -> Result<FileMetadata> {
    let plain = codec::decode_payload(payload_b64, password)?;
    let wire: MetadataWire = serde_json::from_slice(&plain)
        .map_err(|e| XferError::Format(format!("bad metadata payload: {e}")))?;

    if wire.file_name.is_empty() {
        return Err(XferError::Format("metadata: empty file_name".into()));
    }
    if wire.hash.len() != HASH_HEX_LEN || !wire.hash.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(XferError::Format(format!(
            "metadata: malformed digest {:?}",
            wire.hash
        )));
    }
    let total_blocks = wire
        .total_blocks
        .or(fallback_total)
        .ok_or_else(|| XferError::Format("metadata: unknown block count".into()))?;

    Ok(FileMetadata {
        file_name: wire.file_name,
        total_blocks,
        hash: wire.hash.to_ascii_lowercase(),
    })
}
