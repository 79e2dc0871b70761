//! Reassembly engine: store + codec + metadata, orchestrated.
//!
//! A reconstruction attempt walks collect → resolve metadata → decode
//! blocks → verify digest. The attempt is caller-triggered; the core never
//! decides on its own that "enough" fragments have arrived, since some
//! producers only reveal the true count inside the metadata fragment.

use rayon::prelude::*;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::codec;
use crate::error::{Result, XferError};
use crate::hash::sha3;
use crate::store::{FragmentStore, IngestOutcome};
use crate::wire::fragment::METADATA_INDEX;
use crate::wire::metadata::{self, FileMetadata};

/// A fully reconstructed, digest-verified file.
#[derive(Debug)]
pub struct ReconstructedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Process-scoped state for one transfer. Owns the fragment map and the
/// password; nothing outside the session can read the password, and the
/// wrapper zeroizes it when the session resets or drops.
#[derive(Default)]
pub struct ReconstructionSession {
    store: FragmentStore,
    password: Option<Zeroizing<String>>,
    metadata: Option<FileMetadata>,
}

impl ReconstructionSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one scanned record. Never fails; noise is dropped.
    pub fn ingest(&mut self, text: &str) -> IngestOutcome {
        self.store.put(text)
    }

    pub fn store(&self) -> &FragmentStore {
        &self.store
    }

    /// An empty answer means "no encryption was applied".
    pub fn set_password(&mut self, password: Option<String>) {
        self.password = password.filter(|p| !p.is_empty()).map(Zeroizing::new);
    }

    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    pub fn metadata(&self) -> Option<&FileMetadata> {
        self.metadata.as_ref()
    }

    /// Run the full pipeline. Collected fragments survive a failed attempt,
    /// so the caller can scan whatever was missing and try again; an
    /// authentication failure additionally drops the held password, since
    /// retrying with it would only reproduce the failure.
    ///
    /// Success consumes the session: fragments, password and metadata are
    /// all cleared, and the verified bytes are handed to the caller.
    pub fn reconstruct(&mut self) -> Result<ReconstructedFile> {
        let result = self.try_reconstruct();
        match &result {
            Ok(_) => self.reset(),
            Err(e) if e.is_authentication() => self.password = None,
            Err(_) => {}
        }
        result
    }

    /// Drop all session state, including the password.
    pub fn reset(&mut self) {
        self.store.clear();
        self.password = None;
        self.metadata = None;
    }

    /// Resolved at most once per session; the decoded result is cached for
    /// retries after a missing-block failure.
    fn resolve_metadata(&mut self) -> Result<FileMetadata> {
        if let Some(meta) = &self.metadata {
            return Ok(meta.clone());
        }
        let payload = self
            .store
            .payload(METADATA_INDEX)
            .ok_or(XferError::MissingMetadata)?;
        let fallback = self.store.total_hint().or_else(|| self.store.max_index());
        let meta = metadata::resolve(payload, self.password_ref(), fallback)?;
        debug!(
            file_name = %meta.file_name,
            total_blocks = meta.total_blocks,
            "metadata resolved"
        );
        self.metadata = Some(meta.clone());
        Ok(meta)
    }

    fn try_reconstruct(&mut self) -> Result<ReconstructedFile> {
        let meta = self.resolve_metadata()?;

        // Ascending scan so the failure names the first gap.
        for index in 1..=meta.total_blocks {
            if !self.store.has(index) {
                return Err(XferError::MissingBlock(index));
            }
        }

        // Per-block decodes are independent; only concatenation is
        // order-sensitive, so fan out and stitch results back by index.
        let password = self.password_ref();
        let decoded: Vec<Result<Vec<u8>>> = (1..=meta.total_blocks)
            .into_par_iter()
            .map(|index| {
                let payload = self
                    .store
                    .payload(index)
                    .ok_or(XferError::MissingBlock(index))?;
                codec::decode_payload(payload, password)
            })
            .collect();

        let mut buffer = Vec::new();
        for (offset, block) in decoded.into_iter().enumerate() {
            let index = offset as u32 + 1;
            let block = block.map_err(|e| XferError::for_block(index, e))?;
            buffer.extend_from_slice(&block);
        }

        if !sha3::matches_hex(&buffer, &meta.hash) {
            let actual = sha3::digest_hex(&buffer);
            // The buffer dies here; a corrupt reconstruction is never
            // handed out.
            return Err(XferError::Integrity {
                expected: meta.hash,
                actual,
            });
        }

        info!(
            file_name = %meta.file_name,
            bytes = buffer.len(),
            "reconstruction verified"
        );
        Ok(ReconstructedFile {
            file_name: meta.file_name,
            bytes: buffer,
        })
    }

    fn password_ref(&self) -> Option<&str> {
        self.password.as_ref().map(|p| p.as_str())
    }
}
