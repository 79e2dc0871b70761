use super::Compressor;
use crate::error::Result;
use std::io::{Read, Write};

/// Inner compression stage (last to run on decode).
pub struct BrotliCompressor;

const BUF_SIZE: usize = 1 << 12;
const LG_WINDOW: u32 = 22;

impl Compressor for BrotliCompressor {
    fn compress(&self, src: &mut dyn Read, dst: &mut dyn Write, level: i32) -> Result<u64> {
        let quality = level.clamp(0, 11) as u32;
        let mut enc = brotli::CompressorReader::new(src, BUF_SIZE, quality, LG_WINDOW);
        let written = std::io::copy(&mut enc, dst)?;
        Ok(written)
    }

    fn decompress(&self, src: &mut dyn Read, dst: &mut dyn Write) -> Result<u64> {
        let mut dec = brotli::Decompressor::new(src, BUF_SIZE);
        let written = std::io::copy(&mut dec, dst)?;
        Ok(written)
    }
}
