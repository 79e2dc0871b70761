use thiserror::Error;

#[derive(Error, Debug)]
pub enum XferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("wrong password or corrupted data")]
    Authentication,

    #[error("decompression failed ({stage}): {detail}")]
    Decompression {
        stage: &'static str,
        detail: String,
    },

    #[error("metadata fragment (index 0) has not been scanned")]
    MissingMetadata,

    #[error("missing block {0}")]
    MissingBlock(u32),

    #[error("block {index}: {source}")]
    Block {
        index: u32,
        #[source]
        source: Box<XferError>,
    },

    #[error("digest mismatch: expected {expected}, got {actual}")]
    Integrity { expected: String, actual: String },
}

impl XferError {
    pub fn for_block(index: u32, source: XferError) -> Self {
        XferError::Block {
            index,
            source: Box::new(source),
        }
    }

    /// True for tag/KDF mismatches, including ones attributed to a block.
    pub fn is_authentication(&self) -> bool {
        match self {
            XferError::Authentication => true,
            XferError::Block { source, .. } => source.is_authentication(),
            _ => false,
        }
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, XferError>;
