#![forbid(unsafe_code)]

pub mod error;

pub mod codec;

pub mod crypto {
    pub mod aead;
    pub mod kdf;
}

pub mod hash {
    pub mod sha3;
}

pub mod wire {
    pub mod fragment;
    pub mod metadata;
}

pub mod session;
pub mod source;
pub mod store;

// Re-exports: stable API surface
pub use error::{Result, XferError};
pub use session::{ReconstructedFile, ReconstructionSession};
pub use source::{LineSource, ScanSource};
pub use store::{FragmentStore, IngestOutcome};
pub use wire::fragment::Fragment;
pub use wire::metadata::FileMetadata;
