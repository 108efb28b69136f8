//! Persistence of mosaic documents.
//!
//! A [`Backend`] loads and stores one document. The engine never touches
//! storage directly, so new stores only need to implement the trait.

mod file;
mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use thiserror::Error;

use crate::mosaic::{DocumentError, MosaicIndex};

/// Errors raised by a backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// No document stored at the location
    #[error("mosaic not found: {0}")]
    NotFound(String),

    /// Write refused because a document exists and overwrite was not set
    #[error("mosaic already exists: {0}")]
    AlreadyExists(String),

    #[error("backend I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("decoding mosaic failed: {0}")]
    Decode(String),

    #[error("encoding mosaic failed: {0}")]
    Encode(String),

    /// Stored document violates the schema
    #[error("invalid mosaic document: {0}")]
    Invalid(DocumentError),
}

impl From<DocumentError> for BackendError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::Decode(msg) => BackendError::Decode(msg),
            DocumentError::Encode(msg) => BackendError::Encode(msg),
            other => BackendError::Invalid(other),
        }
    }
}

/// Storage for a single mosaic document.
pub trait Backend: Send + Sync {
    /// Identity of the stored catalog; part of every asset cache key.
    fn location(&self) -> &str;

    /// Loads and validates the stored document.
    fn read(&self) -> Result<MosaicIndex, BackendError>;

    /// Stores `document`.
    ///
    /// Fails with [`BackendError::AlreadyExists`] when a document is
    /// already stored and `overwrite` is false.
    fn write(&self, document: &MosaicIndex, overwrite: bool) -> Result<(), BackendError>;
}
