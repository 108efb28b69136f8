//! Errors surfaced by mosaic queries and updates.

use thiserror::Error;

use crate::backend::BackendError;
use crate::coord::{CoordError, TileCoord};
use crate::crs::CrsError;
use crate::mosaic::{BuildError, DocumentError};

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, MosaicError>;

/// Errors returned to engine callers.
#[derive(Debug, Error)]
pub enum MosaicError {
    /// The query resolved to no candidate asset, or no asset produced a value
    #[error("no asset found for {target}")]
    NoAssetFound { target: String },

    /// Every asset for a tile failed or returned only masked pixels
    #[error("no asset produced data for tile {tile}")]
    EmptyMosaic { tile: TileCoord },

    /// Stored or supplied document violates the schema
    #[error("invalid mosaic document: {0}")]
    InvalidDocument(#[from] DocumentError),

    /// Update input could not be reduced to a candidate index
    #[error("invalid update: {0}")]
    InvalidUpdate(#[from] BuildError),

    #[error(transparent)]
    Backend(BackendError),

    #[error("coordinate transform failed: {0}")]
    Crs(#[from] CrsError),

    #[error("invalid coordinates: {0}")]
    Coord(#[from] CoordError),
}

impl From<BackendError> for MosaicError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Decode(msg) => MosaicError::InvalidDocument(DocumentError::Decode(msg)),
            BackendError::Invalid(doc) => MosaicError::InvalidDocument(doc),
            other => MosaicError::Backend(other),
        }
    }
}

impl MosaicError {
    pub(crate) fn no_asset(target: impl Into<String>) -> Self {
        MosaicError::NoAssetFound {
            target: target.into(),
        }
    }
}
