//! The mosaic document and the operations that produce new versions of it.
//!
//! - [`MosaicIndex`]: the persisted quadkey to asset-list mapping
//! - [`MosaicBuilder`]: reduces footprints to a fresh document
//! - [`MosaicUpdater`]: merges footprints into a copy of a document
//! - [`IndexSnapshot`]: a document frozen together with its fingerprint

mod builder;
mod document;
mod snapshot;
mod types;
mod update;

pub use builder::{BuildError, BuildOptions, MosaicBuilder};
pub use document::{MosaicIndex, DEFAULT_MOSAIC_NAME, MOSAIC_SCHEMA_VERSION};
pub use snapshot::IndexSnapshot;
pub use types::{Center, DocumentError, MosaicInfo};
pub use update::{merge, MosaicUpdater, UpdateOptions};
