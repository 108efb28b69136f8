//! TileMosaic - quadkey mosaic index for raster assets
//!
//! Maps map tiles, points and bounding boxes to the ordered list of raster
//! assets that may hold their data, and composes tiles and point samples
//! from those assets through a pluggable raster reader.
//!
//! # High-Level API
//!
//! [`engine::MosaicEngine`] ties a document store, a raster reader and the
//! asset cache together:
//!
//! ```ignore
//! use tilemosaic::backend::FileBackend;
//! use tilemosaic::engine::MosaicEngine;
//! use tilemosaic::reader::ReadOptions;
//!
//! let engine = MosaicEngine::open(FileBackend::new("mosaic.json"), my_reader)?;
//! let assets = engine.assets_for_tile(150, 182, 9)?;
//! let tile = engine.tile(150, 182, 9, false, &ReadOptions::default()).await?;
//! ```

pub mod backend;
pub mod cache;
pub mod compositor;
pub mod config;
pub mod coord;
pub mod crs;
pub mod engine;
pub mod error;
pub mod footprint;
pub mod logging;
pub mod mosaic;
pub mod reader;
pub mod resolver;

pub use error::{MosaicError, Result};

/// Version of the TileMosaic library and CLI.
///
/// Synchronized across the workspace from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
