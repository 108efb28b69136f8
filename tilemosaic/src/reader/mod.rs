//! Raster-reading capability.
//!
//! The mosaic never decodes pixels itself. Tile and point queries go
//! through a [`RasterReader`], which opens an asset into a scoped
//! [`RasterDataset`] handle that is dropped as soon as the read completes.
//!
//! # Example
//!
//! ```ignore
//! struct CogReader { client: HttpClient }
//!
//! impl RasterReader for CogReader {
//!     type Dataset = CogDataset;
//!
//!     async fn open(&self, asset: &str) -> Result<CogDataset, ReadError> {
//!         CogDataset::open(&self.client, asset).await
//!     }
//! }
//! ```

mod types;

pub use types::{ImageData, PointData, PointRead, ReadError, ReadOptions};

use std::future::Future;

use crate::coord::TileCoord;
use crate::crs::Crs;

/// Opens assets for reading.
pub trait RasterReader: Send + Sync {
    type Dataset: RasterDataset;

    /// Opens an asset by identifier.
    fn open(&self, asset: &str) -> impl Future<Output = Result<Self::Dataset, ReadError>> + Send;
}

/// An open asset.
pub trait RasterDataset: Send + Sync {
    /// Reads the pixels of a map tile.
    fn tile(
        &self,
        tile: TileCoord,
        options: &ReadOptions,
    ) -> impl Future<Output = Result<ImageData, ReadError>> + Send;

    /// Samples the asset at a point given in `crs`.
    fn point(
        &self,
        lon: f64,
        lat: f64,
        crs: Crs,
        options: &ReadOptions,
    ) -> impl Future<Output = Result<PointRead, ReadError>> + Send;
}

/// Reader for index-only use: every open fails with
/// [`ReadError::Unavailable`].
///
/// Asset resolution, updates and info work unchanged; tile and point
/// composition report every asset as failed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReader;

/// Dataset type of [`NullReader`]; never constructed.
#[derive(Debug)]
pub enum NullDataset {}

impl RasterReader for NullReader {
    type Dataset = NullDataset;

    async fn open(&self, _asset: &str) -> Result<NullDataset, ReadError> {
        Err(ReadError::Unavailable)
    }
}

impl RasterDataset for NullDataset {
    async fn tile(&self, _tile: TileCoord, _options: &ReadOptions) -> Result<ImageData, ReadError> {
        match *self {}
    }

    async fn point(
        &self,
        _lon: f64,
        _lat: f64,
        _crs: Crs,
        _options: &ReadOptions,
    ) -> Result<PointRead, ReadError> {
        match *self {}
    }
}
