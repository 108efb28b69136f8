//! Data returned by per-asset reads.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::coord::TileCoord;

/// Errors from a single asset read.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReadError {
    /// Asset could not be opened
    #[error("cannot open asset {asset}: {message}")]
    Open { asset: String, message: String },

    /// Requested tile does not intersect the asset
    #[error("tile {tile} is outside the asset bounds")]
    TileOutsideBounds { tile: TileCoord },

    /// I/O failure while reading
    #[error("read failed: {0}")]
    Io(String),

    /// Asset returned malformed pixel data
    #[error("invalid raster data: {0}")]
    InvalidData(String),

    /// No reader is available to service the request
    #[error("no raster reader is configured")]
    Unavailable,
}

/// Options forwarded untouched to the raster reader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadOptions {
    /// 1-based band indexes to read; `None` reads all bands
    pub indexes: Option<Vec<usize>>,
    /// Overrides the asset's nodata value
    pub nodata: Option<f64>,
    /// Reader-specific settings
    pub extra: BTreeMap<String, String>,
}

/// A block of pixels with a validity mask.
///
/// Bands are stored band-major; every band and the mask hold
/// `width * height` values. A `true` mask entry marks valid data.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    width: u32,
    height: u32,
    bands: Vec<Vec<f64>>,
    mask: Vec<bool>,
}

impl ImageData {
    /// Builds an image, checking every band and the mask match the size.
    pub fn new(
        width: u32,
        height: u32,
        bands: Vec<Vec<f64>>,
        mask: Vec<bool>,
    ) -> Result<Self, ReadError> {
        let pixels = width as usize * height as usize;
        if mask.len() != pixels {
            return Err(ReadError::InvalidData(format!(
                "mask holds {} values, expected {}",
                mask.len(),
                pixels
            )));
        }
        if let Some((i, band)) = bands.iter().enumerate().find(|(_, b)| b.len() != pixels) {
            return Err(ReadError::InvalidData(format!(
                "band {} holds {} values, expected {}",
                i + 1,
                band.len(),
                pixels
            )));
        }
        Ok(Self {
            width,
            height,
            bands,
            mask,
        })
    }

    /// Image with every pixel masked out.
    pub fn empty(width: u32, height: u32, band_count: usize) -> Self {
        let pixels = width as usize * height as usize;
        Self {
            width,
            height,
            bands: vec![vec![0.0; pixels]; band_count],
            mask: vec![false; pixels],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    pub fn bands(&self) -> &[Vec<f64>] {
        &self.bands
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    pub fn pixel_count(&self) -> usize {
        self.mask.len()
    }

    pub fn valid_count(&self) -> usize {
        self.mask.iter().filter(|v| **v).count()
    }

    /// Every pixel holds valid data.
    pub fn is_fully_valid(&self) -> bool {
        self.mask.iter().all(|v| *v)
    }

    /// No pixel holds valid data.
    pub fn is_fully_masked(&self) -> bool {
        !self.mask.iter().any(|v| *v)
    }

    /// Same dimensions and band count.
    pub fn same_shape(&self, other: &ImageData) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.bands.len() == other.bands.len()
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut [Vec<f64>], &mut [bool]) {
        (&mut self.bands, &mut self.mask)
    }
}

/// Values sampled at a single location.
#[derive(Debug, Clone, PartialEq)]
pub struct PointData {
    /// Location the values were sampled at, in the index's geographic CRS
    pub coordinates: (f64, f64),
    /// One value per band read
    pub values: Vec<f64>,
}

/// Outcome of a point read.
///
/// A point outside an asset's own coverage is an expected result, not an
/// error: assets listed under a spatial key often cover only part of it.
#[derive(Debug, Clone, PartialEq)]
pub enum PointRead {
    Value(PointData),
    OutsideCoverage,
}
