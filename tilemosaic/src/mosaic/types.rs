//! Supporting types for the mosaic document.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coord::Bounds;

/// Center point of a mosaic: `[lon, lat, zoom]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64, u8)", into = "(f64, f64, u8)")]
pub struct Center {
    pub lon: f64,
    pub lat: f64,
    pub zoom: u8,
}

impl Center {
    pub fn new(lon: f64, lat: f64, zoom: u8) -> Self {
        Self { lon, lat, zoom }
    }

    /// Midpoint of `bounds` at `zoom`.
    pub fn of(bounds: &Bounds, zoom: u8) -> Self {
        let (lon, lat) = bounds.midpoint();
        Self { lon, lat, zoom }
    }
}

impl From<(f64, f64, u8)> for Center {
    fn from((lon, lat, zoom): (f64, f64, u8)) -> Self {
        Self { lon, lat, zoom }
    }
}

impl From<Center> for (f64, f64, u8) {
    fn from(c: Center) -> Self {
        (c.lon, c.lat, c.zoom)
    }
}

/// Summary of a mosaic for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MosaicInfo {
    pub bounds: Bounds,
    pub center: Center,
    pub minzoom: u8,
    pub maxzoom: u8,
    pub name: String,
    pub quadkeys: Vec<String>,
}

/// Schema or invariant violations in a mosaic document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DocumentError {
    #[error("cannot decode mosaic document: {0}")]
    Decode(String),

    #[error("cannot encode mosaic document: {0}")]
    Encode(String),

    #[error("minzoom {minzoom} is greater than maxzoom {maxzoom}")]
    ZoomRange { minzoom: u8, maxzoom: u8 },

    #[error("{field} {zoom} is beyond the maximum zoom {max}")]
    ZoomLimit {
        field: &'static str,
        zoom: u8,
        max: u8,
    },

    #[error("quadkey zoom {quadkey_zoom} is below minzoom {minzoom}")]
    QuadkeyZoom { quadkey_zoom: u8, minzoom: u8 },

    #[error("invalid bounds {0}")]
    Bounds(Bounds),

    #[error("tile key '{key}' is not a quadkey at zoom {quadkey_zoom}")]
    TileKey { key: String, quadkey_zoom: u8 },
}
