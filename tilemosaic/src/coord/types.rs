//! Coordinate type definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.051_128_779_806_59;
pub const MAX_LAT: f64 = 85.051_128_779_806_59;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Zoom levels addressable by a quadkey
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 30;

/// Tile coordinates in the Web Mercator / Slippy Map system.
///
/// `col` is the XYZ `x`, `row` is the XYZ `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    /// Y coordinate (north-south), 0 at north
    pub row: u32,
    /// X coordinate (east-west), 0 at west
    pub col: u32,
    /// Zoom level (0-30)
    pub zoom: u8,
}

impl TileCoord {
    /// Creates a tile from XYZ ordering.
    #[inline]
    pub fn from_xyz(x: u32, y: u32, z: u8) -> Self {
        Self {
            row: y,
            col: x,
            zoom: z,
        }
    }

    /// Number of tiles along one axis at this tile's zoom level.
    #[inline]
    pub fn matrix_size(&self) -> u64 {
        1u64 << self.zoom
    }

    /// Whether the row and column fall inside the tile matrix at this zoom.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.zoom <= MAX_ZOOM
            && u64::from(self.row) < self.matrix_size()
            && u64::from(self.col) < self.matrix_size()
    }

    /// Returns the parent tile one zoom level up, or `None` at zoom 0.
    #[inline]
    pub fn parent(&self) -> Option<TileCoord> {
        if self.zoom == 0 {
            return None;
        }
        Some(TileCoord {
            row: self.row >> 1,
            col: self.col >> 1,
            zoom: self.zoom - 1,
        })
    }

    /// Returns the four children one zoom level down.
    ///
    /// Order is top-left, top-right, bottom-right, bottom-left.
    #[inline]
    pub fn children(&self) -> [TileCoord; 4] {
        let row = self.row << 1;
        let col = self.col << 1;
        let zoom = self.zoom + 1;
        [
            TileCoord { row, col, zoom },
            TileCoord {
                row,
                col: col + 1,
                zoom,
            },
            TileCoord {
                row: row + 1,
                col: col + 1,
                zoom,
            },
            TileCoord {
                row: row + 1,
                col,
                zoom,
            },
        ]
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.zoom, self.col, self.row)
    }
}

/// Axis-aligned rectangle `(xmin, ymin, xmax, ymax)`.
///
/// Serialized as a four-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Bounds {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl Bounds {
    pub const fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// The whole WGS84 extent.
    pub const fn world() -> Self {
        Self::new(MIN_LON, -90.0, MAX_LON, 90.0)
    }

    /// Finite and not inverted on either axis.
    pub fn is_valid(&self) -> bool {
        [self.xmin, self.ymin, self.xmax, self.ymax]
            .iter()
            .all(|v| v.is_finite())
            && self.xmin <= self.xmax
            && self.ymin <= self.ymax
    }

    /// Component-wise union: min of mins, max of maxes.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            xmin: self.xmin.min(other.xmin),
            ymin: self.ymin.min(other.ymin),
            xmax: self.xmax.max(other.xmax),
            ymax: self.ymax.max(other.ymax),
        }
    }

    /// Whether `other` lies entirely inside this rectangle.
    pub fn contains(&self, other: &Bounds) -> bool {
        self.xmin <= other.xmin
            && self.ymin <= other.ymin
            && self.xmax >= other.xmax
            && self.ymax >= other.ymax
    }

    /// Overlapping rectangle, if any.
    pub fn intersection(&self, other: &Bounds) -> Option<Bounds> {
        let clipped = Bounds {
            xmin: self.xmin.max(other.xmin),
            ymin: self.ymin.max(other.ymin),
            xmax: self.xmax.min(other.xmax),
            ymax: self.ymax.min(other.ymax),
        };
        (clipped.xmin < clipped.xmax && clipped.ymin < clipped.ymax).then_some(clipped)
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Midpoint `(x, y)`.
    pub fn midpoint(&self) -> (f64, f64) {
        ((self.xmin + self.xmax) / 2.0, (self.ymin + self.ymax) / 2.0)
    }
}

impl From<[f64; 4]> for Bounds {
    fn from(v: [f64; 4]) -> Self {
        Bounds::new(v[0], v[1], v[2], v[3])
    }
}

impl From<Bounds> for [f64; 4] {
    fn from(b: Bounds) -> Self {
        [b.xmin, b.ymin, b.xmax, b.ymax]
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.xmin, self.ymin, self.xmax, self.ymax
        )
    }
}

/// Errors that can occur during coordinate conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Latitude is outside valid range (-85.05112878 to 85.05112878)
    InvalidLatitude(f64),
    /// Longitude is outside valid range (-180.0 to 180.0)
    InvalidLongitude(f64),
    /// Zoom level is outside valid range (0 to 30)
    InvalidZoom(u8),
    /// Row or column lies outside the tile matrix at the tile's zoom
    OutsideMatrix(TileCoord),
    /// Quadkey contains invalid characters or is too long
    InvalidQuadkey(String),
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidLatitude(lat) => {
                write!(
                    f,
                    "Invalid latitude: {} (must be between {} and {})",
                    lat, MIN_LAT, MAX_LAT
                )
            }
            CoordError::InvalidLongitude(lon) => {
                write!(
                    f,
                    "Invalid longitude: {} (must be between {} and {})",
                    lon, MIN_LON, MAX_LON
                )
            }
            CoordError::InvalidZoom(zoom) => {
                write!(
                    f,
                    "Invalid zoom level: {} (must be between {} and {})",
                    zoom, MIN_ZOOM, MAX_ZOOM
                )
            }
            CoordError::OutsideMatrix(tile) => {
                write!(
                    f,
                    "Invalid tile: {} (x and y must be below {} at zoom {})",
                    tile,
                    tile.matrix_size(),
                    tile.zoom
                )
            }
            CoordError::InvalidQuadkey(quadkey) => {
                write!(
                    f,
                    "Invalid quadkey: '{}' (must contain only digits 0-3 and length <= {})",
                    quadkey, MAX_ZOOM
                )
            }
        }
    }
}

impl std::error::Error for CoordError {}
