//! Coordinate reference systems and the single transform boundary.
//!
//! Public query entry points accept coordinates in a caller-chosen [`Crs`]
//! and convert them once, through a [`CoordTransformer`], into the index's
//! geographic reference before any key resolution happens.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::coord::{Bounds, MAX_LAT, MIN_LAT};

/// Spherical Mercator earth radius in metres.
const EARTH_RADIUS: f64 = 6_378_137.0;

/// Points sampled along each bounds edge when transforming a rectangle.
const DENSIFY_POINTS: usize = 21;

/// A coordinate reference system identified by EPSG code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Crs {
    /// Geographic longitude/latitude, EPSG:4326
    #[default]
    Wgs84,
    /// Spherical Mercator metres, EPSG:3857
    WebMercator,
    /// Any other EPSG code
    Epsg(u32),
}

impl Crs {
    /// Builds a `Crs`, normalizing the well-known codes.
    pub fn from_epsg(code: u32) -> Self {
        match code {
            4326 => Crs::Wgs84,
            3857 | 900913 => Crs::WebMercator,
            other => Crs::Epsg(other),
        }
    }

    pub fn epsg(&self) -> u32 {
        match self {
            Crs::Wgs84 => 4326,
            Crs::WebMercator => 3857,
            Crs::Epsg(code) => *code,
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

impl FromStr for Crs {
    type Err = CrsError;

    /// Accepts `EPSG:4326`, `epsg:3857` or a bare code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let code = match trimmed.split_once(':') {
            Some((authority, code)) if authority.eq_ignore_ascii_case("epsg") => code,
            Some(_) => return Err(CrsError::Parse(s.to_string())),
            None => trimmed,
        };
        code.parse::<u32>()
            .map(Crs::from_epsg)
            .map_err(|_| CrsError::Parse(s.to_string()))
    }
}

/// Coordinate transform errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CrsError {
    #[error("unsupported transform from {from} to {to}")]
    Unsupported { from: Crs, to: Crs },

    #[error("cannot parse CRS identifier '{0}'")]
    Parse(String),

    #[error("coordinate ({x}, {y}) is not finite")]
    NonFinite { x: f64, y: f64 },
}

/// Converts coordinates between reference systems.
pub trait CoordTransformer: Send + Sync {
    /// Transforms a single point.
    fn transform_point(&self, from: Crs, to: Crs, x: f64, y: f64) -> Result<(f64, f64), CrsError>;

    /// Transforms a rectangle, densifying its edges so curved edges in the
    /// target system are fully enclosed.
    fn transform_bounds(&self, from: Crs, to: Crs, bounds: &Bounds) -> Result<Bounds, CrsError> {
        if from == to {
            return Ok(*bounds);
        }

        let mut out = Bounds::new(f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        let steps = (DENSIFY_POINTS - 1) as f64;
        for i in 0..DENSIFY_POINTS {
            let t = i as f64 / steps;
            let x = bounds.xmin + bounds.width() * t;
            let y = bounds.ymin + bounds.height() * t;
            for (px, py) in [
                (x, bounds.ymin),
                (x, bounds.ymax),
                (bounds.xmin, y),
                (bounds.xmax, y),
            ] {
                let (tx, ty) = self.transform_point(from, to, px, py)?;
                out.xmin = out.xmin.min(tx);
                out.ymin = out.ymin.min(ty);
                out.xmax = out.xmax.max(tx);
                out.ymax = out.ymax.max(ty);
            }
        }
        Ok(out)
    }
}

/// Built-in transforms between EPSG:4326 and EPSG:3857.
///
/// Any other pair is reported as [`CrsError::Unsupported`]; plug in a
/// different [`CoordTransformer`] to cover more systems.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTransformer;

impl CoordTransformer for BuiltinTransformer {
    fn transform_point(&self, from: Crs, to: Crs, x: f64, y: f64) -> Result<(f64, f64), CrsError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(CrsError::NonFinite { x, y });
        }
        match (from, to) {
            (a, b) if a == b => Ok((x, y)),
            (Crs::Wgs84, Crs::WebMercator) => Ok(lon_lat_to_mercator(x, y)),
            (Crs::WebMercator, Crs::Wgs84) => Ok(mercator_to_lon_lat(x, y)),
            (from, to) => Err(CrsError::Unsupported { from, to }),
        }
    }
}

fn lon_lat_to_mercator(lon: f64, lat: f64) -> (f64, f64) {
    let lat = lat.clamp(MIN_LAT, MAX_LAT);
    let x = EARTH_RADIUS * lon.to_radians();
    let y = EARTH_RADIUS * (PI / 4.0 + lat.to_radians() / 2.0).tan().ln();
    (x, y)
}

fn mercator_to_lon_lat(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
    (lon, lat)
}
