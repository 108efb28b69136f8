//! Asset footprints: the observations a mosaic is built and updated from.
//!
//! A [`Footprint`] pairs an asset identifier with its geographic bounds.
//! Footprints can be parsed from GeoJSON features (`properties.path` plus a
//! geometry or `bbox`) or extracted in bulk from source files through the
//! bounded worker pool in [`get_footprints`].

mod pool;

pub use pool::{get_footprints, FootprintExtractor, NoOpProgress, ProgressObserver};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::coord::Bounds;

/// Errors raised while turning raw input into footprints.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FootprintError {
    #[error("invalid feature JSON: {0}")]
    Json(String),

    #[error("feature {index} has no 'path' property")]
    MissingPath { index: usize },

    #[error("feature {index} has neither a bbox nor geometry coordinates")]
    MissingGeometry { index: usize },
}

/// An asset and the geographic area it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    /// Asset identifier (path or URI)
    pub path: String,
    /// Geographic bounds of the asset's data
    pub bounds: Bounds,
}

impl Footprint {
    pub fn new(path: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            path: path.into(),
            bounds,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    bbox: Option<[f64; 4]>,
    #[serde(default)]
    geometry: Option<Geometry>,
    #[serde(default)]
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(default)]
    coordinates: Value,
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    #[serde(default)]
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeatureInput {
    Collection { features: Vec<Feature> },
    List(Vec<Feature>),
}

/// Parses a GeoJSON `FeatureCollection` or a bare array of features.
///
/// Each feature must carry `properties.path`; bounds come from the feature's
/// `bbox` when present, otherwise from the extent of its geometry
/// coordinates.
pub fn footprints_from_geojson(json: &str) -> Result<Vec<Footprint>, FootprintError> {
    let input: FeatureInput =
        serde_json::from_str(json).map_err(|e| FootprintError::Json(e.to_string()))?;
    let features = match input {
        FeatureInput::Collection { features } => features,
        FeatureInput::List(features) => features,
    };

    features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| {
            let path = feature
                .properties
                .path
                .filter(|p| !p.is_empty())
                .ok_or(FootprintError::MissingPath { index })?;

            let bounds = match (feature.bbox, feature.geometry) {
                (Some(bbox), _) => Bounds::from(bbox),
                (None, Some(geometry)) => coordinates_extent(&geometry.coordinates)
                    .ok_or(FootprintError::MissingGeometry { index })?,
                (None, None) => return Err(FootprintError::MissingGeometry { index }),
            };

            Ok(Footprint { path, bounds })
        })
        .collect()
}

/// Extent of every `[x, y, ...]` position nested anywhere in `value`.
fn coordinates_extent(value: &Value) -> Option<Bounds> {
    fn visit(value: &Value, extent: &mut Option<Bounds>) {
        let Value::Array(items) = value else {
            return;
        };

        if let (Some(x), Some(y)) = (
            items.first().and_then(Value::as_f64),
            items.get(1).and_then(Value::as_f64),
        ) {
            let point = Bounds::new(x, y, x, y);
            *extent = Some(match extent {
                Some(current) => current.union(&point),
                None => point,
            });
            return;
        }

        for item in items {
            visit(item, extent);
        }
    }

    let mut extent = None;
    visit(value, &mut extent);
    extent
}
