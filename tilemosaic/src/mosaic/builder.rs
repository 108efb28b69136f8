//! Building a mosaic document from asset footprints.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::document::{MosaicIndex, MOSAIC_SCHEMA_VERSION};
use super::types::Center;
use crate::coord::{Bounds, TileScheme, WebMercatorQuad};
use crate::footprint::Footprint;

/// Inset applied to a footprint's east and south edges so a footprint
/// ending exactly on a tile boundary does not claim the neighbouring tile.
const EDGE_EPSILON: f64 = 1e-11;

/// Reasons a set of footprints cannot be reduced to an index.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("no footprints to index")]
    Empty,

    #[error("footprint {index} has an empty asset path")]
    EmptyPath { index: usize },

    #[error("footprint '{path}' has invalid bounds {bounds}")]
    InvalidBounds { path: String, bounds: Bounds },

    #[error("invalid zoom levels: minzoom {minzoom}, maxzoom {maxzoom}, quadkey zoom {quadkey_zoom}")]
    ZoomRange {
        minzoom: u8,
        maxzoom: u8,
        quadkey_zoom: u8,
    },

    #[error("minimum tile cover {0} must be between 0 and 1")]
    TileCover(f64),

    #[error("no footprint covers a tile at zoom {quadkey_zoom}")]
    NoCoverage { quadkey_zoom: u8 },
}

/// Settings for building a mosaic from footprints.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOptions {
    pub minzoom: u8,
    pub maxzoom: u8,
    /// Zoom to compute quadkeys at; `minzoom` when `None`
    pub quadkey_zoom: Option<u8>,
    /// Drop tile/asset pairs where the asset covers less than this
    /// fraction of the tile
    pub minimum_tile_cover: Option<f64>,
    /// Order each key's assets by descending tile coverage
    pub tile_cover_sort: bool,
    pub name: Option<String>,
    pub description: Option<String>,
    pub attribution: Option<String>,
}

impl BuildOptions {
    pub fn new(minzoom: u8, maxzoom: u8) -> Self {
        Self {
            minzoom,
            maxzoom,
            quadkey_zoom: None,
            minimum_tile_cover: None,
            tile_cover_sort: false,
            name: None,
            description: None,
            attribution: None,
        }
    }

    pub fn with_quadkey_zoom(mut self, zoom: u8) -> Self {
        self.quadkey_zoom = Some(zoom);
        self
    }

    pub fn with_minimum_tile_cover(mut self, cover: f64) -> Self {
        self.minimum_tile_cover = Some(cover);
        self
    }

    pub fn with_tile_cover_sort(mut self, sort: bool) -> Self {
        self.tile_cover_sort = sort;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Effective quadkey zoom.
    pub fn quadkey_zoom(&self) -> u8 {
        self.quadkey_zoom.unwrap_or(self.minzoom)
    }
}

/// Reduces footprints to a mosaic document in a given tiling scheme.
#[derive(Debug, Clone)]
pub struct MosaicBuilder {
    scheme: Arc<dyn TileScheme>,
    options: BuildOptions,
}

impl MosaicBuilder {
    pub fn new(scheme: Arc<dyn TileScheme>, options: BuildOptions) -> Self {
        Self { scheme, options }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Builds a fresh document.
    ///
    /// Each footprint is assigned to every tile at the quadkey zoom its
    /// bounds intersect. Within a key, assets keep footprint order unless
    /// `tile_cover_sort` is set. The document bounds are the union of all
    /// footprint bounds.
    pub fn build(&self, footprints: &[Footprint]) -> Result<MosaicIndex, BuildError> {
        let options = &self.options;
        let quadkey_zoom = options.quadkey_zoom();

        if options.minzoom > options.maxzoom
            || quadkey_zoom < options.minzoom
            || quadkey_zoom > self.scheme.max_zoom()
            || options.maxzoom > self.scheme.max_zoom()
        {
            return Err(BuildError::ZoomRange {
                minzoom: options.minzoom,
                maxzoom: options.maxzoom,
                quadkey_zoom,
            });
        }
        if let Some(cover) = options.minimum_tile_cover {
            if !(0.0..=1.0).contains(&cover) {
                return Err(BuildError::TileCover(cover));
            }
        }
        if footprints.is_empty() {
            return Err(BuildError::Empty);
        }

        let mut bounds: Option<Bounds> = None;
        let mut tiles: BTreeMap<String, Vec<(f64, String)>> = BTreeMap::new();

        for (index, footprint) in footprints.iter().enumerate() {
            if footprint.path.is_empty() {
                return Err(BuildError::EmptyPath { index });
            }
            if !footprint.bounds.is_valid() {
                return Err(BuildError::InvalidBounds {
                    path: footprint.path.clone(),
                    bounds: footprint.bounds,
                });
            }

            bounds = Some(match bounds {
                Some(b) => b.union(&footprint.bounds),
                None => footprint.bounds,
            });

            for (key, cover) in self.cover(&footprint.bounds, quadkey_zoom) {
                if options.minimum_tile_cover.is_some_and(|min| cover < min) {
                    continue;
                }
                tiles
                    .entry(key)
                    .or_default()
                    .push((cover, footprint.path.clone()));
            }
        }

        if tiles.is_empty() {
            return Err(BuildError::NoCoverage { quadkey_zoom });
        }

        let tiles = tiles
            .into_iter()
            .map(|(key, mut assets)| {
                if options.tile_cover_sort {
                    assets.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
                }
                (key, assets.into_iter().map(|(_, path)| path).collect())
            })
            .collect();

        // Non-empty input guarantees at least one footprint was folded in
        let bounds = bounds.ok_or(BuildError::Empty)?;

        debug!(
            footprints = footprints.len(),
            quadkey_zoom,
            %bounds,
            "built mosaic from footprints"
        );

        Ok(MosaicIndex {
            mosaicjson: MOSAIC_SCHEMA_VERSION.to_string(),
            name: options.name.clone(),
            description: options.description.clone(),
            version: semver::Version::new(1, 0, 0),
            attribution: options.attribution.clone(),
            minzoom: options.minzoom,
            maxzoom: options.maxzoom,
            quadkey_zoom: Some(quadkey_zoom),
            bounds,
            center: Some(Center::of(&bounds, options.minzoom)),
            tiles,
        })
    }

    /// Keys intersected by `bounds` with the fraction of each tile covered.
    fn cover(&self, bounds: &Bounds, zoom: u8) -> Vec<(String, f64)> {
        let inset = |extent: f64| {
            if extent > 2.0 * EDGE_EPSILON {
                EDGE_EPSILON
            } else {
                0.0
            }
        };
        let probe = Bounds::new(
            bounds.xmin,
            bounds.ymin + inset(bounds.height()),
            bounds.xmax - inset(bounds.width()),
            bounds.ymax,
        );

        self.scheme
            .covering(&probe, zoom)
            .into_iter()
            .map(|tile| {
                let tile_bounds = self.scheme.bounds(&tile);
                let cover = bounds
                    .intersection(&tile_bounds)
                    .map(|overlap| overlap.area() / tile_bounds.area())
                    .unwrap_or(0.0);
                (self.scheme.key(&tile), cover)
            })
            .collect()
    }
}

impl MosaicIndex {
    /// Builds a Web Mercator mosaic from footprints.
    pub fn from_footprints(
        footprints: &[Footprint],
        options: BuildOptions,
    ) -> Result<Self, BuildError> {
        MosaicBuilder::new(Arc::new(WebMercatorQuad), options).build(footprints)
    }
}
