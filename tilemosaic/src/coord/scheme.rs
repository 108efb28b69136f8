//! Tiling schemes the index can compute spatial keys in.

use std::fmt;

use super::types::{Bounds, CoordError, TileCoord, MAX_ZOOM};
use super::{quadkey_to_tile, tile_bounds, tile_for_point, tile_to_quadkey, tiles_covering};

/// A hierarchical tile matrix with string spatial keys.
///
/// A tile's key must be a prefix of the keys of all its descendants. The
/// branching factor is up to the implementation: key resolution only walks
/// `parent` and `children`.
pub trait TileScheme: Send + Sync + fmt::Debug {
    /// Identifier of the tile matrix set (e.g. `WebMercatorQuad`).
    fn name(&self) -> &str;

    /// Deepest zoom level keys can be computed for.
    fn max_zoom(&self) -> u8;

    /// Parent one level up; `None` at the root.
    fn parent(&self, tile: &TileCoord) -> Option<TileCoord>;

    /// Direct children one level down.
    fn children(&self, tile: &TileCoord) -> Vec<TileCoord>;

    /// Spatial key for a tile.
    fn key(&self, tile: &TileCoord) -> String;

    /// Inverse of [`TileScheme::key`].
    fn tile_from_key(&self, key: &str) -> Result<TileCoord, CoordError>;

    /// Tile containing a geographic point.
    fn tile_at(&self, lon: f64, lat: f64, zoom: u8) -> TileCoord;

    /// Geographic bounds of a tile.
    fn bounds(&self, tile: &TileCoord) -> Bounds;

    /// Tiles at `zoom` covering a geographic rectangle, in scan order.
    fn covering(&self, bounds: &Bounds, zoom: u8) -> Vec<TileCoord>;
}

/// The standard Web Mercator quadtree with Bing quadkeys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WebMercatorQuad;

impl TileScheme for WebMercatorQuad {
    fn name(&self) -> &str {
        "WebMercatorQuad"
    }

    fn max_zoom(&self) -> u8 {
        MAX_ZOOM
    }

    fn parent(&self, tile: &TileCoord) -> Option<TileCoord> {
        tile.parent()
    }

    fn children(&self, tile: &TileCoord) -> Vec<TileCoord> {
        tile.children().to_vec()
    }

    fn key(&self, tile: &TileCoord) -> String {
        tile_to_quadkey(tile)
    }

    fn tile_from_key(&self, key: &str) -> Result<TileCoord, CoordError> {
        quadkey_to_tile(key)
    }

    fn tile_at(&self, lon: f64, lat: f64, zoom: u8) -> TileCoord {
        tile_for_point(lon, lat, zoom)
    }

    fn bounds(&self, tile: &TileCoord) -> Bounds {
        tile_bounds(tile)
    }

    fn covering(&self, bounds: &Bounds, zoom: u8) -> Vec<TileCoord> {
        tiles_covering(bounds, zoom)
    }
}
