//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (latitude/longitude),
//! Web Mercator tile coordinates and quadkeys, plus the [`TileScheme`]
//! abstraction the index resolves keys through.

mod scheme;
mod types;

pub use scheme::{TileScheme, WebMercatorQuad};
pub use types::{
    Bounds, CoordError, TileCoord, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT, MIN_LON, MIN_ZOOM,
};

use std::f64::consts::PI;

/// Converts geographic coordinates to tile coordinates.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees (-85.05112878 to 85.05112878)
/// * `lon` - Longitude in degrees (-180.0 to 180.0)
/// * `zoom` - Zoom level (0 to 30)
///
/// # Returns
///
/// A `Result` containing the tile coordinates or an error if inputs are invalid.
#[inline]
pub fn to_tile_coords(lat: f64, lon: f64, zoom: u8) -> Result<TileCoord, CoordError> {
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if !(MIN_LON..=MAX_LON).contains(&lon) {
        return Err(CoordError::InvalidLongitude(lon));
    }
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }
    Ok(tile_for_point(lon, lat, zoom))
}

/// Tile containing a point, truncating the point into the Web Mercator extent.
///
/// Points on the eastern or southern edge of the world resolve to the last
/// column or row rather than falling off the matrix.
#[inline]
pub fn tile_for_point(lon: f64, lat: f64, zoom: u8) -> TileCoord {
    let lon = lon.clamp(MIN_LON, MAX_LON);
    let lat = lat.clamp(MIN_LAT, MAX_LAT);

    let n = 2.0_f64.powi(zoom as i32);
    let max_index = (n - 1.0).max(0.0);

    let col = ((lon + 180.0) / 360.0 * n).floor().clamp(0.0, max_index);

    // Web Mercator projection of the latitude
    let lat_rad = lat * PI / 180.0;
    let row = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n)
        .floor()
        .clamp(0.0, max_index);

    TileCoord {
        row: row as u32,
        col: col as u32,
        zoom,
    }
}

/// Converts tile coordinates back to geographic coordinates.
///
/// Returns the latitude/longitude of the tile's northwest corner.
#[inline]
pub fn tile_to_lat_lon(tile: &TileCoord) -> (f64, f64) {
    let n = 2.0_f64.powi(tile.zoom as i32);

    let lon = tile.col as f64 / n * 360.0 - 180.0;

    // Inverse Web Mercator
    let y = tile.row as f64 / n;
    let lat_rad = (PI * (1.0 - 2.0 * y)).sinh().atan();
    let lat = lat_rad * 180.0 / PI;

    (lat, lon)
}

/// Geographic bounds of a tile.
#[inline]
pub fn tile_bounds(tile: &TileCoord) -> Bounds {
    let (north, west) = tile_to_lat_lon(tile);
    let (south, east) = tile_to_lat_lon(&TileCoord {
        row: tile.row + 1,
        col: tile.col + 1,
        zoom: tile.zoom,
    });
    Bounds::new(west, south, east, north)
}

/// Encodes a tile as a Bing-style quadkey.
///
/// Each character encodes one zoom level, so a tile's quadkey is a prefix
/// of the quadkeys of all its descendants. Zoom 0 encodes as the empty string.
pub fn tile_to_quadkey(tile: &TileCoord) -> String {
    let mut quadkey = String::with_capacity(tile.zoom as usize);
    for level in (1..=tile.zoom).rev() {
        let mask = 1u32 << (level - 1);
        let mut digit = b'0';
        if tile.col & mask != 0 {
            digit += 1;
        }
        if tile.row & mask != 0 {
            digit += 2;
        }
        quadkey.push(digit as char);
    }
    quadkey
}

/// Decodes a quadkey back into tile coordinates.
pub fn quadkey_to_tile(quadkey: &str) -> Result<TileCoord, CoordError> {
    if quadkey.len() > MAX_ZOOM as usize {
        return Err(CoordError::InvalidQuadkey(quadkey.to_string()));
    }

    let mut row = 0u32;
    let mut col = 0u32;
    for ch in quadkey.chars() {
        row <<= 1;
        col <<= 1;
        match ch {
            '0' => {}
            '1' => col |= 1,
            '2' => row |= 1,
            '3' => {
                col |= 1;
                row |= 1;
            }
            _ => return Err(CoordError::InvalidQuadkey(quadkey.to_string())),
        }
    }

    Ok(TileCoord {
        row,
        col,
        zoom: quadkey.len() as u8,
    })
}

/// Every tile at `zoom` intersecting `bounds`, scanned column by column.
///
/// The range runs inclusively from the tile holding the top-left corner to
/// the tile holding the bottom-right corner.
pub fn tiles_covering(bounds: &Bounds, zoom: u8) -> Vec<TileCoord> {
    let top_left = tile_for_point(bounds.xmin, bounds.ymax, zoom);
    let bottom_right = tile_for_point(bounds.xmax, bounds.ymin, zoom);

    let mut tiles = Vec::new();
    for col in top_left.col..=bottom_right.col {
        for row in top_left.row..=bottom_right.row {
            tiles.push(TileCoord { row, col, zoom });
        }
    }
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_york_city_at_zoom_16() {
        let tile = to_tile_coords(40.7128, -74.0060, 16).unwrap();
        assert_eq!(tile.row, 24640);
        assert_eq!(tile.col, 19295);
        assert_eq!(tile.zoom, 16);
    }

    #[test]
    fn test_invalid_latitude() {
        let result = to_tile_coords(90.0, 0.0, 10);
        assert!(matches!(result, Err(CoordError::InvalidLatitude(_))));
    }

    #[test]
    fn test_invalid_zoom() {
        let result = to_tile_coords(0.0, 0.0, 31);
        assert!(matches!(result, Err(CoordError::InvalidZoom(31))));
    }

    #[test]
    fn test_tile_for_point_clamps_world_edges() {
        let east = tile_for_point(180.0, 0.0, 3);
        assert_eq!(east.col, 7);

        let south = tile_for_point(0.0, -90.0, 3);
        assert_eq!(south.row, 7);

        let north = tile_for_point(0.0, 90.0, 3);
        assert_eq!(north.row, 0);
    }

    #[test]
    fn test_tile_to_lat_lon_at_equator() {
        let tile = TileCoord {
            row: 512,
            col: 512,
            zoom: 10,
        };
        let (lat, lon) = tile_to_lat_lon(&tile);
        assert!(lat.abs() < 1e-9, "Should be on the equator");
        assert!(lon.abs() < 1e-9, "Should be on the prime meridian");
    }

    #[test]
    fn test_tile_bounds_of_world_tile() {
        let bounds = tile_bounds(&TileCoord {
            row: 0,
            col: 0,
            zoom: 0,
        });
        assert!((bounds.xmin + 180.0).abs() < 1e-9);
        assert!((bounds.xmax - 180.0).abs() < 1e-9);
        assert!((bounds.ymax - MAX_LAT).abs() < 1e-6);
        assert!((bounds.ymin - MIN_LAT).abs() < 1e-6);
    }

    #[test]
    fn test_quadkey_known_values() {
        // Values from the Bing Maps tile system documentation
        let tile = TileCoord {
            row: 5,
            col: 3,
            zoom: 3,
        };
        assert_eq!(tile_to_quadkey(&tile), "213");
        assert_eq!(quadkey_to_tile("213").unwrap(), tile);
    }

    #[test]
    fn test_quadkey_zoom_zero_is_empty() {
        let root = TileCoord {
            row: 0,
            col: 0,
            zoom: 0,
        };
        assert_eq!(tile_to_quadkey(&root), "");
        assert_eq!(quadkey_to_tile("").unwrap(), root);
    }

    #[test]
    fn test_quadkey_rejects_bad_digits() {
        assert!(matches!(
            quadkey_to_tile("0124"),
            Err(CoordError::InvalidQuadkey(_))
        ));
        let too_long = "0".repeat(31);
        assert!(quadkey_to_tile(&too_long).is_err());
    }

    #[test]
    fn test_tiles_covering_scans_columns_first() {
        let tile = TileCoord {
            row: 5,
            col: 3,
            zoom: 3,
        };
        let bounds = tile_bounds(&tile);
        // A box straddling the tile's south-east corner touches 2x2 tiles
        let probe = Bounds::new(
            bounds.xmax - 1.0,
            bounds.ymin - 1.0,
            bounds.xmax + 1.0,
            bounds.ymin + 1.0,
        );
        let tiles = tiles_covering(&probe, 3);
        let expected = vec![
            TileCoord::from_xyz(3, 5, 3),
            TileCoord::from_xyz(3, 6, 3),
            TileCoord::from_xyz(4, 5, 3),
            TileCoord::from_xyz(4, 6, 3),
        ];
        assert_eq!(tiles, expected);
    }

    proptest! {
        #[test]
        fn prop_quadkey_is_prefix_of_descendants(
            col in 0u32..1024,
            row in 0u32..1024,
            depth in 1u8..6,
        ) {
            let tile = TileCoord { row, col, zoom: 10 };
            let parent_key = tile_to_quadkey(&tile);
            for child in tile.children() {
                let mut descendant = child;
                for _ in 1..depth {
                    descendant = descendant.children()[0];
                }
                prop_assert!(tile_to_quadkey(&descendant).starts_with(&parent_key));
            }
        }

        #[test]
        fn prop_quadkey_decodes_to_same_tile(
            col in 0u32..65536,
            row in 0u32..65536,
        ) {
            let tile = TileCoord { row, col, zoom: 16 };
            let key = tile_to_quadkey(&tile);
            prop_assert_eq!(key.len(), 16);
            prop_assert_eq!(quadkey_to_tile(&key).unwrap(), tile);
        }
    }
}
