//! Quadkey resolution: maps a query tile at any zoom onto the index keys
//! whose cells overlap it.

use std::sync::Arc;

use crate::coord::{TileCoord, TileScheme, WebMercatorQuad};

/// Resolves query tiles to spatial keys at the index zoom.
///
/// - query zoom == index zoom: the tile's own key
/// - query zoom > index zoom: the single ancestor key
/// - query zoom < index zoom: one key per descendant at the index zoom
///
/// `index_zoom` must not exceed the scheme's maximum zoom; that is a caller
/// contract and is not clamped.
#[derive(Debug, Clone)]
pub struct QuadkeyResolver {
    scheme: Arc<dyn TileScheme>,
}

impl QuadkeyResolver {
    pub fn new(scheme: Arc<dyn TileScheme>) -> Self {
        Self { scheme }
    }

    pub fn scheme(&self) -> &Arc<dyn TileScheme> {
        &self.scheme
    }

    /// Keys at `index_zoom` overlapping `tile`.
    ///
    /// Descendant keys come out in breadth-first child order, which is the
    /// order asset lists are concatenated in.
    pub fn resolve(&self, tile: TileCoord, index_zoom: u8) -> Vec<String> {
        debug_assert!(
            index_zoom <= self.scheme.max_zoom(),
            "index zoom {} beyond scheme maximum {}",
            index_zoom,
            self.scheme.max_zoom()
        );

        if tile.zoom > index_zoom {
            let mut ancestor = tile;
            for _ in 0..(tile.zoom - index_zoom) {
                match self.scheme.parent(&ancestor) {
                    Some(parent) => ancestor = parent,
                    None => break,
                }
            }
            return vec![self.scheme.key(&ancestor)];
        }

        if tile.zoom < index_zoom {
            let mut level = vec![tile];
            for _ in 0..(index_zoom - tile.zoom) {
                level = level
                    .iter()
                    .flat_map(|t| self.scheme.children(t))
                    .collect();
            }
            return level
                .iter()
                .filter(|t| t.zoom == index_zoom)
                .map(|t| self.scheme.key(t))
                .collect();
        }

        vec![self.scheme.key(&tile)]
    }
}

impl Default for QuadkeyResolver {
    fn default() -> Self {
        Self::new(Arc::new(WebMercatorQuad))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{quadkey_to_tile, tile_to_quadkey};
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_same_zoom_returns_own_key() {
        let resolver = QuadkeyResolver::default();
        let tile = quadkey_to_tile("0123").unwrap();
        assert_eq!(resolver.resolve(tile, 4), vec!["0123".to_string()]);
    }

    #[test]
    fn test_finer_query_returns_ancestor() {
        let resolver = QuadkeyResolver::default();
        let tile = quadkey_to_tile("01230321").unwrap();
        assert_eq!(resolver.resolve(tile, 4), vec!["0123".to_string()]);
    }

    #[test]
    fn test_coarser_query_returns_all_descendants() {
        let resolver = QuadkeyResolver::default();
        let tile = quadkey_to_tile("01").unwrap();
        let keys = resolver.resolve(tile, 4);

        assert_eq!(keys.len(), 16);
        assert!(keys.contains(&"0123".to_string()));
        assert!(keys.iter().all(|k| k.len() == 4 && k.starts_with("01")));

        let unique: HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), 16);
    }

    #[test]
    fn test_root_query_at_zoom_one() {
        let resolver = QuadkeyResolver::default();
        let keys = resolver.resolve(TileCoord::from_xyz(0, 0, 0), 1);
        assert_eq!(keys, vec!["0", "1", "3", "2"]);
    }

    /// A scheme splitting every tile into a 3×3 grid.
    #[derive(Debug)]
    struct NineWay;

    impl TileScheme for NineWay {
        fn name(&self) -> &str {
            "NineWay"
        }
        fn max_zoom(&self) -> u8 {
            10
        }
        fn parent(&self, tile: &TileCoord) -> Option<TileCoord> {
            (tile.zoom > 0).then(|| TileCoord {
                row: tile.row / 3,
                col: tile.col / 3,
                zoom: tile.zoom - 1,
            })
        }
        fn children(&self, tile: &TileCoord) -> Vec<TileCoord> {
            let mut out = Vec::with_capacity(9);
            for dr in 0..3 {
                for dc in 0..3 {
                    out.push(TileCoord {
                        row: tile.row * 3 + dr,
                        col: tile.col * 3 + dc,
                        zoom: tile.zoom + 1,
                    });
                }
            }
            out
        }
        fn key(&self, tile: &TileCoord) -> String {
            format!("{}/{}/{}", tile.zoom, tile.col, tile.row)
        }
        fn tile_from_key(&self, _key: &str) -> Result<TileCoord, crate::coord::CoordError> {
            unimplemented!()
        }
        fn tile_at(&self, _lon: f64, _lat: f64, _zoom: u8) -> TileCoord {
            unimplemented!()
        }
        fn bounds(&self, _tile: &TileCoord) -> crate::coord::Bounds {
            unimplemented!()
        }
        fn covering(&self, _bounds: &crate::coord::Bounds, _zoom: u8) -> Vec<TileCoord> {
            unimplemented!()
        }
    }

    #[test]
    fn test_other_branching_factors() {
        let resolver = QuadkeyResolver::new(Arc::new(NineWay));
        let keys = resolver.resolve(TileCoord::from_xyz(0, 0, 0), 2);
        assert_eq!(keys.len(), 81);

        let up = resolver.resolve(TileCoord::from_xyz(26, 26, 3), 1);
        assert_eq!(up, vec!["1/2/2".to_string()]);
    }

    proptest! {
        #[test]
        fn prop_finer_tiles_resolve_to_single_ancestor(
            col in 0u32..4096,
            row in 0u32..4096,
            index_zoom in 0u8..12,
        ) {
            let resolver = QuadkeyResolver::default();
            let tile = TileCoord { row, col, zoom: 12 };
            let keys = resolver.resolve(tile, index_zoom);

            prop_assert_eq!(keys.len(), 1);
            let key = tile_to_quadkey(&tile);
            prop_assert_eq!(&keys[0], &key[..index_zoom as usize]);
        }

        #[test]
        fn prop_coarser_tiles_resolve_to_exhaustive_descendants(
            col in 0u32..64,
            row in 0u32..64,
            depth in 1u8..4,
        ) {
            let resolver = QuadkeyResolver::default();
            let tile = TileCoord { row, col, zoom: 6 };
            let keys = resolver.resolve(tile, 6 + depth);

            prop_assert_eq!(keys.len(), 4usize.pow(depth as u32));
            let prefix = tile_to_quadkey(&tile);
            let unique: HashSet<_> = keys.iter().collect();
            prop_assert_eq!(unique.len(), keys.len());
            for key in &keys {
                prop_assert!(key.starts_with(&prefix));
                prop_assert_eq!(key.len(), (6 + depth) as usize);
            }
        }
    }
}
