//! The mosaic engine: one document, its backend, and the query paths.
//!
//! [`MosaicEngine`] composes a [`Backend`] for persistence, a
//! [`RasterReader`] for pixel access and a shared [`AssetCache`]. The
//! document lives behind a copy-on-update snapshot: queries clone an
//! `Arc<IndexSnapshot>` and never observe a half-applied update.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};

use crate::backend::Backend;
use crate::cache::{dedup_preserving_order, AssetCache};
use crate::compositor::{mosaic_tile, multi_point, PixelSelectionMethod, PointResults, TileComposition};
use crate::coord::{Bounds, CoordError, TileCoord, TileScheme};
use crate::crs::{BuiltinTransformer, CoordTransformer, Crs};
use crate::error::{MosaicError, Result};
use crate::footprint::Footprint;
use crate::mosaic::{IndexSnapshot, MosaicIndex, MosaicInfo, MosaicUpdater, UpdateOptions};
use crate::reader::{RasterReader, ReadOptions};
use crate::resolver::QuadkeyResolver;

/// Geographic reference the index keys are computed in.
pub const GEOGRAPHIC_CRS: Crs = Crs::Wgs84;

/// Default number of assets read at once.
pub const DEFAULT_MAX_CONCURRENCY: usize = 20;

/// Query behaviour settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    /// How overlapping tile images are combined
    pub pixel_selection: PixelSelectionMethod,
    /// Upper bound on concurrent asset reads per query
    pub max_concurrency: usize,
    /// Cover filtering applied when updating from footprints
    pub update: UpdateOptions,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            pixel_selection: PixelSelectionMethod::default(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            update: UpdateOptions::default(),
        }
    }
}

/// Query and update engine over a single mosaic document.
pub struct MosaicEngine<B: Backend, R: RasterReader> {
    backend: B,
    reader: R,
    snapshot: RwLock<Arc<IndexSnapshot>>,
    writer: Mutex<()>,
    cache: Arc<AssetCache>,
    resolver: QuadkeyResolver,
    transformer: Arc<dyn CoordTransformer>,
    options: EngineOptions,
}

impl<B: Backend, R: RasterReader> MosaicEngine<B, R> {
    /// Loads the document stored in `backend`.
    pub fn open(backend: B, reader: R) -> Result<Self> {
        let document = backend.read()?;
        info!(
            location = backend.location(),
            keys = document.tiles.len(),
            version = %document.version,
            "opened mosaic"
        );
        Ok(Self::with_document(backend, reader, document))
    }

    /// Wraps an in-memory document; nothing is persisted until
    /// [`write`](Self::write) or [`update`](Self::update).
    pub fn with_document(backend: B, reader: R, document: MosaicIndex) -> Self {
        Self {
            backend,
            reader,
            snapshot: RwLock::new(Arc::new(IndexSnapshot::new(document))),
            writer: Mutex::new(()),
            cache: Arc::new(AssetCache::default()),
            resolver: QuadkeyResolver::default(),
            transformer: Arc::new(BuiltinTransformer),
            options: EngineOptions::default(),
        }
    }

    /// Shares an asset cache, typically between engines.
    pub fn with_cache(mut self, cache: Arc<AssetCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_scheme(mut self, scheme: Arc<dyn TileScheme>) -> Self {
        self.resolver = QuadkeyResolver::new(scheme);
        self
    }

    pub fn with_transformer(mut self, transformer: Arc<dyn CoordTransformer>) -> Self {
        self.transformer = transformer;
        self
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn cache(&self) -> &Arc<AssetCache> {
        &self.cache
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Current document snapshot.
    pub fn snapshot(&self) -> Arc<IndexSnapshot> {
        self.snapshot.read().clone()
    }

    /// Copy of the current document.
    pub fn document(&self) -> MosaicIndex {
        self.snapshot().document().clone()
    }

    /// Fingerprint of the current document.
    pub fn mosaic_id(&self) -> String {
        self.snapshot().mosaic_id().to_string()
    }

    pub fn info(&self, include_quadkeys: bool) -> MosaicInfo {
        self.snapshot().document().info(include_quadkeys)
    }

    /// Ordered, deduplicated assets for `tile` through the cache.
    pub fn get_assets(&self, tile: TileCoord) -> Arc<Vec<String>> {
        let snapshot = self.snapshot();
        self.cache
            .get_assets(self.backend.location(), &snapshot, &self.resolver, tile)
    }

    /// Assets for the XYZ tile.
    pub fn assets_for_tile(&self, x: u32, y: u32, z: u8) -> Result<Vec<String>> {
        let tile = self.checked_tile(x, y, z)?;
        Ok(self.get_assets(tile).to_vec())
    }

    /// Assets for the index cell containing a point given in `crs`.
    pub fn assets_for_point(&self, lon: f64, lat: f64, crs: Crs) -> Result<Vec<String>> {
        let (lon, lat) = self.to_geographic(lon, lat, crs)?;
        Ok(self.assets_at(lon, lat).to_vec())
    }

    /// Assets for every index cell intersecting `bounds` given in `crs`.
    ///
    /// Cells are scanned column by column from the top-left to the
    /// bottom-right corner; the union keeps first-seen order.
    pub fn assets_for_bbox(&self, bounds: Bounds, crs: Crs) -> Result<Vec<String>> {
        let bounds = if crs == GEOGRAPHIC_CRS {
            bounds
        } else {
            self.transformer
                .transform_bounds(crs, GEOGRAPHIC_CRS, &bounds)?
        };

        let snapshot = self.snapshot();
        let tiles = self
            .resolver
            .scheme()
            .covering(&bounds, snapshot.quadkey_zoom());
        let location = self.backend.location();

        let assets = dedup_preserving_order(tiles.into_iter().flat_map(|tile| {
            self.cache
                .get_assets(location, &snapshot, &self.resolver, tile)
                .to_vec()
        }));
        debug!(%bounds, assets = assets.len(), "resolved bbox assets");
        Ok(assets)
    }

    /// Composes the XYZ tile from its assets.
    ///
    /// `reverse` inverts the priority order. Fails with
    /// [`MosaicError::NoAssetFound`] when no asset is indexed for the tile
    /// and with [`MosaicError::EmptyMosaic`] when none yields data.
    pub async fn tile(
        &self,
        x: u32,
        y: u32,
        z: u8,
        reverse: bool,
        options: &ReadOptions,
    ) -> Result<TileComposition> {
        let tile = self.checked_tile(x, y, z)?;
        let mut assets = self.get_assets(tile).to_vec();
        if assets.is_empty() {
            return Err(MosaicError::no_asset(format!("tile {}", tile)));
        }
        if reverse {
            assets.reverse();
        }

        mosaic_tile(
            &self.reader,
            &assets,
            tile,
            options,
            self.options.pixel_selection,
            self.options.max_concurrency,
        )
        .await
    }

    /// Samples every asset indexed at a point given in `crs`.
    ///
    /// Assets that do not cover the point are skipped; other per-asset
    /// failures are returned in [`PointResults::failures`]. Fails with
    /// [`MosaicError::NoAssetFound`] when no asset yields a value.
    pub async fn point(
        &self,
        lon: f64,
        lat: f64,
        crs: Crs,
        reverse: bool,
        options: &ReadOptions,
    ) -> Result<PointResults> {
        let (geo_lon, geo_lat) = self.to_geographic(lon, lat, crs)?;
        let mut assets = self.assets_at(geo_lon, geo_lat).to_vec();
        let target = || format!("point ({},{})", lon, lat);
        if assets.is_empty() {
            return Err(MosaicError::no_asset(target()));
        }
        if reverse {
            assets.reverse();
        }

        let results = multi_point(
            &self.reader,
            &assets,
            geo_lon,
            geo_lat,
            GEOGRAPHIC_CRS,
            options,
            self.options.max_concurrency,
        )
        .await;

        if results.is_empty() {
            return Err(MosaicError::no_asset(target()));
        }
        Ok(results)
    }

    /// Merges `footprints` into the document and persists the result.
    ///
    /// Updates are serialized. The new document is written to the backend
    /// before it becomes visible to queries; on any failure the current
    /// document stays in place.
    pub fn update(&self, footprints: &[Footprint], add_first: bool) -> Result<Arc<IndexSnapshot>> {
        let _writer = self.writer.lock();
        let current = self.snapshot();

        let updater = MosaicUpdater::new(Arc::clone(self.resolver.scheme()))
            .with_options(self.options.update.clone());
        let updated = updater.update(current.document(), footprints, add_first)?;

        self.backend.write(&updated, true)?;

        let next = Arc::new(IndexSnapshot::new(updated));
        *self.snapshot.write() = Arc::clone(&next);
        info!(
            location = self.backend.location(),
            mosaic_id = next.mosaic_id(),
            "mosaic snapshot replaced"
        );
        Ok(next)
    }

    /// Persists the current document.
    pub fn write(&self, overwrite: bool) -> Result<()> {
        let _writer = self.writer.lock();
        let snapshot = self.snapshot();
        self.backend.write(snapshot.document(), overwrite)?;
        Ok(())
    }

    /// Replaces the current document with the one stored in the backend.
    pub fn reload(&self) -> Result<()> {
        let _writer = self.writer.lock();
        let document = self.backend.read()?;
        *self.snapshot.write() = Arc::new(IndexSnapshot::new(document));
        Ok(())
    }

    fn checked_tile(&self, x: u32, y: u32, z: u8) -> Result<TileCoord> {
        if z > self.resolver.scheme().max_zoom() {
            return Err(CoordError::InvalidZoom(z).into());
        }
        let tile = TileCoord::from_xyz(x, y, z);
        if !tile.is_valid() {
            return Err(CoordError::OutsideMatrix(tile).into());
        }
        Ok(tile)
    }

    fn to_geographic(&self, lon: f64, lat: f64, crs: Crs) -> Result<(f64, f64)> {
        if crs == GEOGRAPHIC_CRS {
            return Ok((lon, lat));
        }
        Ok(self
            .transformer
            .transform_point(crs, GEOGRAPHIC_CRS, lon, lat)?)
    }

    fn assets_at(&self, lon: f64, lat: f64) -> Arc<Vec<String>> {
        let snapshot = self.snapshot();
        let tile = self
            .resolver
            .scheme()
            .tile_at(lon, lat, snapshot.quadkey_zoom());
        self.cache
            .get_assets(self.backend.location(), &snapshot, &self.resolver, tile)
    }
}

impl<B: Backend, R: RasterReader> std::fmt::Debug for MosaicEngine<B, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MosaicEngine")
            .field("location", &self.backend.location())
            .field("mosaic_id", &self.mosaic_id())
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{FileBackend, MemoryBackend};
    use crate::coord::{quadkey_to_tile, tile_bounds};
    use crate::mosaic::DocumentError;
    use crate::reader::NullReader;

    fn document() -> MosaicIndex {
        MosaicIndex::from_json(
            r#"{"minzoom": 4, "maxzoom": 10, "bounds": [-67.5, 40.0, -45.0, 56.0],
                "tiles": {"0123": ["a.tif"]}}"#,
        )
        .unwrap()
    }

    fn engine() -> MosaicEngine<MemoryBackend, NullReader> {
        let backend = MemoryBackend::with_document(&document()).unwrap();
        MosaicEngine::open(backend, NullReader).unwrap()
    }

    #[test]
    fn test_open_missing_document_fails() {
        let result = MosaicEngine::open(MemoryBackend::new(), NullReader);
        assert!(matches!(result, Err(MosaicError::Backend(_))));
    }

    #[test]
    fn test_open_schema_invalid_document_is_invalid_document() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("mosaic.json");

        std::fs::write(
            &path,
            r#"{"minzoom": 40, "maxzoom": 40, "bounds": [0, 0, 1, 1], "tiles": {}}"#,
        )
        .unwrap();
        let result = MosaicEngine::open(FileBackend::new(&path), NullReader);
        assert!(matches!(
            result,
            Err(MosaicError::InvalidDocument(DocumentError::ZoomLimit { .. }))
        ));

        std::fs::write(&path, "{not json").unwrap();
        let result = MosaicEngine::open(FileBackend::new(&path), NullReader);
        assert!(matches!(
            result,
            Err(MosaicError::InvalidDocument(DocumentError::Decode(_)))
        ));
    }

    #[test]
    fn test_reload_of_invalid_document_keeps_snapshot() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("mosaic.json");
        let backend = FileBackend::new(&path);
        backend.write(&document(), false).unwrap();
        let engine = MosaicEngine::open(backend, NullReader).unwrap();
        let before = engine.mosaic_id();

        std::fs::write(
            &path,
            r#"{"minzoom": 9, "maxzoom": 2, "bounds": [0, 0, 1, 1], "tiles": {}}"#,
        )
        .unwrap();
        assert!(matches!(
            engine.reload(),
            Err(MosaicError::InvalidDocument(DocumentError::ZoomRange { .. }))
        ));
        assert_eq!(engine.mosaic_id(), before);
    }

    #[test]
    fn test_assets_for_point_uses_index_cell() {
        let engine = engine();
        let cell = tile_bounds(&quadkey_to_tile("0123").unwrap());
        let (lon, lat) = cell.midpoint();

        assert_eq!(
            engine.assets_for_point(lon, lat, Crs::Wgs84).unwrap(),
            vec!["a.tif".to_string()]
        );
        assert!(engine.assets_for_point(100.0, -30.0, Crs::Wgs84).unwrap().is_empty());
    }

    #[test]
    fn test_assets_for_point_transforms_crs() {
        let engine = engine();
        let cell = tile_bounds(&quadkey_to_tile("0123").unwrap());
        let (lon, lat) = cell.midpoint();
        let (x, y) = BuiltinTransformer
            .transform_point(Crs::Wgs84, Crs::WebMercator, lon, lat)
            .unwrap();

        assert_eq!(
            engine.assets_for_point(x, y, Crs::WebMercator).unwrap(),
            vec!["a.tif".to_string()]
        );
    }

    #[test]
    fn test_zoom_beyond_scheme_is_rejected() {
        let engine = engine();
        assert!(matches!(
            engine.assets_for_tile(0, 0, 31),
            Err(MosaicError::Coord(CoordError::InvalidZoom(31)))
        ));
    }

    #[tokio::test]
    async fn test_tile_outside_matrix_is_rejected() {
        let engine = engine();
        // "0123" is x=5, y=3 at zoom 4; x=21 shares its low bits
        assert!(matches!(
            engine.assets_for_tile(21, 3, 4),
            Err(MosaicError::Coord(CoordError::OutsideMatrix(_)))
        ));
        assert!(matches!(
            engine.assets_for_tile(5, 16, 4),
            Err(MosaicError::Coord(CoordError::OutsideMatrix(_)))
        ));
        let err = engine
            .tile(21, 3, 4, false, &ReadOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MosaicError::Coord(CoordError::OutsideMatrix(tile)) if tile == TileCoord::from_xyz(21, 3, 4)
        ));
        assert_eq!(engine.assets_for_tile(15, 15, 4).unwrap(), Vec::<String>::new());
    }

    #[tokio::test]
    async fn test_tile_without_assets_is_no_asset_found() {
        let engine = engine();
        let err = engine
            .tile(0, 0, 4, false, &ReadOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, MosaicError::NoAssetFound { .. }));
    }

    #[tokio::test]
    async fn test_null_reader_yields_empty_mosaic() {
        let engine = engine();
        let tile = quadkey_to_tile("0123").unwrap();
        let err = engine
            .tile(tile.col, tile.row, tile.zoom, false, &ReadOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, MosaicError::EmptyMosaic { .. }));
    }

    #[test]
    fn test_update_persists_and_swaps() {
        let engine = engine();
        let before = engine.mosaic_id();

        let fp = Footprint::new("b.tif", tile_bounds(&quadkey_to_tile("0123").unwrap()));
        let next = engine.update(&[fp], true).unwrap();

        assert_ne!(next.mosaic_id(), before);
        assert_eq!(engine.mosaic_id(), next.mosaic_id());
        assert_eq!(engine.backend().read().unwrap(), *next.document());
        assert_eq!(
            engine.assets_for_tile(5, 3, 4).unwrap(),
            vec!["b.tif".to_string(), "a.tif".to_string()]
        );
    }

    #[test]
    fn test_failed_update_keeps_snapshot() {
        let engine = engine();
        let before = engine.mosaic_id();
        assert!(matches!(
            engine.update(&[], false),
            Err(MosaicError::InvalidUpdate(_))
        ));
        assert_eq!(engine.mosaic_id(), before);
    }

    #[test]
    fn test_write_refuses_clobber_and_reload() {
        let engine = engine();
        assert!(matches!(
            engine.write(false),
            Err(MosaicError::Backend(_))
        ));

        let mut replaced = document();
        replaced.name = Some("replaced".to_string());
        engine.backend().write(&replaced, true).unwrap();
        engine.reload().unwrap();
        assert_eq!(engine.info(false).name, "replaced");
    }
}
