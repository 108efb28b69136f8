//! Resolution of tiles to ordered asset lists, memoized per document.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use tracing::trace;

use super::types::{AssetCacheConfig, AssetCacheKey, AssetCacheStats};
use crate::coord::TileCoord;
use crate::mosaic::IndexSnapshot;
use crate::resolver::QuadkeyResolver;

/// Bounded, TTL-limited cache of resolved asset lists.
///
/// There is no invalidation call. An update produces a document with a new
/// fingerprint, and since the fingerprint is part of every key, stale
/// entries are simply never looked up again and age out.
///
/// Concurrent misses on the same key are coalesced: only one caller runs
/// the resolution while the others wait for its result.
pub struct AssetCache {
    cache: Cache<AssetCacheKey, Arc<Vec<String>>>,
    config: AssetCacheConfig,
    lookups: AtomicU64,
    misses: AtomicU64,
}

impl AssetCache {
    pub fn new(config: AssetCacheConfig) -> Self {
        let capacity = if config.enabled { config.max_entries } else { 0 };
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(config.ttl)
            .eviction_policy(EvictionPolicy::lru())
            .build();

        Self {
            cache,
            config,
            lookups: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &AssetCacheConfig {
        &self.config
    }

    /// Ordered, deduplicated assets for `tile`.
    ///
    /// Keys come from `resolver` at the snapshot's quadkey zoom; their asset
    /// lists are concatenated in resolution order and deduplicated keeping
    /// the first occurrence.
    pub fn get_assets(
        &self,
        catalog: &str,
        snapshot: &IndexSnapshot,
        resolver: &QuadkeyResolver,
        tile: TileCoord,
    ) -> Arc<Vec<String>> {
        self.lookups.fetch_add(1, Ordering::Relaxed);

        if !self.config.enabled {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return Arc::new(resolve_assets(snapshot, resolver, tile));
        }

        let key = AssetCacheKey::new(catalog, tile, snapshot.mosaic_id());
        self.cache.get_with(key, || {
            self.misses.fetch_add(1, Ordering::Relaxed);
            trace!(tile = %tile, catalog, "asset cache miss");
            Arc::new(resolve_assets(snapshot, resolver, tile))
        })
    }

    /// Current counters.
    pub fn stats(&self) -> AssetCacheStats {
        let lookups = self.lookups.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        AssetCacheStats {
            hits: lookups.saturating_sub(misses),
            misses,
            entry_count: self.cache.entry_count(),
        }
    }
}

impl Default for AssetCache {
    fn default() -> Self {
        Self::new(AssetCacheConfig::default())
    }
}

impl std::fmt::Debug for AssetCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetCache")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}

/// Uncached resolution of `tile` against a snapshot.
pub fn resolve_assets(
    snapshot: &IndexSnapshot,
    resolver: &QuadkeyResolver,
    tile: TileCoord,
) -> Vec<String> {
    let document = snapshot.document();
    let keys = resolver.resolve(tile, snapshot.quadkey_zoom());
    dedup_preserving_order(
        keys.iter()
            .flat_map(|key| document.assets_for_key(key).iter().cloned()),
    )
}

/// Removes repeated items, keeping each at its first position.
pub fn dedup_preserving_order<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
