//! Cache keys, configuration and statistics.

use std::time::Duration;

use crate::coord::TileCoord;

/// Default maximum number of cached asset lists.
pub const DEFAULT_MAX_ENTRIES: u64 = 512;

/// Default time-to-live for a cached asset list.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Key identifying one resolved asset list.
///
/// The mosaic fingerprint is part of the key, so entries computed against
/// an older document become unreachable as soon as the document changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetCacheKey {
    /// Catalog location (backend identity)
    pub catalog: String,
    /// Requested tile
    pub tile: TileCoord,
    /// Fingerprint of the document the list was resolved against
    pub mosaic_id: String,
}

impl AssetCacheKey {
    pub fn new(catalog: impl Into<String>, tile: TileCoord, mosaic_id: impl Into<String>) -> Self {
        Self {
            catalog: catalog.into(),
            tile,
            mosaic_id: mosaic_id.into(),
        }
    }
}

/// Asset cache configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCacheConfig {
    /// Maximum number of entries (default: 512)
    pub max_entries: u64,
    /// Time-to-live per entry (default: 300 s)
    pub ttl: Duration,
    /// When false every lookup resolves afresh
    pub enabled: bool,
}

impl Default for AssetCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            ttl: DEFAULT_TTL,
            enabled: true,
        }
    }
}

impl AssetCacheConfig {
    /// Configuration with caching switched off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// Point-in-time cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssetCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entry_count: u64,
}

impl AssetCacheStats {
    /// Hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
