//! Per-request asset resolution cache.
//!
//! Maps a requested tile to the ordered list of assets that may hold its
//! data, memoized per (catalog, tile, document fingerprint).

mod assets;
mod types;

pub use assets::{dedup_preserving_order, resolve_assets, AssetCache};
pub use types::{AssetCacheConfig, AssetCacheKey, AssetCacheStats, DEFAULT_MAX_ENTRIES, DEFAULT_TTL};
