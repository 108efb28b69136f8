//! Default values and environment variable names.

use std::path::PathBuf;

pub use crate::cache::DEFAULT_MAX_ENTRIES as DEFAULT_CACHE_MAX_ENTRIES;
pub use crate::engine::DEFAULT_MAX_CONCURRENCY as DEFAULT_READER_MAX_CONCURRENCY;

/// Default cache entry time-to-live in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Overrides `[cache] ttl`.
pub const ENV_CACHE_TTL: &str = "TILEMOSAIC_CACHE_TTL";

/// Overrides `[cache] max_entries`.
pub const ENV_CACHE_MAXSIZE: &str = "TILEMOSAIC_CACHE_MAXSIZE";

/// Disables the asset cache when truthy.
pub const ENV_CACHE_DISABLE: &str = "TILEMOSAIC_CACHE_DISABLE";

/// Default log directory (~/.tilemosaic/logs).
pub fn default_log_directory() -> PathBuf {
    super::config_directory().join("logs")
}

/// Default log file name.
pub fn default_log_file() -> String {
    crate::logging::DEFAULT_LOG_FILE.to_string()
}
