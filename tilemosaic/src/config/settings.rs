//! Settings structs, one per `[section]` of the INI file.

use std::path::PathBuf;
use std::time::Duration;

use super::defaults::*;
use crate::cache::AssetCacheConfig;
use crate::compositor::PixelSelectionMethod;
use crate::engine::EngineOptions;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub cache: CacheSettings,
    pub reader: ReaderSettings,
    pub logging: LoggingSettings,
}

/// Asset cache settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// Maximum cached asset lists
    pub max_entries: u64,
    /// Entry time-to-live in seconds
    pub ttl: u64,
    pub enabled: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            ttl: DEFAULT_CACHE_TTL_SECS,
            enabled: true,
        }
    }
}

impl CacheSettings {
    pub fn to_cache_config(&self) -> AssetCacheConfig {
        AssetCacheConfig {
            max_entries: self.max_entries,
            ttl: Duration::from_secs(self.ttl),
            enabled: self.enabled,
        }
    }
}

/// Raster read settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderSettings {
    /// Concurrent asset reads per query
    pub max_concurrency: usize,
    pub pixel_selection: PixelSelectionMethod,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_READER_MAX_CONCURRENCY,
            pixel_selection: PixelSelectionMethod::default(),
        }
    }
}

impl ReaderSettings {
    pub fn to_engine_options(&self) -> EngineOptions {
        EngineOptions {
            pixel_selection: self.pixel_selection,
            max_concurrency: self.max_concurrency,
            ..EngineOptions::default()
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: default_log_directory(),
            file: default_log_file(),
        }
    }
}
