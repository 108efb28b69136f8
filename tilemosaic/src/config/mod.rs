//! User configuration from `~/.tilemosaic/config.ini`.
//!
//! - [`ConfigFile`]: all settings, loaded with defaults for anything absent
//! - `[cache]`, `[reader]` and `[logging]` sections
//! - `TILEMOSAIC_CACHE_*` environment variables override the file
//!
//! # Example
//!
//! ```no_run
//! use tilemosaic::config::ConfigFile;
//!
//! let config = ConfigFile::load()?.with_env_overrides()?;
//! let cache = config.cache.to_cache_config();
//! # Ok::<(), tilemosaic::config::ConfigFileError>(())
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{CacheSettings, ConfigFile, LoggingSettings, ReaderSettings};
