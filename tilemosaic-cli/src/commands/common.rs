//! Helpers shared by the subcommands.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tilemosaic::backend::FileBackend;
use tilemosaic::cache::AssetCache;
use tilemosaic::config::ConfigFile;
use tilemosaic::engine::MosaicEngine;
use tilemosaic::footprint::{footprints_from_geojson, Footprint};
use tilemosaic::reader::NullReader;

use crate::error::CliError;

/// Engine over a mosaic file; index queries only, no pixel reads.
pub type FileEngine = MosaicEngine<FileBackend, NullReader>;

/// Opens the mosaic at `path` with cache and reader settings from `config`.
pub fn open_engine(path: &Path, config: &ConfigFile) -> Result<FileEngine, CliError> {
    let cache = Arc::new(AssetCache::new(config.cache.to_cache_config()));
    Ok(MosaicEngine::open(FileBackend::new(path), NullReader)?
        .with_cache(cache)
        .with_options(config.reader.to_engine_options()))
}

/// Reads footprints from a GeoJSON file.
pub fn read_footprints(path: &Path) -> Result<Vec<Footprint>, CliError> {
    let json = std::fs::read_to_string(path).map_err(|error| CliError::FileRead {
        path: path.to_path_buf(),
        error,
    })?;
    footprints_from_geojson(&json).map_err(|error| CliError::Footprints {
        path: path.to_path_buf(),
        error,
    })
}

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CliError::Output(e.to_string()))?;
    println!("{}", json);
    Ok(())
}
