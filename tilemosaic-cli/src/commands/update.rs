//! `tilemosaic update`: merge footprints into an existing mosaic.

use std::path::PathBuf;

use clap::Args;
use tilemosaic::config::ConfigFile;
use tilemosaic::engine::EngineOptions;
use tilemosaic::mosaic::UpdateOptions;

use super::common::{open_engine, read_footprints};
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Mosaic document to update
    pub mosaic: PathBuf,

    /// GeoJSON file of features with a `path` property
    pub footprints: PathBuf,

    /// Give the new assets lower priority than the existing ones
    #[arg(long)]
    pub add_last: bool,

    /// Drop assets covering less than this fraction of a tile (0-1)
    #[arg(long)]
    pub min_tile_cover: Option<f64>,

    /// Order the new assets by how much of each tile they cover
    #[arg(long)]
    pub tile_cover_sort: bool,
}

pub fn run(args: UpdateArgs, config: &ConfigFile) -> Result<(), CliError> {
    let footprints = read_footprints(&args.footprints)?;

    let engine = open_engine(&args.mosaic, config)?;
    let options = EngineOptions {
        update: UpdateOptions {
            minimum_tile_cover: args.min_tile_cover,
            tile_cover_sort: args.tile_cover_sort,
        },
        ..engine.options().clone()
    };
    let engine = engine.with_options(options);

    let snapshot = engine.update(&footprints, !args.add_last)?;
    println!(
        "Updated {} to version {} ({} quadkeys)",
        args.mosaic.display(),
        snapshot.document().version,
        snapshot.document().tiles.len()
    );
    Ok(())
}
