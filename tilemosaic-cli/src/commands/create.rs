//! `tilemosaic create`: build a mosaic from footprints.

use std::path::PathBuf;

use clap::Args;
use tilemosaic::backend::{Backend, FileBackend};
use tilemosaic::mosaic::{BuildOptions, MosaicIndex};
use tracing::info;

use super::common::read_footprints;
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// GeoJSON file of features with a `path` property
    pub footprints: PathBuf,

    /// Mosaic document to write
    #[arg(short, long)]
    pub output: PathBuf,

    #[arg(long, default_value = "0")]
    pub minzoom: u8,

    #[arg(long, default_value = "22")]
    pub maxzoom: u8,

    /// Zoom the quadkeys are computed at (default: minzoom)
    #[arg(long)]
    pub quadkey_zoom: Option<u8>,

    /// Drop assets covering less than this fraction of a tile (0-1)
    #[arg(long)]
    pub min_tile_cover: Option<f64>,

    /// Order each tile's assets by how much of the tile they cover
    #[arg(long)]
    pub tile_cover_sort: bool,

    /// Mosaic name
    #[arg(long)]
    pub name: Option<String>,

    /// Replace an existing document
    #[arg(long)]
    pub overwrite: bool,
}

impl CreateArgs {
    fn build_options(&self) -> BuildOptions {
        BuildOptions {
            quadkey_zoom: self.quadkey_zoom,
            minimum_tile_cover: self.min_tile_cover,
            tile_cover_sort: self.tile_cover_sort,
            name: self.name.clone(),
            ..BuildOptions::new(self.minzoom, self.maxzoom)
        }
    }
}

pub fn run(args: CreateArgs) -> Result<(), CliError> {
    let footprints = read_footprints(&args.footprints)?;
    let document = MosaicIndex::from_footprints(&footprints, args.build_options())?;

    let backend = FileBackend::new(&args.output);
    backend
        .write(&document, args.overwrite)
        .map_err(|e| CliError::Mosaic(e.into()))?;

    info!(
        output = %args.output.display(),
        assets = footprints.len(),
        quadkeys = document.tiles.len(),
        "created mosaic"
    );
    println!(
        "Created {} ({} assets, {} quadkeys at zoom {})",
        args.output.display(),
        footprints.len(),
        document.tiles.len(),
        document.quadkey_zoom()
    );
    Ok(())
}
