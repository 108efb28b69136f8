//! `tilemosaic assets`: list the assets indexed for a location.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use tilemosaic::config::ConfigFile;
use tilemosaic::coord::Bounds;
use tilemosaic::crs::Crs;

use super::common::{open_engine, print_json};
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct AssetsArgs {
    /// Mosaic document
    pub mosaic: PathBuf,

    #[command(subcommand)]
    pub query: AssetsQuery,
}

#[derive(Debug, Subcommand)]
pub enum AssetsQuery {
    /// Assets for an XYZ tile
    Tile { x: u32, y: u32, z: u8 },
    /// Assets at a point
    Point {
        #[arg(allow_hyphen_values = true)]
        lon: f64,
        #[arg(allow_hyphen_values = true)]
        lat: f64,
        /// CRS of the coordinates, e.g. EPSG:3857
        #[arg(long, default_value = "EPSG:4326")]
        crs: Crs,
    },
    /// Assets intersecting a bounding box
    Bbox {
        #[arg(allow_hyphen_values = true)]
        xmin: f64,
        #[arg(allow_hyphen_values = true)]
        ymin: f64,
        #[arg(allow_hyphen_values = true)]
        xmax: f64,
        #[arg(allow_hyphen_values = true)]
        ymax: f64,
        /// CRS of the coordinates, e.g. EPSG:3857
        #[arg(long, default_value = "EPSG:4326")]
        crs: Crs,
    },
}

pub fn run(args: AssetsArgs, config: &ConfigFile) -> Result<(), CliError> {
    let engine = open_engine(&args.mosaic, config)?;

    let assets = match args.query {
        AssetsQuery::Tile { x, y, z } => engine.assets_for_tile(x, y, z)?,
        AssetsQuery::Point { lon, lat, crs } => engine.assets_for_point(lon, lat, crs)?,
        AssetsQuery::Bbox {
            xmin,
            ymin,
            xmax,
            ymax,
            crs,
        } => engine.assets_for_bbox(Bounds::new(xmin, ymin, xmax, ymax), crs)?,
    };

    print_json(&assets)
}
