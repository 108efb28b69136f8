//! `tilemosaic info`: mosaic summary as JSON.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tilemosaic::backend::{Backend, FileBackend};
use tilemosaic::mosaic::MosaicInfo;

use super::common::print_json;
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct InfoArgs {
    /// Mosaic document
    pub mosaic: PathBuf,

    /// Include the list of quadkeys
    #[arg(long)]
    pub quadkeys: bool,
}

#[derive(Serialize)]
struct InfoOutput {
    mosaic_id: String,
    version: String,
    #[serde(flatten)]
    info: MosaicInfo,
}

pub fn run(args: InfoArgs) -> Result<(), CliError> {
    let document = FileBackend::new(&args.mosaic)
        .read()
        .map_err(|e| CliError::Mosaic(e.into()))?;

    print_json(&InfoOutput {
        mosaic_id: document.mosaic_id(),
        version: document.version.to_string(),
        info: document.info(args.quadkeys),
    })
}
