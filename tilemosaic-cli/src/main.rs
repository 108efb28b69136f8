//! TileMosaic CLI - build, update and query mosaic indexes.

mod commands;
mod error;

use clap::{Parser, Subcommand};
use tilemosaic::config::ConfigFile;
use tilemosaic::logging::{init_logging, LoggingGuard};

use commands::{assets, create, info, update};
use error::CliError;

#[derive(Parser)]
#[command(name = "tilemosaic")]
#[command(version = tilemosaic::VERSION)]
#[command(about = "Build and query quadkey mosaic indexes of raster assets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a new mosaic document from a GeoJSON footprints file
    Create(create::CreateArgs),
    /// Add footprints to an existing mosaic document
    Update(update::UpdateArgs),
    /// Show a summary of a mosaic document
    Info(info::InfoArgs),
    /// List the assets indexed for a tile, point or bounding box
    Assets(assets::AssetsArgs),
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => e.exit(),
    };

    let _guard = match start_logging(&config) {
        Ok(guard) => guard,
        Err(e) => e.exit(),
    };

    let result = match cli.command {
        Commands::Create(args) => create::run(args),
        Commands::Update(args) => update::run(args, &config),
        Commands::Info(args) => info::run(args),
        Commands::Assets(args) => assets::run(args, &config),
    };

    if let Err(e) = result {
        e.exit();
    }
}

fn load_config() -> Result<ConfigFile, CliError> {
    ConfigFile::load()
        .and_then(ConfigFile::with_env_overrides)
        .map_err(|e| CliError::Config(e.to_string()))
}

fn start_logging(config: &ConfigFile) -> Result<LoggingGuard, CliError> {
    init_logging(&config.logging.directory, &config.logging.file)
        .map_err(|e| CliError::LoggingInit(e.to_string()))
}
