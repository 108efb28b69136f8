//! CLI error handling with user-friendly messages.

use std::fmt;
use std::path::PathBuf;
use std::process;

use tilemosaic::footprint::FootprintError;
use tilemosaic::mosaic::BuildError;
use tilemosaic::MosaicError;

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to read an input file
    FileRead { path: PathBuf, error: std::io::Error },
    /// Footprints file could not be parsed
    Footprints { path: PathBuf, error: FootprintError },
    /// Footprints could not be reduced to a mosaic
    Build(BuildError),
    /// Mosaic operation failed
    Mosaic(MosaicError),
    /// Failed to render output
    Output(String),
}

impl CliError {
    /// Prints the error and exits with status 1.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::Mosaic(MosaicError::Backend(_)) = self {
            eprintln!();
            eprintln!("Use 'tilemosaic create' to build a mosaic, or pass --overwrite");
            eprintln!("to replace an existing document.");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::FileRead { path, error } => {
                write!(f, "Failed to read '{}': {}", path.display(), error)
            }
            CliError::Footprints { path, error } => {
                write!(f, "Invalid footprints in '{}': {}", path.display(), error)
            }
            CliError::Build(e) => write!(f, "Failed to build mosaic: {}", e),
            CliError::Mosaic(e) => write!(f, "{}", e),
            CliError::Output(msg) => write!(f, "Failed to write output: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::FileRead { error, .. } => Some(error),
            CliError::Footprints { error, .. } => Some(error),
            CliError::Build(e) => Some(e),
            CliError::Mosaic(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MosaicError> for CliError {
    fn from(e: MosaicError) -> Self {
        CliError::Mosaic(e)
    }
}

impl From<BuildError> for CliError {
    fn from(e: BuildError) -> Self {
        CliError::Build(e)
    }
}
