//! JSON file backend.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Backend, BackendError};
use crate::mosaic::MosaicIndex;

/// Backend storing the document as a JSON file.
///
/// Writes go to a sibling temporary file which is then renamed over the
/// target, so a reader never sees a half-written document.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
    location: String,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let location = format!("file://{}", path.display());
        Self { path, location }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Backend for FileBackend {
    fn location(&self) -> &str {
        &self.location
    }

    fn read(&self) -> Result<MosaicIndex, BackendError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(BackendError::NotFound(self.path.display().to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        let document = MosaicIndex::from_json(&json)?;
        debug!(path = %self.path.display(), keys = document.tiles.len(), "read mosaic");
        Ok(document)
    }

    fn write(&self, document: &MosaicIndex, overwrite: bool) -> Result<(), BackendError> {
        if !overwrite && self.path.exists() {
            return Err(BackendError::AlreadyExists(self.path.display().to_string()));
        }

        let json = document.to_json()?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp = self.temp_path();
        fs::write(&temp, json)?;
        if let Err(e) = fs::rename(&temp, &self.path) {
            let _ = fs::remove_file(&temp);
            return Err(e.into());
        }

        debug!(path = %self.path.display(), version = %document.version, "wrote mosaic");
        Ok(())
    }
}
