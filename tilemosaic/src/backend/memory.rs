//! In-process backend.

use parking_lot::RwLock;

use super::{Backend, BackendError};
use crate::mosaic::MosaicIndex;

/// Location reported by [`MemoryBackend`].
pub const MEMORY_LOCATION: &str = "memory://";

/// Backend holding the serialized document in memory.
///
/// The document is stored as JSON so reads go through the same decode and
/// validation path as persistent stores.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    stored: RwLock<Option<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-loaded with `document`.
    pub fn with_document(document: &MosaicIndex) -> Result<Self, BackendError> {
        let backend = Self::new();
        backend.write(document, false)?;
        Ok(backend)
    }
}

impl Backend for MemoryBackend {
    fn location(&self) -> &str {
        MEMORY_LOCATION
    }

    fn read(&self) -> Result<MosaicIndex, BackendError> {
        let stored = self.stored.read();
        let json = stored
            .as_deref()
            .ok_or_else(|| BackendError::NotFound(MEMORY_LOCATION.to_string()))?;
        Ok(MosaicIndex::from_json(json)?)
    }

    fn write(&self, document: &MosaicIndex, overwrite: bool) -> Result<(), BackendError> {
        let json = document.to_json()?;
        let mut stored = self.stored.write();
        if stored.is_some() && !overwrite {
            return Err(BackendError::AlreadyExists(MEMORY_LOCATION.to_string()));
        }
        *stored = Some(json);
        Ok(())
    }
}
