//! Immutable document snapshots shared between queries.

use super::document::MosaicIndex;

/// An immutable document paired with its fingerprint.
///
/// The fingerprint is computed once when the snapshot is taken, so cache
/// lookups never rehash the document.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSnapshot {
    document: MosaicIndex,
    mosaic_id: String,
}

impl IndexSnapshot {
    pub fn new(document: MosaicIndex) -> Self {
        let mosaic_id = document.mosaic_id();
        Self {
            document,
            mosaic_id,
        }
    }

    pub fn document(&self) -> &MosaicIndex {
        &self.document
    }

    pub fn mosaic_id(&self) -> &str {
        &self.mosaic_id
    }

    pub fn quadkey_zoom(&self) -> u8 {
        self.document.quadkey_zoom()
    }

    pub fn into_document(self) -> MosaicIndex {
        self.document
    }
}

impl From<MosaicIndex> for IndexSnapshot {
    fn from(document: MosaicIndex) -> Self {
        Self::new(document)
    }
}
