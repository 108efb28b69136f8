//! The persisted mosaic document.

use std::collections::BTreeMap;

use semver::Version;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha224};

use super::types::{Center, DocumentError, MosaicInfo};
use crate::coord::{quadkey_to_tile, Bounds, MAX_ZOOM};

/// Schema version written into new documents.
pub const MOSAIC_SCHEMA_VERSION: &str = "0.0.3";

/// Display name reported when a document has none.
pub const DEFAULT_MOSAIC_NAME: &str = "mosaic";

fn default_schema_version() -> String {
    MOSAIC_SCHEMA_VERSION.to_string()
}

fn default_version() -> Version {
    Version::new(1, 0, 0)
}

/// A versioned mapping from quadkeys to ordered asset lists.
///
/// Asset order within a key is priority order: earlier assets win when
/// compositing. `minzoom`, `maxzoom`, `bounds` and `tiles` are required on
/// load; everything else has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MosaicIndex {
    #[serde(default = "default_schema_version")]
    pub mosaicjson: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default = "default_version")]
    pub version: Version,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,

    pub minzoom: u8,

    pub maxzoom: u8,

    /// Zoom the quadkeys are computed at; `minzoom` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quadkey_zoom: Option<u8>,

    pub bounds: Bounds,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<Center>,

    pub tiles: BTreeMap<String, Vec<String>>,
}

impl MosaicIndex {
    /// Parses and validates a JSON document.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let mut document: MosaicIndex =
            serde_json::from_str(json).map_err(|e| DocumentError::Decode(e.to_string()))?;
        document.validate()?;
        if document.center.is_none() {
            document.center = Some(Center::of(&document.bounds, document.minzoom));
        }
        Ok(document)
    }

    /// Pretty-printed JSON form.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self).map_err(|e| DocumentError::Encode(e.to_string()))
    }

    /// Checks the structural invariants of the document.
    pub fn validate(&self) -> Result<(), DocumentError> {
        if self.minzoom > self.maxzoom {
            return Err(DocumentError::ZoomRange {
                minzoom: self.minzoom,
                maxzoom: self.maxzoom,
            });
        }

        let quadkey_zoom = self.quadkey_zoom();
        for (field, zoom) in [("maxzoom", self.maxzoom), ("quadkey_zoom", quadkey_zoom)] {
            if zoom > MAX_ZOOM {
                return Err(DocumentError::ZoomLimit {
                    field,
                    zoom,
                    max: MAX_ZOOM,
                });
            }
        }

        if quadkey_zoom < self.minzoom {
            return Err(DocumentError::QuadkeyZoom {
                quadkey_zoom,
                minzoom: self.minzoom,
            });
        }

        if !self.bounds.is_valid() {
            return Err(DocumentError::Bounds(self.bounds));
        }

        for key in self.tiles.keys() {
            if key.len() != quadkey_zoom as usize || quadkey_to_tile(key).is_err() {
                return Err(DocumentError::TileKey {
                    key: key.clone(),
                    quadkey_zoom,
                });
            }
        }

        Ok(())
    }

    /// Zoom the spatial keys live at.
    pub fn quadkey_zoom(&self) -> u8 {
        self.quadkey_zoom.unwrap_or(self.minzoom)
    }

    /// Center, derived from bounds and `minzoom` when not stored.
    pub fn center(&self) -> Center {
        self.center
            .unwrap_or_else(|| Center::of(&self.bounds, self.minzoom))
    }

    /// Display name, falling back to [`DEFAULT_MOSAIC_NAME`].
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_MOSAIC_NAME)
    }

    /// Assets stored under a key; empty when the key is absent.
    pub fn assets_for_key(&self, key: &str) -> &[String] {
        self.tiles.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All stored quadkeys.
    pub fn quadkeys(&self) -> Vec<String> {
        self.tiles.keys().cloned().collect()
    }

    /// Summary of the document.
    pub fn info(&self, include_quadkeys: bool) -> MosaicInfo {
        MosaicInfo {
            bounds: self.bounds,
            center: self.center(),
            minzoom: self.minzoom,
            maxzoom: self.maxzoom,
            name: self.display_name().to_string(),
            quadkeys: if include_quadkeys {
                self.quadkeys()
            } else {
                Vec::new()
            },
        }
    }

    /// SHA-224 content fingerprint, lowercase hex.
    ///
    /// Covers every field; absent optional fields contribute nothing. The
    /// digest depends only on values, never on the field order of whatever
    /// the document was parsed from.
    pub fn mosaic_id(&self) -> String {
        let mut hasher = Sha224::new();

        fn field(hasher: &mut Sha224, name: &str, value: &[u8]) {
            hasher.update((name.len() as u64).to_le_bytes());
            hasher.update(name.as_bytes());
            hasher.update((value.len() as u64).to_le_bytes());
            hasher.update(value);
        }

        field(&mut hasher, "mosaicjson", self.mosaicjson.as_bytes());
        if let Some(name) = &self.name {
            field(&mut hasher, "name", name.as_bytes());
        }
        if let Some(description) = &self.description {
            field(&mut hasher, "description", description.as_bytes());
        }
        field(&mut hasher, "version", self.version.to_string().as_bytes());
        if let Some(attribution) = &self.attribution {
            field(&mut hasher, "attribution", attribution.as_bytes());
        }
        field(&mut hasher, "minzoom", &[self.minzoom]);
        field(&mut hasher, "maxzoom", &[self.maxzoom]);
        if let Some(quadkey_zoom) = self.quadkey_zoom {
            field(&mut hasher, "quadkey_zoom", &[quadkey_zoom]);
        }

        let bounds: [f64; 4] = self.bounds.into();
        let bounds_bytes: Vec<u8> = bounds.iter().flat_map(|v| v.to_le_bytes()).collect();
        field(&mut hasher, "bounds", &bounds_bytes);

        if let Some(center) = &self.center {
            let mut bytes = Vec::with_capacity(17);
            bytes.extend_from_slice(&center.lon.to_le_bytes());
            bytes.extend_from_slice(&center.lat.to_le_bytes());
            bytes.push(center.zoom);
            field(&mut hasher, "center", &bytes);
        }

        // BTreeMap iteration is sorted by key
        hasher.update((self.tiles.len() as u64).to_le_bytes());
        for (key, assets) in &self.tiles {
            field(&mut hasher, "key", key.as_bytes());
            hasher.update((assets.len() as u64).to_le_bytes());
            for asset in assets {
                field(&mut hasher, "asset", asset.as_bytes());
            }
        }

        format!("{:x}", hasher.finalize())
    }
}
