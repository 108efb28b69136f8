//! Merging new observations into an existing mosaic.

use std::sync::Arc;

use semver::{BuildMetadata, Prerelease};
use tracing::info;

use super::builder::{BuildError, BuildOptions, MosaicBuilder};
use super::document::MosaicIndex;
use super::types::Center;
use crate::coord::{TileScheme, WebMercatorQuad};
use crate::footprint::Footprint;

/// Settings for reducing new footprints to a candidate index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateOptions {
    pub minimum_tile_cover: Option<f64>,
    pub tile_cover_sort: bool,
}

/// Produces updated copies of a mosaic document.
///
/// The existing document is never modified: every update returns a new
/// document whose tiles, bounds, center and version change together.
#[derive(Debug, Clone)]
pub struct MosaicUpdater {
    scheme: Arc<dyn TileScheme>,
    options: UpdateOptions,
}

impl MosaicUpdater {
    pub fn new(scheme: Arc<dyn TileScheme>) -> Self {
        Self {
            scheme,
            options: UpdateOptions::default(),
        }
    }

    pub fn with_options(mut self, options: UpdateOptions) -> Self {
        self.options = options;
        self
    }

    /// Reduces `footprints` to a candidate index at the existing quadkey
    /// zoom and merges it into `existing`.
    ///
    /// With `add_first` the new assets take priority over the existing
    /// ones under each key. Fails without touching `existing` when the
    /// footprints cannot be reduced to a candidate index.
    pub fn update(
        &self,
        existing: &MosaicIndex,
        footprints: &[Footprint],
        add_first: bool,
    ) -> Result<MosaicIndex, BuildError> {
        let options = BuildOptions {
            quadkey_zoom: Some(existing.quadkey_zoom()),
            minimum_tile_cover: self.options.minimum_tile_cover,
            tile_cover_sort: self.options.tile_cover_sort,
            ..BuildOptions::new(existing.minzoom, existing.maxzoom)
        };
        let candidate = MosaicBuilder::new(Arc::clone(&self.scheme), options).build(footprints)?;
        let updated = merge(existing, &candidate, add_first);

        info!(
            footprints = footprints.len(),
            keys = candidate.tiles.len(),
            add_first,
            version = %updated.version,
            "mosaic updated"
        );

        Ok(updated)
    }
}

impl Default for MosaicUpdater {
    fn default() -> Self {
        Self::new(Arc::new(WebMercatorQuad))
    }
}

/// Merges a candidate index into a copy of `existing`.
///
/// Asset lists are concatenated as-is: no deduplication happens here, so a
/// caller re-adding an asset sees it listed twice. Read paths deduplicate.
/// Bounds become the union of both documents, the center is recomputed at
/// `minzoom` and the patch version is incremented.
pub fn merge(existing: &MosaicIndex, candidate: &MosaicIndex, add_first: bool) -> MosaicIndex {
    let mut updated = existing.clone();

    for (key, new_assets) in &candidate.tiles {
        let current = updated.tiles.entry(key.clone()).or_default();
        if add_first {
            let mut merged = new_assets.clone();
            merged.append(current);
            *current = merged;
        } else {
            current.extend(new_assets.iter().cloned());
        }
    }

    updated.bounds = existing.bounds.union(&candidate.bounds);
    updated.center = Some(Center::of(&updated.bounds, updated.minzoom));
    updated.version.patch += 1;
    updated.version.pre = Prerelease::EMPTY;
    updated.version.build = BuildMetadata::EMPTY;

    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{quadkey_to_tile, tile_bounds, Bounds};

    fn existing() -> MosaicIndex {
        MosaicIndex::from_json(
            r#"{
                "minzoom": 4,
                "maxzoom": 10,
                "bounds": [11.25, 40.97989806962013, 22.5, 55.77657301866769],
                "tiles": {"0123": ["a.tif"]}
            }"#,
        )
        .unwrap()
    }

    fn footprint_on_key(path: &str, key: &str) -> Footprint {
        Footprint::new(path, tile_bounds(&quadkey_to_tile(key).unwrap()))
    }

    #[test]
    fn test_add_first_prepends() {
        let updater = MosaicUpdater::default();
        let updated = updater
            .update(&existing(), &[footprint_on_key("b.tif", "0123")], true)
            .unwrap();
        assert_eq!(
            updated.tiles["0123"],
            vec!["b.tif".to_string(), "a.tif".to_string()]
        );
    }

    #[test]
    fn test_add_last_appends() {
        let updater = MosaicUpdater::default();
        let updated = updater
            .update(&existing(), &[footprint_on_key("b.tif", "0123")], false)
            .unwrap();
        assert_eq!(
            updated.tiles["0123"],
            vec!["a.tif".to_string(), "b.tif".to_string()]
        );
    }

    #[test]
    fn test_merge_does_not_deduplicate() {
        let updater = MosaicUpdater::default();
        let updated = updater
            .update(&existing(), &[footprint_on_key("a.tif", "0123")], false)
            .unwrap();
        assert_eq!(
            updated.tiles["0123"],
            vec!["a.tif".to_string(), "a.tif".to_string()]
        );
    }

    #[test]
    fn test_new_key_is_added() {
        let updater = MosaicUpdater::default();
        let updated = updater
            .update(&existing(), &[footprint_on_key("c.tif", "3000")], false)
            .unwrap();
        assert_eq!(updated.tiles["3000"], vec!["c.tif".to_string()]);
        assert_eq!(updated.tiles["0123"], vec!["a.tif".to_string()]);
    }

    #[test]
    fn test_bounds_center_and_version_move_together() {
        let before = existing();
        let added = footprint_on_key("c.tif", "3000");
        let updated = MosaicUpdater::default()
            .update(&before, &[added.clone()], true)
            .unwrap();

        assert!(updated.bounds.contains(&before.bounds));
        assert!(updated.bounds.contains(&added.bounds));
        assert_eq!(updated.center, Some(Center::of(&updated.bounds, 4)));
        assert_eq!(updated.version, semver::Version::new(1, 0, 1));
        assert_ne!(updated.mosaic_id(), before.mosaic_id());
    }

    #[test]
    fn test_failed_update_leaves_document_untouched() {
        let before = existing();
        let result = MosaicUpdater::default().update(&before, &[], true);
        assert_eq!(result, Err(BuildError::Empty));
        assert_eq!(before, existing());
    }

    #[test]
    fn test_candidate_uses_existing_quadkey_zoom() {
        let mut doc = existing();
        doc.quadkey_zoom = Some(6);
        doc.tiles.clear();

        let fp = Footprint::new("d.tif", Bounds::new(1.0, 1.0, 1.1, 1.1));
        let updated = MosaicUpdater::default().update(&doc, &[fp], false).unwrap();
        assert!(updated.tiles.keys().all(|k| k.len() == 6));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_update_bounds_contain_old_and_new(
                xmin in -170.0f64..160.0,
                ymin in -80.0f64..70.0,
                w in 0.01f64..10.0,
                h in 0.01f64..10.0,
            ) {
                let before = existing();
                let added = Footprint::new("p.tif", Bounds::new(xmin, ymin, xmin + w, ymin + h));
                let updated = MosaicUpdater::default()
                    .update(&before, &[added.clone()], false)
                    .unwrap();
                prop_assert!(updated.bounds.contains(&before.bounds));
                prop_assert!(updated.bounds.contains(&added.bounds));
            }
        }
    }
}
