//! Concurrent point sampling across assets.

use futures::stream::{self, StreamExt};
use tracing::{trace, warn};

use super::AssetFailure;
use crate::crs::Crs;
use crate::reader::{PointData, PointRead, RasterDataset, RasterReader, ReadError, ReadOptions};

/// One asset's sample.
#[derive(Debug, Clone, PartialEq)]
pub struct PointValue {
    pub asset: String,
    pub data: PointData,
}

/// Every value sampled at a point, plus the assets that failed.
///
/// Assets that do not cover the point appear in neither list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointResults {
    /// Successful samples in asset order
    pub values: Vec<PointValue>,
    /// Failed reads in asset order
    pub failures: Vec<AssetFailure>,
}

impl PointResults {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

async fn read_point<R: RasterReader>(
    reader: &R,
    asset: &str,
    lon: f64,
    lat: f64,
    crs: Crs,
    options: &ReadOptions,
) -> Result<PointRead, ReadError> {
    let dataset = reader.open(asset).await?;
    dataset.point(lon, lat, crs, options).await
}

/// Samples every asset at `(lon, lat)`, at most `max_concurrency` at once.
///
/// Reads complete in any order; results are returned in the order of
/// `assets`.
pub async fn multi_point<R: RasterReader>(
    reader: &R,
    assets: &[String],
    lon: f64,
    lat: f64,
    crs: Crs,
    options: &ReadOptions,
    max_concurrency: usize,
) -> PointResults {
    let mut outcomes: Vec<(usize, Result<PointRead, ReadError>)> =
        stream::iter(assets.iter().enumerate())
            .map(|(index, asset)| async move {
                (index, read_point(reader, asset, lon, lat, crs, options).await)
            })
            .buffer_unordered(max_concurrency.max(1))
            .collect()
            .await;
    outcomes.sort_by_key(|(index, _)| *index);

    let mut results = PointResults::default();
    for (index, outcome) in outcomes {
        let asset = &assets[index];
        match outcome {
            Ok(PointRead::Value(data)) => results.values.push(PointValue {
                asset: asset.clone(),
                data,
            }),
            Ok(PointRead::OutsideCoverage) => {
                trace!(asset, lon, lat, "point outside asset coverage");
            }
            Err(error) => {
                warn!(asset, lon, lat, error = %error, "point read failed");
                results.failures.push(AssetFailure::new(asset, error));
            }
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::testing::{MockReader, Raster};
    use std::time::Duration;

    fn assets(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_outside_coverage_is_swallowed() {
        let reader = MockReader::new()
            .with("one.tif", Raster::Outside)
            .with("two.tif", Raster::value(&[42.0]));

        let results = multi_point(
            &reader,
            &assets(&["one.tif", "two.tif"]),
            10.0,
            20.0,
            Crs::Wgs84,
            &ReadOptions::default(),
            4,
        )
        .await;

        assert_eq!(results.values.len(), 1);
        assert_eq!(results.values[0].asset, "two.tif");
        assert_eq!(results.values[0].data.values, vec![42.0]);
        assert!(results.failures.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_keep_asset_order() {
        let reader = MockReader::new()
            .with("slow.tif", Raster::value(&[1.0]).delayed(Duration::from_millis(50)))
            .with("fast.tif", Raster::value(&[2.0]));

        let results = multi_point(
            &reader,
            &assets(&["slow.tif", "fast.tif"]),
            0.0,
            0.0,
            Crs::Wgs84,
            &ReadOptions::default(),
            2,
        )
        .await;

        let order: Vec<_> = results.values.iter().map(|v| v.asset.as_str()).collect();
        assert_eq!(order, vec!["slow.tif", "fast.tif"]);
    }

    #[tokio::test]
    async fn test_failures_are_reported_alongside_values() {
        let reader = MockReader::new()
            .with("bad.tif", Raster::Fail(ReadError::Io("reset".into())))
            .with("good.tif", Raster::value(&[7.0]));

        let results = multi_point(
            &reader,
            &assets(&["bad.tif", "good.tif"]),
            0.0,
            0.0,
            Crs::Wgs84,
            &ReadOptions::default(),
            1,
        )
        .await;

        assert_eq!(results.values.len(), 1);
        assert_eq!(results.failures, vec![AssetFailure::new("bad.tif", ReadError::Io("reset".into()))]);
    }
}
