//! Multi-asset composition.
//!
//! Tiles use a priority overlay: assets are read in order and folded by a
//! [`PixelSelection`] that can stop the reads early. Points use a
//! collect-all policy: every asset is sampled concurrently and every value
//! is returned.

mod pixel;
mod point;
mod tile;

pub use pixel::{PixelSelection, PixelSelectionMethod};
pub use point::{multi_point, PointResults, PointValue};
pub use tile::{mosaic_tile, TileComposition};

use crate::reader::ReadError;

/// An asset whose read failed during composition.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetFailure {
    pub asset: String,
    pub error: ReadError,
}

impl AssetFailure {
    pub fn new(asset: impl Into<String>, error: ReadError) -> Self {
        Self {
            asset: asset.into(),
            error,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted raster reader for composition tests.

    use std::collections::HashMap;
    use std::time::Duration;

    use parking_lot::Mutex;

    use crate::coord::TileCoord;
    use crate::crs::Crs;
    use crate::reader::{
        ImageData, PointData, PointRead, RasterDataset, RasterReader, ReadError, ReadOptions,
    };

    #[derive(Debug, Clone)]
    pub enum Raster {
        Image(ImageData),
        Value(Vec<f64>),
        Outside,
        Fail(ReadError),
        Delayed(Box<Raster>, Duration),
    }

    impl Raster {
        pub fn pixels(values: &[f64], mask: &[bool]) -> Self {
            Raster::Image(
                ImageData::new(values.len() as u32, 1, vec![values.to_vec()], mask.to_vec())
                    .unwrap(),
            )
        }

        pub fn value(values: &[f64]) -> Self {
            Raster::Value(values.to_vec())
        }

        pub fn delayed(self, delay: Duration) -> Self {
            Raster::Delayed(Box::new(self), delay)
        }
    }

    #[derive(Debug, Default)]
    pub struct MockReader {
        rasters: HashMap<String, Raster>,
        opened: Mutex<Vec<String>>,
    }

    impl MockReader {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, asset: &str, raster: Raster) -> Self {
            self.rasters.insert(asset.to_string(), raster);
            self
        }

        pub fn opened(&self) -> Vec<String> {
            self.opened.lock().clone()
        }
    }

    pub struct MockDataset {
        raster: Raster,
        delay: Option<Duration>,
    }

    impl MockDataset {
        async fn wait(&self) {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
        }
    }

    impl RasterReader for MockReader {
        type Dataset = MockDataset;

        async fn open(&self, asset: &str) -> Result<MockDataset, ReadError> {
            self.opened.lock().push(asset.to_string());
            let mut raster = self.rasters.get(asset).cloned().ok_or_else(|| ReadError::Open {
                asset: asset.to_string(),
                message: "no such asset".to_string(),
            })?;
            let mut delay = None;
            while let Raster::Delayed(inner, d) = raster {
                delay = Some(d);
                raster = *inner;
            }
            Ok(MockDataset { raster, delay })
        }
    }

    impl RasterDataset for MockDataset {
        async fn tile(&self, tile: TileCoord, _options: &ReadOptions) -> Result<ImageData, ReadError> {
            self.wait().await;
            match &self.raster {
                Raster::Image(image) => Ok(image.clone()),
                Raster::Fail(error) => Err(error.clone()),
                _ => Err(ReadError::TileOutsideBounds { tile }),
            }
        }

        async fn point(
            &self,
            lon: f64,
            lat: f64,
            _crs: Crs,
            _options: &ReadOptions,
        ) -> Result<PointRead, ReadError> {
            self.wait().await;
            match &self.raster {
                Raster::Value(values) => Ok(PointRead::Value(PointData {
                    coordinates: (lon, lat),
                    values: values.clone(),
                })),
                Raster::Fail(error) => Err(error.clone()),
                _ => Ok(PointRead::OutsideCoverage),
            }
        }
    }
}
