//! Priority-ordered tile composition.

use futures::future::join_all;
use tracing::{debug, warn};

use super::pixel::PixelSelectionMethod;
use super::AssetFailure;
use crate::coord::TileCoord;
use crate::error::{MosaicError, Result};
use crate::reader::{ImageData, RasterDataset, RasterReader, ReadError, ReadOptions};

/// A composed tile and the assets that went into it.
#[derive(Debug, Clone, PartialEq)]
pub struct TileComposition {
    pub image: ImageData,
    /// Assets whose pixels were fed to the selection, in feed order
    pub assets_used: Vec<String>,
    /// Assets that failed to read
    pub failures: Vec<AssetFailure>,
}

async fn read_tile<R: RasterReader>(
    reader: &R,
    asset: &str,
    tile: TileCoord,
    options: &ReadOptions,
) -> std::result::Result<ImageData, ReadError> {
    let dataset = reader.open(asset).await?;
    dataset.tile(tile, options).await
}

/// Composes `tile` from `assets`, taken in the order given.
///
/// Assets are read `chunk_size` at a time and fed to the selection in
/// asset order. Reading stops after the chunk in which the selection
/// completes. Per-asset failures are logged and collected; the call fails
/// with [`MosaicError::EmptyMosaic`] only when no asset yields any valid
/// pixel.
pub async fn mosaic_tile<R: RasterReader>(
    reader: &R,
    assets: &[String],
    tile: TileCoord,
    options: &ReadOptions,
    method: PixelSelectionMethod,
    chunk_size: usize,
) -> Result<TileComposition> {
    let mut selection = method.selector();
    let mut assets_used = Vec::new();
    let mut failures = Vec::new();

    'chunks: for chunk in assets.chunks(chunk_size.max(1)) {
        let results = join_all(
            chunk
                .iter()
                .map(|asset| read_tile(reader, asset, tile, options)),
        )
        .await;

        for (asset, result) in chunk.iter().zip(results) {
            if selection.is_done() {
                break 'chunks;
            }
            match result {
                Ok(image) if image.is_fully_masked() => {
                    debug!(tile = %tile, asset, "asset has no data for tile");
                }
                Ok(image) => match selection.feed(image) {
                    Ok(()) => assets_used.push(asset.clone()),
                    Err(error) => {
                        warn!(tile = %tile, asset, error = %error, "discarding asset image");
                        failures.push(AssetFailure::new(asset, error));
                    }
                },
                Err(error) => {
                    warn!(tile = %tile, asset, error = %error, "asset read failed");
                    failures.push(AssetFailure::new(asset, error));
                }
            }
        }

        if selection.is_done() {
            break;
        }
    }

    let image = selection
        .take()
        .ok_or(MosaicError::EmptyMosaic { tile })?;

    debug!(
        tile = %tile,
        used = assets_used.len(),
        failed = failures.len(),
        method = %method,
        "composed tile"
    );

    Ok(TileComposition {
        image,
        assets_used,
        failures,
    })
}
