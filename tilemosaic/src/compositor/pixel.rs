//! Pixel selection: how overlapping asset images fold into one tile.

use std::fmt;
use std::str::FromStr;

use crate::reader::{ImageData, ReadError};

/// Accumulates asset images into a single result.
///
/// Images are fed in priority order. A selection reports when no further
/// image could change its result so the compositor can stop reading.
pub trait PixelSelection: Send {
    /// Folds one image into the result.
    ///
    /// Fails when the image does not match the shape of earlier images.
    fn feed(&mut self, image: ImageData) -> Result<(), ReadError>;

    /// The result can no longer change.
    fn is_done(&self) -> bool {
        false
    }

    /// Takes the accumulated image, if any image was fed.
    fn take(&mut self) -> Option<ImageData>;
}

/// Built-in selection methods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PixelSelectionMethod {
    /// First valid pixel in priority order wins
    #[default]
    First,
    /// Highest valid value per pixel and band
    Highest,
    /// Lowest valid value per pixel and band
    Lowest,
}

impl PixelSelectionMethod {
    /// Fresh selection state for one tile.
    pub fn selector(&self) -> Box<dyn PixelSelection> {
        match self {
            PixelSelectionMethod::First => Box::new(FirstSelection::default()),
            PixelSelectionMethod::Highest => Box::new(ExtremeSelection::new(|new, cur| new > cur)),
            PixelSelectionMethod::Lowest => Box::new(ExtremeSelection::new(|new, cur| new < cur)),
        }
    }
}

impl fmt::Display for PixelSelectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PixelSelectionMethod::First => "first",
            PixelSelectionMethod::Highest => "highest",
            PixelSelectionMethod::Lowest => "lowest",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for PixelSelectionMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "first" => Ok(PixelSelectionMethod::First),
            "highest" => Ok(PixelSelectionMethod::Highest),
            "lowest" => Ok(PixelSelectionMethod::Lowest),
            other => Err(format!("unknown pixel selection method '{}'", other)),
        }
    }
}

fn check_shape(current: &ImageData, image: &ImageData) -> Result<(), ReadError> {
    if current.same_shape(image) {
        Ok(())
    } else {
        Err(ReadError::InvalidData(format!(
            "image is {}x{} with {} bands, expected {}x{} with {} bands",
            image.width(),
            image.height(),
            image.band_count(),
            current.width(),
            current.height(),
            current.band_count()
        )))
    }
}

/// Fills only pixels still masked after earlier images.
#[derive(Debug, Default)]
struct FirstSelection {
    result: Option<ImageData>,
}

impl PixelSelection for FirstSelection {
    fn feed(&mut self, image: ImageData) -> Result<(), ReadError> {
        let Some(current) = self.result.as_mut() else {
            self.result = Some(image);
            return Ok(());
        };
        check_shape(current, &image)?;

        let (bands, mask) = current.parts_mut();
        for (pixel, valid) in image.mask().iter().enumerate() {
            if *valid && !mask[pixel] {
                for (band, source) in bands.iter_mut().zip(image.bands()) {
                    band[pixel] = source[pixel];
                }
                mask[pixel] = true;
            }
        }
        Ok(())
    }

    fn is_done(&self) -> bool {
        self.result.as_ref().is_some_and(ImageData::is_fully_valid)
    }

    fn take(&mut self) -> Option<ImageData> {
        self.result.take()
    }
}

/// Keeps the preferred valid value per pixel and band.
struct ExtremeSelection {
    result: Option<ImageData>,
    prefer: fn(f64, f64) -> bool,
}

impl ExtremeSelection {
    fn new(prefer: fn(f64, f64) -> bool) -> Self {
        Self {
            result: None,
            prefer,
        }
    }
}

impl PixelSelection for ExtremeSelection {
    fn feed(&mut self, image: ImageData) -> Result<(), ReadError> {
        let Some(current) = self.result.as_mut() else {
            self.result = Some(image);
            return Ok(());
        };
        check_shape(current, &image)?;

        let prefer = self.prefer;
        let (bands, mask) = current.parts_mut();
        for (pixel, valid) in image.mask().iter().enumerate() {
            if !*valid {
                continue;
            }
            let was_valid = mask[pixel];
            for (band, source) in bands.iter_mut().zip(image.bands()) {
                if !was_valid || prefer(source[pixel], band[pixel]) {
                    band[pixel] = source[pixel];
                }
            }
            mask[pixel] = true;
        }
        Ok(())
    }

    fn take(&mut self) -> Option<ImageData> {
        self.result.take()
    }
}
