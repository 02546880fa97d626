//! Orientation detection
//!
//! Each candidate rotation is scored by recognizing the text in the top band
//! of the rotated region. Only bands that are predominantly dark are read,
//! since captions sit on dark backing paper, and only text containing a space
//! counts, which filters out single-token noise. The longest qualifying text
//! wins; candidates are tried in the configured order and a later candidate
//! must be strictly longer to replace an earlier one.

use crate::config::{Config, Rotation};
use crate::engine::TextRecognizer;
use crate::imaging;
use image::{imageops, GrayImage, RgbImage};

/// A rotation together with the text that qualified it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub rotation: Rotation,
    pub text: String,
}

/// Outcome of the orientation search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Orientation {
    /// Rotation to apply; `Deg0` when no candidate qualified
    pub rotation: Rotation,
    /// The winning candidate, if any qualified
    pub best: Option<Candidate>,
}

impl Orientation {
    pub fn detected(&self) -> bool {
        self.best.is_some()
    }
}

/// Determines which quarter turn makes a region's caption upright
#[derive(Debug, Clone)]
pub struct OrientationResolver {
    header_fraction: f64,
    dark_header_mean: f64,
    ocr_threshold: u8,
    rotation_order: Vec<Rotation>,
}

impl OrientationResolver {
    pub fn new(config: &Config) -> Self {
        Self {
            header_fraction: config.header_fraction,
            dark_header_mean: config.dark_header_mean,
            ocr_threshold: config.ocr_threshold,
            rotation_order: config.rotation_order.clone(),
        }
    }

    pub fn resolve<R>(&self, region: &RgbImage, recognizer: &R) -> Orientation
    where
        R: TextRecognizer + ?Sized,
    {
        // Grayscale is per-pixel, so converting before rotating gives the same
        // bands as rotating the color region first.
        let gray = imaging::to_gray(region);

        let best = self
            .rotation_order
            .iter()
            .fold(None::<Candidate>, |best, &rotation| {
                tracing::info!("Trying rotation {}...", rotation);
                match self.read_header(&gray, rotation, recognizer) {
                    Some(text) if qualifies(&text, best.as_ref()) => {
                        Some(Candidate { rotation, text })
                    }
                    _ => best,
                }
            });

        match best {
            Some(candidate) => {
                tracing::info!(
                    "Detected rotation: {} degrees",
                    candidate.rotation
                );
                Orientation {
                    rotation: candidate.rotation,
                    best: Some(candidate),
                }
            }
            None => {
                tracing::info!("Could not detect orientation, keeping original orientation");
                Orientation {
                    rotation: Rotation::Deg0,
                    best: None,
                }
            }
        }
    }

    /// Text recognized in the header band of `gray` rotated by `rotation`, or
    /// `None` when the band is empty, too light to read, or recognition fails.
    fn read_header<R>(&self, gray: &GrayImage, rotation: Rotation, recognizer: &R) -> Option<String>
    where
        R: TextRecognizer + ?Sized,
    {
        let rotated = imaging::rotate(gray, rotation);
        let band = self.header_band(&rotated)?;

        let mean = imaging::mean_intensity(&band);
        tracing::info!("Mean pixel value of header band: {:.2}", mean);

        if mean >= self.dark_header_mean {
            tracing::info!("Header band is not predominantly dark, skipping OCR");
            return None;
        }

        tracing::info!("Header band is predominantly dark, running OCR...");
        let binarized = imaging::binary_inverted(&band, self.ocr_threshold);

        match recognizer.recognize(&binarized) {
            Ok(text) => {
                tracing::info!("OCR result: \"{}\"", text);
                Some(text)
            }
            Err(e) => {
                tracing::warn!("OCR failed for rotation {}: {}", rotation, e);
                None
            }
        }
    }

    /// Top `header_fraction` of the image, or `None` if that rounds down to
    /// zero rows
    pub fn header_band(&self, image: &GrayImage) -> Option<GrayImage> {
        let (width, height) = image.dimensions();
        let band_height = (height as f64 * self.header_fraction) as u32;
        if band_height == 0 || width == 0 {
            return None;
        }
        Some(imageops::crop_imm(image, 0, 0, width, band_height).to_image())
    }
}

/// A reading beats the current best only if it has a space and is strictly longer
fn qualifies(text: &str, best: Option<&Candidate>) -> bool {
    let best_len = best.map_or(0, |c| c.text.chars().count());
    text.contains(' ') && text.chars().count() > best_len
}
