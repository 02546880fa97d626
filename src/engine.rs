use crate::error::AutocropError;
use image::GrayImage;

/// Trait that all text recognizers must implement
pub trait TextRecognizer {
    /// Returns the engine identifier (e.g., "ocrs", "leptess")
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of the engine
    fn description(&self) -> &'static str;

    /// Recognize the text in a binarized image, trimmed of surrounding whitespace
    fn recognize(&self, image: &GrayImage) -> Result<String, AutocropError>;
}
