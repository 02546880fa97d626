//! Leptess/Tesseract engine implementation
//!
//! Tesseract-based recognizer with a configurable page segmentation mode.
//! Uses tesseract-static crate for static linking (no system dependencies).
//! Downloads tessdata (training data) automatically on first use.

use super::download;
use crate::config::Config;
use crate::engine::TextRecognizer;
use crate::error::AutocropError;
use crate::imaging;
use image::GrayImage;
use tesseract_static::tesseract::Tesseract;

/// Tesseract OCR Engine
pub struct LeptessEngine {
    /// Path to tessdata directory
    tessdata_path: String,
    language: String,
    /// Value for tesseract's `tessedit_pageseg_mode`
    page_seg_mode: String,
}

impl LeptessEngine {
    /// Create a new Tesseract-based recognizer
    pub fn new(config: &Config) -> Result<Self, AutocropError> {
        let language = config.language.clone();

        let tessdata_path = match &config.tessdata_path {
            Some(path) => path.clone(),
            None => ensure_tessdata_available(&language)?,
        };

        // Validate that tessdata is accessible by doing a test initialization
        let test_tess = Tesseract::new(Some(&tessdata_path), Some(&language)).map_err(|e| {
            AutocropError::InitializationError(format!("Failed to initialize Tesseract: {}", e))
        })?;
        drop(test_tess);

        tracing::info!(
            "Leptess engine initialized (tessdata: {}, language: {}, psm: {})",
            tessdata_path,
            language,
            config.page_seg_mode
        );

        Ok(Self {
            tessdata_path,
            language,
            page_seg_mode: config.page_seg_mode.to_string(),
        })
    }
}

impl TextRecognizer for LeptessEngine {
    fn name(&self) -> &'static str {
        "leptess"
    }

    fn description(&self) -> &'static str {
        "Tesseract OCR engine with configurable page segmentation"
    }

    fn recognize(&self, image: &GrayImage) -> Result<String, AutocropError> {
        let (width, height) = image.dimensions();

        // RGB BMP is always supported by leptonica
        let mut bmp_data = Vec::new();
        imaging::to_rgb(image)
            .write_to(&mut std::io::Cursor::new(&mut bmp_data), image::ImageFormat::Bmp)
            .map_err(|e| {
                AutocropError::RecognitionError(format!("Failed to convert to BMP: {}", e))
            })?;

        tracing::debug!(
            "Recognizing image: {}x{}, BMP size: {} bytes",
            width,
            height,
            bmp_data.len()
        );

        let tess = Tesseract::new(Some(&self.tessdata_path), Some(&self.language)).map_err(
            |e| AutocropError::RecognitionError(format!("Failed to create Tesseract: {}", e)),
        )?;

        let tess = tess
            .set_variable("tessedit_pageseg_mode", &self.page_seg_mode)
            .map_err(|e| {
                AutocropError::RecognitionError(format!("Failed to set page segmentation mode: {}", e))
            })?;

        let tess = tess.set_image_from_mem(&bmp_data).map_err(|e| {
            AutocropError::RecognitionError(format!(
                "Failed to set image ({}x{}, {} bytes): {}",
                width,
                height,
                bmp_data.len(),
                e
            ))
        })?;

        let mut tess = tess.recognize().map_err(|e| {
            AutocropError::RecognitionError(format!("Failed to recognize text: {}", e))
        })?;

        let text = tess
            .get_text()
            .map_err(|e| AutocropError::RecognitionError(format!("Failed to get text: {}", e)))?;

        Ok(text.trim().to_string())
    }
}

/// Ensure tessdata is available, downloading if needed
fn ensure_tessdata_available(language: &str) -> Result<String, AutocropError> {
    let cache_dir = download::cache_dir("tessdata")?;
    download::ensure_cached(
        &tessdata_url(language),
        &cache_dir,
        &format!("{}.traineddata", language),
    )?;

    // Tesseract expects the directory, not the file
    cache_dir
        .to_str()
        .map(|s| s.to_string())
        .ok_or_else(|| AutocropError::InitializationError("Invalid tessdata path".to_string()))
}

/// Get tessdata download URL for a language
fn tessdata_url(language: &str) -> String {
    // tessdata_fast for smaller, faster downloads
    format!(
        "https://github.com/tesseract-ocr/tessdata_fast/raw/main/{}.traineddata",
        language
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tessdata_url_names_language() {
        assert!(tessdata_url("deu").ends_with("/deu.traineddata"));
    }
}
