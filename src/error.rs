use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AutocropError {
    #[error("Failed to initialize OCR engine: {0}")]
    InitializationError(String),

    #[error("Required program '{program}' is not available: {reason}")]
    MissingDependency { program: String, reason: String },

    #[error("Failed to rasterize PDF: {0}")]
    RasterizeError(String),

    #[error("No page images could be extracted from '{}'", path.display())]
    NoPages { path: PathBuf },

    #[error("Region detection failed: {0}")]
    DetectionError(String),

    #[error("Text recognition failed: {0}")]
    RecognitionError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AutocropError {
    /// Setup errors abort the run; everything else is contained per page or region.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AutocropError::InitializationError(_)
                | AutocropError::MissingDependency { .. }
                | AutocropError::RasterizeError(_)
                | AutocropError::NoPages { .. }
                | AutocropError::InvalidConfig(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_errors_are_fatal() {
        assert!(AutocropError::NoPages {
            path: PathBuf::from("scan.pdf")
        }
        .is_fatal());
        assert!(AutocropError::MissingDependency {
            program: "pdftoppm".to_string(),
            reason: "not found".to_string(),
        }
        .is_fatal());
    }

    #[test]
    fn test_contained_errors_are_not_fatal() {
        assert!(!AutocropError::RecognitionError("boom".to_string()).is_fatal());
        assert!(!AutocropError::DetectionError("boom".to_string()).is_fatal());
    }

    #[test]
    fn test_no_pages_message_names_file() {
        let err = AutocropError::NoPages {
            path: PathBuf::from("album.pdf"),
        };
        assert!(err.to_string().contains("album.pdf"));
    }
}
