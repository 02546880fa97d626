//! Text recognizer implementations
//!
//! This module contains implementations of the TextRecognizer trait for
//! different OCR backends. Engines are conditionally compiled based on
//! feature flags.

#[cfg(feature = "engine-ocrs")]
pub mod ocrs;

#[cfg(feature = "engine-leptess")]
pub mod leptess;

#[cfg(any(feature = "engine-ocrs", feature = "engine-leptess"))]
mod download;

use crate::config::Config;
use crate::engine::TextRecognizer;
use crate::error::AutocropError;

/// Names of the engines compiled into this build, default first
pub fn available() -> Vec<&'static str> {
    let mut names = Vec::new();

    #[cfg(feature = "engine-leptess")]
    names.push("leptess");

    #[cfg(feature = "engine-ocrs")]
    names.push("ocrs");

    names
}

/// Initialize the configured engine, or the default one when none is named.
///
/// Failure here is a setup error: a missing engine, training data that
/// cannot be fetched, or a model that does not load.
pub fn create(config: &Config) -> Result<Box<dyn TextRecognizer>, AutocropError> {
    let names = available();
    let name = match config.engine.as_deref() {
        Some(name) => name,
        None => names.first().copied().ok_or_else(|| {
            AutocropError::InitializationError(
                "No OCR engines available. Build with --features engine-leptess or --features engine-ocrs".to_string(),
            )
        })?,
    };

    match name {
        #[cfg(feature = "engine-leptess")]
        "leptess" => {
            tracing::info!("Initializing leptess engine...");
            Ok(Box::new(leptess::LeptessEngine::new(config)?))
        }
        #[cfg(feature = "engine-ocrs")]
        "ocrs" => {
            tracing::info!("Initializing ocrs engine...");
            Ok(Box::new(ocrs::OcrsEngine::new(config)?))
        }
        other => Err(AutocropError::InitializationError(format!(
            "Unknown OCR engine '{}' (available: {})",
            other,
            names.join(", ")
        ))),
    }
}
