//! Cached downloads of OCR training data and models

use crate::error::AutocropError;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Per-user cache directory for downloaded engine data
pub fn cache_dir(subdir: &str) -> Result<PathBuf, AutocropError> {
    let dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("photo-autocrop")
        .join(subdir);

    std::fs::create_dir_all(&dir).map_err(|e| {
        AutocropError::InitializationError(format!("Failed to create cache directory: {}", e))
    })?;

    Ok(dir)
}

/// Return `dir/filename`, downloading it from `url` first if it is not cached
pub fn ensure_cached(url: &str, dir: &Path, filename: &str) -> Result<PathBuf, AutocropError> {
    let path = dir.join(filename);

    if !path.exists() {
        tracing::info!("Downloading {} (this may take a moment)...", filename);
        download_file(url, &path)?;
        tracing::info!("Downloaded {} to {:?}", filename, path);
    } else {
        tracing::debug!("Using cached {:?}", path);
    }

    Ok(path)
}

/// Download a file from URL to path using ureq
fn download_file(url: &str, path: &Path) -> Result<(), AutocropError> {
    let response = ureq::get(url)
        .call()
        .map_err(|e| AutocropError::InitializationError(format!("Failed to download {}: {}", url, e)))?;

    let buffer = response.into_body().read_to_vec().map_err(|e| {
        AutocropError::InitializationError(format!("Failed to read response body: {}", e))
    })?;

    // Write beside the target and rename so an interrupted download never
    // looks cached on the next run.
    let partial = path.with_extension("part");
    let mut file = File::create(&partial).map_err(|e| {
        AutocropError::InitializationError(format!("Failed to create {:?}: {}", partial, e))
    })?;
    file.write_all(&buffer).map_err(|e| {
        AutocropError::InitializationError(format!("Failed to write {:?}: {}", partial, e))
    })?;
    std::fs::rename(&partial, path).map_err(|e| {
        AutocropError::InitializationError(format!("Failed to move {:?} into place: {}", path, e))
    })?;

    Ok(())
}
