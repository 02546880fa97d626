//! Turning the input file into page images
//!
//! Raster inputs are used as-is. PDFs are handed to a `PageSource`, which
//! writes one image per page into the run's temporary directory.

pub mod embedded;
pub mod pdftoppm;

use crate::config::{Config, PageSourceKind};
use crate::error::AutocropError;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Produces page images from a PDF
pub trait PageSource {
    /// Returns the source identifier (e.g., "pdftoppm", "embedded")
    fn name(&self) -> &'static str;

    /// Fail early if the source cannot run on this machine
    fn check_available(&self) -> Result<(), AutocropError>;

    /// Write the pages of `pdf` into `dir` and return their paths in page order
    fn render(&self, pdf: &Path, dir: &Path) -> Result<Vec<PathBuf>, AutocropError>;
}

/// Build the page source selected in the configuration
pub fn for_config(config: &Config) -> Box<dyn PageSource> {
    match config.page_source {
        PageSourceKind::Pdftoppm => Box::new(pdftoppm::Pdftoppm::new(config.dpi)),
        PageSourceKind::Embedded => Box::new(embedded::EmbeddedImages),
    }
}

/// Page images to process for `input`.
///
/// For a PDF the source's availability is checked before it renders
/// anything, and a PDF that yields no pages is an error. Anything else is
/// treated as a single raster page.
pub fn page_images<S>(input: &Path, source: &S, dir: &Path) -> Result<Vec<PathBuf>, AutocropError>
where
    S: PageSource + ?Sized,
{
    if !is_pdf(input)? {
        return Ok(vec![input.to_path_buf()]);
    }

    source.check_available()?;

    tracing::info!(
        "Input is a PDF. Converting pages to images with {}...",
        source.name()
    );
    let pages = source.render(input, dir)?;

    if pages.is_empty() {
        return Err(AutocropError::NoPages {
            path: input.to_path_buf(),
        });
    }

    tracing::info!("Extracted {} page-image(s) to process.", pages.len());
    Ok(pages)
}

/// Check if a file is a PDF by its extension or magic bytes
pub fn is_pdf(path: &Path) -> Result<bool, AutocropError> {
    if let Some(ext) = path.extension() {
        if ext.to_string_lossy().to_lowercase() == "pdf" {
            return Ok(true);
        }
    }

    let mut file = File::open(path)?;
    let mut magic = [0u8; 5];
    if file.read_exact(&mut magic).is_ok() {
        return Ok(&magic == b"%PDF-");
    }

    Ok(false)
}
