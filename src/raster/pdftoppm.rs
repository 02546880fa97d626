//! Rasterization through poppler's `pdftoppm`

use super::PageSource;
use crate::error::AutocropError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

const PROGRAM: &str = "pdftoppm";
const PAGE_PREFIX: &str = "page";

/// Renders every page to JPEG at a fixed resolution
pub struct Pdftoppm {
    program: String,
    dpi: u32,
}

impl Pdftoppm {
    pub fn new(dpi: u32) -> Self {
        Self {
            program: PROGRAM.to_string(),
            dpi,
        }
    }

    /// Run `program` instead of the `pdftoppm` found on PATH
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

impl PageSource for Pdftoppm {
    fn name(&self) -> &'static str {
        PROGRAM
    }

    fn check_available(&self) -> Result<(), AutocropError> {
        // `-v` prints the version; only whether the program starts matters
        match Command::new(&self.program).arg("-v").output() {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(AutocropError::MissingDependency {
                program: self.program.clone(),
                reason: "not found on PATH; install poppler-utils or use --page-source embedded"
                    .to_string(),
            }),
            Err(e) => Err(AutocropError::MissingDependency {
                program: self.program.clone(),
                reason: e.to_string(),
            }),
        }
    }

    fn render(&self, pdf: &Path, dir: &Path) -> Result<Vec<PathBuf>, AutocropError> {
        let output = Command::new(&self.program)
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-jpeg")
            .arg(pdf)
            .arg(dir.join(PAGE_PREFIX))
            .output()
            .map_err(|e| AutocropError::RasterizeError(format!("Failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(AutocropError::RasterizeError(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        collect_pages(dir)
    }
}

/// Rendered pages in `dir`, ordered by page number
///
/// pdftoppm names pages `page-1.jpg`, or zero-padded (`page-01.jpg`) once the
/// document has ten or more pages.
fn collect_pages(dir: &Path) -> Result<Vec<PathBuf>, AutocropError> {
    let mut pages = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if let Some(number) = page_number(&path) {
            pages.push((number, path));
        }
    }

    pages.sort_by_key(|(number, _)| *number);
    Ok(pages.into_iter().map(|(_, path)| path).collect())
}

fn page_number(path: &Path) -> Option<u32> {
    if path.extension()? != "jpg" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    stem.strip_prefix(PAGE_PREFIX)?
        .strip_prefix('-')?
        .parse()
        .ok()
}
