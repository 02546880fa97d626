use crate::border;
use crate::config::{Config, Rotation};
use crate::detect::{BoundingBox, RegionDetector};
use crate::engine::TextRecognizer;
use crate::error::AutocropError;
use crate::imaging;
use crate::orientation::OrientationResolver;
use crate::raster::{self, PageSource};
use image::{imageops, ImageFormat, RgbImage};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Hands out output numbers, global across all pages of a run and starting at 1.
///
/// A number is taken before its region is processed, so numbering does not
/// depend on whether or when processing succeeds.
#[derive(Debug)]
pub struct OutputCounter {
    next: usize,
}

impl Default for OutputCounter {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl OutputCounter {
    pub fn next(&mut self) -> usize {
        let current = self.next;
        self.next += 1;
        current
    }

    /// Numbers handed out so far
    pub fn issued(&self) -> usize {
        self.next - 1
    }
}

/// Timing information for a single processing step
#[derive(Debug, Clone)]
pub struct StepTiming {
    pub name: &'static str,
    pub time_ms: u64,
}

/// A region that was written to disk
#[derive(Debug, Clone)]
pub struct RegionReport {
    pub bbox: BoundingBox,
    pub rotation: Rotation,
    pub output: PathBuf,
    pub steps: Vec<StepTiming>,
}

/// Totals for a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub pages: usize,
    pub regions_saved: usize,
    pub regions_failed: usize,
}

/// Per-page and per-region processing around one recognizer
pub struct Pipeline<'a, R: ?Sized> {
    config: &'a Config,
    detector: RegionDetector,
    resolver: OrientationResolver,
    recognizer: &'a R,
}

impl<'a, R> Pipeline<'a, R>
where
    R: TextRecognizer + ?Sized,
{
    pub fn new(config: &'a Config, recognizer: &'a R) -> Self {
        Self {
            config,
            detector: RegionDetector::new(config),
            resolver: OrientationResolver::new(config),
            recognizer,
        }
    }

    /// Detect, orient, trim and save every region of one page image.
    ///
    /// A page that cannot be read or segmented counts as having no regions.
    pub fn process_page(
        &self,
        page_path: &Path,
        counter: &mut OutputCounter,
        summary: &mut RunSummary,
    ) -> Vec<RegionReport> {
        tracing::info!("---");
        tracing::info!(
            "Processing image: {}",
            page_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| page_path.display().to_string())
        );
        summary.pages += 1;

        let page = match image::open(page_path) {
            Ok(img) => img.to_rgb8(),
            Err(e) => {
                tracing::error!("Error finding sub-images: failed to load page: {}", e);
                return Vec::new();
            }
        };

        let boxes = match self.detector.detect(&page) {
            Ok(boxes) => boxes,
            Err(e) => {
                tracing::error!("Error finding sub-images: {}", e);
                Vec::new()
            }
        };

        if boxes.is_empty() {
            tracing::info!("No images found on this page (or settings are wrong). Skipping.");
            return Vec::new();
        }

        let mut reports = Vec::with_capacity(boxes.len());
        for bbox in boxes {
            let output = self.config.output_path(counter.next());
            match self.process_region(&page, bbox, &output) {
                Ok(report) => {
                    summary.regions_saved += 1;
                    reports.push(report);
                }
                Err(e) => {
                    tracing::error!("Failed to save region {} to {:?}: {}", bbox, output, e);
                    summary.regions_failed += 1;
                }
            }
        }

        reports
    }

    /// Crop one region out of `page`, correct its orientation, trim its border
    /// and write it to `output` as JPEG
    pub fn process_region(
        &self,
        page: &RgbImage,
        bbox: BoundingBox,
        output: &Path,
    ) -> Result<RegionReport, AutocropError> {
        tracing::info!(
            "Found sub-image at {} (WxH: {}x{}).",
            bbox,
            bbox.width,
            bbox.height
        );

        if !bbox.fits_within(page.width(), page.height()) {
            return Err(AutocropError::DetectionError(format!(
                "region {} lies outside the {}x{} page",
                bbox,
                page.width(),
                page.height()
            )));
        }

        let mut steps = Vec::new();

        let region = timed("crop", &mut steps, || {
            imageops::crop_imm(page, bbox.x, bbox.y, bbox.width, bbox.height).to_image()
        });

        tracing::info!("Detecting orientation...");
        let orientation = timed("orientation", &mut steps, || {
            self.resolver.resolve(&region, self.recognizer)
        });

        let rotated = timed("rotate", &mut steps, || {
            imaging::rotate(&region, orientation.rotation)
        });

        let trimmed = timed("border", &mut steps, || border::crop(&rotated));

        timed("save", &mut steps, || {
            trimmed.save_with_format(output, ImageFormat::Jpeg)
        })?;

        tracing::info!("Saved to: {}", output.display());
        for step in &steps {
            tracing::debug!("  {} took {}ms", step.name, step.time_ms);
        }

        Ok(RegionReport {
            bbox,
            rotation: orientation.rotation,
            output: output.to_path_buf(),
            steps,
        })
    }
}

/// Process every page of `config.input` and return the run totals.
///
/// Page images from PDFs live in a temporary directory that is removed when
/// this function returns, on success and on error alike.
pub fn run<R, S>(config: &Config, recognizer: &R, source: &S) -> Result<RunSummary, AutocropError>
where
    R: TextRecognizer + ?Sized,
    S: PageSource + ?Sized,
{
    config.validate()?;

    let temp_dir = tempfile::Builder::new()
        .prefix("photo-autocrop-")
        .tempdir()?;
    let pages = raster::page_images(&config.input, source, temp_dir.path())?;

    std::fs::create_dir_all(&config.output_dir)?;

    let pipeline = Pipeline::new(config, recognizer);
    let mut counter = OutputCounter::default();
    let mut summary = RunSummary::default();

    for page in &pages {
        pipeline.process_page(page, &mut counter, &mut summary);
    }

    tracing::info!("---");
    tracing::info!(
        "Processing complete. Saved {} final image(s).",
        summary.regions_saved
    );
    if summary.regions_failed > 0 {
        tracing::warn!("{} region(s) could not be saved", summary.regions_failed);
    }

    Ok(summary)
}

fn timed<T>(name: &'static str, steps: &mut Vec<StepTiming>, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let result = f();
    steps.push(StepTiming {
        name,
        time_ms: start.elapsed().as_millis() as u64,
    });
    result
}
