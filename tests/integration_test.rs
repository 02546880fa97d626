use image::{GrayImage, ImageFormat, Rgb, RgbImage};
use photo_autocrop::config::{Config, Polarity, Rotation};
use photo_autocrop::pipeline;
use photo_autocrop::raster::PageSource;
use photo_autocrop::{AutocropError, TextRecognizer};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Replies with scripted text in call order, then with empty text
struct ScriptedRecognizer {
    replies: RefCell<VecDeque<String>>,
    calls: RefCell<usize>,
}

impl ScriptedRecognizer {
    fn new(replies: &[&str]) -> Self {
        Self {
            replies: RefCell::new(replies.iter().map(|s| s.to_string()).collect()),
            calls: RefCell::new(0),
        }
    }

    fn silent() -> Self {
        Self::new(&[])
    }

    fn calls(&self) -> usize {
        *self.calls.borrow()
    }
}

impl TextRecognizer for ScriptedRecognizer {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn description(&self) -> &'static str {
        "test recognizer"
    }

    fn recognize(&self, _image: &GrayImage) -> Result<String, AutocropError> {
        *self.calls.borrow_mut() += 1;
        Ok(self.replies.borrow_mut().pop_front().unwrap_or_default())
    }
}

/// Writes prepared page images into the run's temp dir
struct FakeRasterizer {
    pages: Vec<RgbImage>,
    installed: bool,
    used_dir: RefCell<Option<PathBuf>>,
}

impl FakeRasterizer {
    fn new(pages: Vec<RgbImage>) -> Self {
        Self {
            pages,
            installed: true,
            used_dir: RefCell::new(None),
        }
    }

    fn not_installed() -> Self {
        Self {
            installed: false,
            ..Self::new(vec![page_with_regions(300, 300, &[(50, 50, 120, 120)])])
        }
    }
}

impl PageSource for FakeRasterizer {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn check_available(&self) -> Result<(), AutocropError> {
        if self.installed {
            Ok(())
        } else {
            Err(AutocropError::MissingDependency {
                program: "fake".to_string(),
                reason: "not installed".to_string(),
            })
        }
    }

    fn render(&self, _pdf: &Path, dir: &Path) -> Result<Vec<PathBuf>, AutocropError> {
        *self.used_dir.borrow_mut() = Some(dir.to_path_buf());
        let mut paths = Vec::new();
        for (i, page) in self.pages.iter().enumerate() {
            let path = dir.join(format!("page-{}.png", i + 1));
            page.save(&path)?;
            paths.push(path);
        }
        Ok(paths)
    }
}

fn page_with_regions(width: u32, height: u32, regions: &[(u32, u32, u32, u32)]) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let inside = regions
            .iter()
            .any(|&(rx, ry, rw, rh)| x >= rx && x < rx + rw && y >= ry && y < ry + rh);
        if inside {
            Rgb([255, 255, 255])
        } else {
            Rgb([0, 0, 0])
        }
    })
}

fn fake_pdf(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("album.pdf");
    std::fs::write(&path, b"%PDF-1.4\n%%EOF\n").unwrap();
    path
}

fn output_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn test_jpg_with_two_white_regions() {
    let input_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();

    let page = page_with_regions(600, 400, &[(40, 40, 200, 150), (320, 200, 220, 160)]);
    let input = input_dir.path().join("scan.jpg");
    page.save_with_format(&input, ImageFormat::Jpeg).unwrap();

    let config = Config {
        input,
        output_dir: output_dir.path().to_path_buf(),
        ..Config::default()
    };
    let recognizer = ScriptedRecognizer::silent();
    let source = FakeRasterizer::new(Vec::new());

    let summary = pipeline::run(&config, &recognizer, &source).unwrap();

    assert_eq!(summary.pages, 1);
    assert_eq!(summary.regions_saved, 2);
    assert_eq!(
        output_names(output_dir.path()),
        vec!["final_image_1.jpg", "final_image_2.jpg"]
    );
    // White regions have no dark header band, so OCR never runs
    assert_eq!(recognizer.calls(), 0);
    // Raster input does not go through the rasterizer
    assert!(source.used_dir.borrow().is_none());

    // Both kept their upright (landscape) orientation
    for name in ["final_image_1.jpg", "final_image_2.jpg"] {
        let saved = image::open(output_dir.path().join(name)).unwrap();
        assert!(saved.width() > saved.height(), "{} was rotated", name);
    }
}

#[test]
fn test_numbering_is_global_across_pages() {
    let input_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();

    let source = FakeRasterizer::new(vec![
        page_with_regions(500, 400, &[(20, 20, 150, 100), (250, 250, 150, 100)]),
        page_with_regions(500, 400, &[]),
        page_with_regions(500, 400, &[(100, 100, 200, 200)]),
    ]);
    let config = Config {
        input: fake_pdf(&input_dir),
        output_dir: output_dir.path().to_path_buf(),
        ..Config::default()
    };

    let summary = pipeline::run(&config, &ScriptedRecognizer::silent(), &source).unwrap();

    assert_eq!(summary.pages, 3);
    assert_eq!(summary.regions_saved, 3);
    assert_eq!(
        output_names(output_dir.path()),
        vec!["final_image_1.jpg", "final_image_2.jpg", "final_image_3.jpg"]
    );

    // Last region comes from the third page and is square
    let last = image::open(output_dir.path().join("final_image_3.jpg")).unwrap();
    assert_eq!((last.width(), last.height()), (200, 200));
}

#[test]
fn test_pdf_without_pages_fails_before_writing() {
    let input_dir = TempDir::new().unwrap();
    let output_root = TempDir::new().unwrap();
    let output_dir = output_root.path().join("out");

    let source = FakeRasterizer::new(Vec::new());
    let config = Config {
        input: fake_pdf(&input_dir),
        output_dir: output_dir.clone(),
        ..Config::default()
    };

    let result = pipeline::run(&config, &ScriptedRecognizer::silent(), &source);

    match result {
        Err(e @ AutocropError::NoPages { .. }) => assert!(e.is_fatal()),
        other => panic!("expected NoPages, got {:?}", other),
    }
    assert!(!output_dir.exists());
}

#[test]
fn test_missing_rasterizer_stops_run_before_writing() {
    let input_dir = TempDir::new().unwrap();
    let output_root = TempDir::new().unwrap();
    let output_dir = output_root.path().join("out");

    let source = FakeRasterizer::not_installed();
    let recognizer = ScriptedRecognizer::silent();
    let config = Config {
        input: fake_pdf(&input_dir),
        output_dir: output_dir.clone(),
        ..Config::default()
    };

    let result = pipeline::run(&config, &recognizer, &source);

    match result {
        Err(e @ AutocropError::MissingDependency { .. }) => assert!(e.is_fatal()),
        other => panic!("expected MissingDependency, got {:?}", other),
    }
    assert!(!output_dir.exists());
    assert!(source.used_dir.borrow().is_none());
    assert_eq!(recognizer.calls(), 0);
}

#[test]
fn test_temp_pages_are_removed_after_run() {
    let input_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();

    let source = FakeRasterizer::new(vec![page_with_regions(300, 300, &[(50, 50, 120, 120)])]);
    let config = Config {
        input: fake_pdf(&input_dir),
        output_dir: output_dir.path().to_path_buf(),
        ..Config::default()
    };

    pipeline::run(&config, &ScriptedRecognizer::silent(), &source).unwrap();

    let used = source.used_dir.borrow().clone().expect("rasterizer was not called");
    assert!(!used.exists());
}

#[test]
fn test_caption_rotates_dark_photo_on_light_bed() {
    let input_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();

    // A dark 300x150 photo on a white scanner bed
    let page = RgbImage::from_fn(500, 400, |x, y| {
        if (100..400).contains(&x) && (100..250).contains(&y) {
            Rgb([30, 30, 30])
        } else {
            Rgb([255, 255, 255])
        }
    });
    let input = input_dir.path().join("bed.png");
    page.save(&input).unwrap();

    let config = Config {
        input,
        output_dir: output_dir.path().to_path_buf(),
        polarity: Polarity::Dark,
        ..Config::default()
    };
    // Every header band is dark; only the second candidate (270) reads a caption
    let recognizer = ScriptedRecognizer::new(&["", "Grand Canyon 1987", "noise", "x"]);

    let summary =
        pipeline::run(&config, &recognizer, &FakeRasterizer::new(Vec::new())).unwrap();

    assert_eq!(summary.regions_saved, 1);
    assert_eq!(recognizer.calls(), 4);
    let saved = image::open(output_dir.path().join("final_image_1.jpg")).unwrap();
    assert_eq!((saved.width(), saved.height()), (150, 300));
}

#[test]
fn test_invalid_rotation_order_is_rejected() {
    let config = Config {
        rotation_order: vec![Rotation::Deg90, Rotation::Deg90],
        ..Config::default()
    };

    let result = pipeline::run(
        &config,
        &ScriptedRecognizer::silent(),
        &FakeRasterizer::new(Vec::new()),
    );

    assert!(matches!(result, Err(AutocropError::InvalidConfig(_))));
}
