use crate::config::{PageSourceKind, Polarity, Rotation};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "photo-autocrop")]
#[command(about = "Automatically crops sub-images from a larger scanned image or PDF")]
#[command(version)]
pub struct Args {
    /// Path to the input file (PDF, PNG, or JPG)
    pub input: PathBuf,

    /// Directory the cropped images are written to
    #[arg(long, env = "AUTOCROP_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// File name prefix for cropped images
    #[arg(long, env = "AUTOCROP_PREFIX", default_value = "final_image_")]
    pub prefix: String,

    /// Grayscale intensity at or above which a pixel counts as white
    #[arg(long, env = "AUTOCROP_WHITE_THRESHOLD", default_value = "200")]
    pub white_threshold: u8,

    /// Minimum contour area in pixels for a region to count as a sub-image
    #[arg(long, env = "AUTOCROP_MIN_AREA", default_value = "5000")]
    pub min_area: f64,

    /// Whether sub-images are lighter or darker than their backing
    #[arg(long, env = "AUTOCROP_POLARITY", value_enum, default_value = "light")]
    pub polarity: Polarity,

    /// Height of the header band read for a caption, as a fraction of image height
    #[arg(long, env = "AUTOCROP_HEADER_FRACTION", default_value = "0.10")]
    pub header_fraction: f64,

    /// OCR runs only when the header band's mean intensity is below this value
    #[arg(long, env = "AUTOCROP_DARK_HEADER_MEAN", default_value = "100")]
    pub dark_header_mean: f64,

    /// Binarization threshold applied to the header band before OCR
    #[arg(long, env = "AUTOCROP_OCR_THRESHOLD", default_value = "128")]
    pub ocr_threshold: u8,

    /// Rotation candidates in search order (counter-clockwise degrees)
    #[arg(
        long,
        env = "AUTOCROP_ROTATION_ORDER",
        value_delimiter = ',',
        default_value = "0,270,90,180"
    )]
    pub rotation_order: Vec<Rotation>,

    /// OCR engine to use (defaults to the first compiled-in engine)
    #[arg(long, env = "AUTOCROP_ENGINE")]
    pub engine: Option<String>,

    /// Language for OCR (e.g., "eng", "deu", "fra")
    #[arg(long, env = "AUTOCROP_LANGUAGE", default_value = "eng")]
    pub language: String,

    /// Tesseract page segmentation mode
    #[arg(long, env = "AUTOCROP_PSM", default_value = "1")]
    pub page_seg_mode: u8,

    /// Path to tessdata directory (downloaded and cached if not set)
    #[arg(long, env = "TESSDATA_PREFIX")]
    pub tessdata_path: Option<String>,

    /// Resolution used when rasterizing PDF pages
    #[arg(long, env = "AUTOCROP_DPI", default_value = "300")]
    pub dpi: u32,

    /// How PDF pages are turned into images
    #[arg(long, env = "AUTOCROP_PAGE_SOURCE", value_enum, default_value = "pdftoppm")]
    pub page_source: PageSourceKind,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_defaults_match_config_defaults() {
        let args = Args::try_parse_from(["photo-autocrop", "scan.jpg"]).unwrap();
        let config = Config::from(args);
        let defaults = Config::default();

        assert_eq!(config.input, PathBuf::from("scan.jpg"));
        assert_eq!(config.prefix, defaults.prefix);
        assert_eq!(config.white_threshold, defaults.white_threshold);
        assert_eq!(config.min_area, defaults.min_area);
        assert_eq!(config.rotation_order, defaults.rotation_order);
        assert_eq!(config.dpi, 300);
    }

    #[test]
    fn test_rotation_order_parses_list() {
        let args = Args::try_parse_from([
            "photo-autocrop",
            "scan.pdf",
            "--rotation-order",
            "90,0",
        ])
        .unwrap();
        assert_eq!(args.rotation_order, vec![Rotation::Deg90, Rotation::Deg0]);
    }

    #[test]
    fn test_input_is_required() {
        assert!(Args::try_parse_from(["photo-autocrop"]).is_err());
    }
}
