use crate::cli::Args;
use crate::error::AutocropError;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_PREFIX: &str = "final_image_";
pub const DEFAULT_WHITE_THRESHOLD: u8 = 200;
pub const DEFAULT_MIN_AREA: f64 = 5000.0;
pub const DEFAULT_HEADER_FRACTION: f64 = 0.10;
pub const DEFAULT_DARK_HEADER_MEAN: f64 = 100.0;
pub const DEFAULT_OCR_THRESHOLD: u8 = 128;
pub const DEFAULT_PAGE_SEG_MODE: u8 = 1;
pub const DEFAULT_DPI: u32 = 300;

/// Search order for rotation candidates. Not degree-ascending: ties go to the
/// first qualifying candidate in this order.
pub const DEFAULT_ROTATION_ORDER: [Rotation; 4] = [
    Rotation::Deg0,
    Rotation::Deg270,
    Rotation::Deg90,
    Rotation::Deg180,
];

/// Counter-clockwise rotation by a multiple of 90 degrees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn degrees(self) -> u32 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    pub fn from_degrees(degrees: u32) -> Option<Self> {
        match degrees % 360 {
            0 => Some(Self::Deg0),
            90 => Some(Self::Deg90),
            180 => Some(Self::Deg180),
            270 => Some(Self::Deg270),
            _ => None,
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

impl FromStr for Rotation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let degrees: u32 = s
            .trim()
            .parse()
            .map_err(|e| format!("invalid rotation '{}': {}", s, e))?;
        Self::from_degrees(degrees)
            .ok_or_else(|| format!("rotation must be 0, 90, 180 or 270, got {}", degrees))
    }
}

/// Which side of the white threshold the sub-images sit on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Polarity {
    /// Light sub-images on a dark backing
    #[default]
    Light,
    /// Dark sub-images on a light scanner bed
    Dark,
}

/// How PDF pages are turned into page images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PageSourceKind {
    /// Rasterize every page with poppler's pdftoppm
    #[default]
    Pdftoppm,
    /// Pull the scanned page images straight out of the PDF
    Embedded,
}

/// Run configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub prefix: String,
    pub white_threshold: u8,
    pub min_area: f64,
    pub polarity: Polarity,
    pub header_fraction: f64,
    pub dark_header_mean: f64,
    pub ocr_threshold: u8,
    pub rotation_order: Vec<Rotation>,
    pub engine: Option<String>,
    pub language: String,
    pub page_seg_mode: u8,
    pub tessdata_path: Option<String>,
    pub dpi: u32,
    pub page_source: PageSourceKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output_dir: PathBuf::from("."),
            prefix: DEFAULT_PREFIX.to_string(),
            white_threshold: DEFAULT_WHITE_THRESHOLD,
            min_area: DEFAULT_MIN_AREA,
            polarity: Polarity::default(),
            header_fraction: DEFAULT_HEADER_FRACTION,
            dark_header_mean: DEFAULT_DARK_HEADER_MEAN,
            ocr_threshold: DEFAULT_OCR_THRESHOLD,
            rotation_order: DEFAULT_ROTATION_ORDER.to_vec(),
            engine: None,
            language: "eng".to_string(),
            page_seg_mode: DEFAULT_PAGE_SEG_MODE,
            tessdata_path: None,
            dpi: DEFAULT_DPI,
            page_source: PageSourceKind::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), AutocropError> {
        if !(self.header_fraction > 0.0 && self.header_fraction <= 1.0) {
            return Err(AutocropError::InvalidConfig(format!(
                "header fraction must be in (0, 1], got {}",
                self.header_fraction
            )));
        }

        if self.rotation_order.is_empty() {
            return Err(AutocropError::InvalidConfig(
                "rotation order must name at least one rotation".to_string(),
            ));
        }

        for (i, rotation) in self.rotation_order.iter().enumerate() {
            if self.rotation_order[..i].contains(rotation) {
                return Err(AutocropError::InvalidConfig(format!(
                    "rotation {} appears more than once in the search order",
                    rotation
                )));
            }
        }

        if self.dpi == 0 {
            return Err(AutocropError::InvalidConfig(
                "DPI must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Output file for the n-th saved region (1-based)
    pub fn output_path(&self, index: usize) -> PathBuf {
        self.output_dir.join(format!("{}{}.jpg", self.prefix, index))
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            input: args.input,
            output_dir: args.output_dir,
            prefix: args.prefix,
            white_threshold: args.white_threshold,
            min_area: args.min_area,
            polarity: args.polarity,
            header_fraction: args.header_fraction,
            dark_header_mean: args.dark_header_mean,
            ocr_threshold: args.ocr_threshold,
            rotation_order: args.rotation_order,
            engine: args.engine,
            language: args.language,
            page_seg_mode: args.page_seg_mode,
            tessdata_path: args.tessdata_path,
            dpi: args.dpi,
            page_source: args.page_source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rotation_order_is_not_ascending() {
        let degrees: Vec<u32> = Config::default()
            .rotation_order
            .iter()
            .map(|r| r.degrees())
            .collect();
        assert_eq!(degrees, vec![0, 270, 90, 180]);
    }

    #[test]
    fn test_rotation_parses_degrees() {
        assert_eq!("270".parse::<Rotation>().unwrap(), Rotation::Deg270);
        assert_eq!(" 90 ".parse::<Rotation>().unwrap(), Rotation::Deg90);
        assert!("45".parse::<Rotation>().is_err());
        assert!("up".parse::<Rotation>().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_rotation() {
        let config = Config {
            rotation_order: vec![Rotation::Deg0, Rotation::Deg90, Rotation::Deg0],
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AutocropError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_header_fraction() {
        let config = Config {
            header_fraction: 0.0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            header_fraction: 1.5,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_output_path_numbering() {
        let config = Config {
            output_dir: PathBuf::from("out"),
            ..Config::default()
        };
        assert_eq!(
            config.output_path(3),
            PathBuf::from("out").join("final_image_3.jpg")
        );
    }
}
