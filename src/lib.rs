//! Extract photographs laid out on scanned pages.
//!
//! Each page image is segmented into sub-images ([`detect`]), each sub-image
//! is turned upright by reading its caption ([`orientation`]) and trimmed of
//! its white border ([`border`]) before being saved. [`pipeline::run`] ties
//! the steps together for a whole input file.

pub mod border;
pub mod cli;
pub mod config;
pub mod detect;
pub mod engine;
pub mod engines;
pub mod error;
pub mod imaging;
pub mod orientation;
pub mod pipeline;
pub mod raster;

pub use config::{Config, Rotation};
pub use detect::{BoundingBox, RegionDetector};
pub use engine::TextRecognizer;
pub use error::AutocropError;
pub use orientation::{Candidate, Orientation, OrientationResolver};
pub use pipeline::{OutputCounter, Pipeline, RunSummary};
