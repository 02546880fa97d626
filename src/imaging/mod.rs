//! Pixel-level operations shared by the detector, resolver and cropper
//!
//! Every operation takes its input by reference and returns a new buffer.

pub mod grayscale;
pub mod rotate;
pub mod threshold;

pub use grayscale::{mean_intensity, to_gray, to_rgb};
pub use rotate::rotate;
pub use threshold::{binary, binary_inverted, invert};
