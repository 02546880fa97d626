use crate::imaging;
use image::{imageops, GrayImage, RgbImage};

/// Trims white padding around the content of an oriented region.
///
/// The region is reduced to grayscale and inverted so the white background
/// becomes zero, then cut down to the smallest box holding every non-zero
/// pixel. A blank image has no such box and is kept whole. The result is
/// inverted back and expanded to three channels.
pub fn crop(image: &RgbImage) -> RgbImage {
    let inverted = imaging::invert(&imaging::to_gray(image));

    let trimmed = match content_bounds(&inverted) {
        Some((x, y, width, height)) => {
            imageops::crop_imm(&inverted, x, y, width, height).to_image()
        }
        None => inverted,
    };

    imaging::to_rgb(&imaging::invert(&trimmed))
}

/// `(x, y, width, height)` of the smallest rectangle containing every
/// non-zero pixel, or `None` if all pixels are zero
pub fn content_bounds(image: &GrayImage) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;

    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel.0[0] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((min_x, min_y, max_x, max_y)) => {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            }
        });
    }

    bounds.map(|(min_x, min_y, max_x, max_y)| (min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}
