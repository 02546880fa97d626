use image::{imageops, GrayImage, Luma};

/// Fixed binary threshold: pixels at or above `threshold` become 255, the rest 0
pub fn binary(image: &GrayImage, threshold: u8) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        if image.get_pixel(x, y).0[0] >= threshold {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

/// Inverted binary threshold: pixels at or above `threshold` become 0, the rest 255
///
/// Light text on a dark band comes out as dark text on white, which is what
/// the recognizers expect.
pub fn binary_inverted(image: &GrayImage, threshold: u8) -> GrayImage {
    invert(&binary(image, threshold))
}

/// Flip polarity of every pixel
pub fn invert(image: &GrayImage) -> GrayImage {
    let mut inverted = image.clone();
    imageops::invert(&mut inverted);
    inverted
}
