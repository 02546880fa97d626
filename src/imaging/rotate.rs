use crate::config::Rotation;
use image::{imageops, GenericImageView, ImageBuffer, Pixel};

/// Rotate counter-clockwise by a multiple of 90 degrees
///
/// The canvas grows to fit (width and height swap for 90 and 270), so no
/// pixel is lost and no fill color is needed.
pub fn rotate<I>(
    image: &I,
    rotation: Rotation,
) -> ImageBuffer<I::Pixel, Vec<<I::Pixel as Pixel>::Subpixel>>
where
    I: GenericImageView,
    I::Pixel: 'static,
{
    match rotation {
        Rotation::Deg0 => {
            let (width, height) = image.dimensions();
            ImageBuffer::from_fn(width, height, |x, y| image.get_pixel(x, y))
        }
        Rotation::Deg90 => imageops::rotate270(image),
        Rotation::Deg180 => imageops::rotate180(image),
        Rotation::Deg270 => imageops::rotate90(image),
    }
}
