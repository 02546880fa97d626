//! Region detection
//!
//! Finds the rectangular sub-images laid out on a page: threshold the page,
//! trace the outer borders of the resulting blobs, drop the small ones and
//! report each survivor's axis-aligned bounding rectangle.

use crate::config::{Config, Polarity};
use crate::error::AutocropError;
use crate::imaging;
use image::{GrayImage, RgbImage};
use imageproc::contours::{find_contours, BorderType};
use imageproc::point::Point;
use std::fmt;

/// Rectangle of a detected sub-image within its page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

impl BoundingBox {
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// True when the box is non-empty and lies inside a `width` x `height` page
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self.x as u64 + self.width as u64 <= width as u64
            && self.y as u64 + self.height as u64 <= height as u64
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Locates sub-image boundaries on a page
#[derive(Debug, Clone)]
pub struct RegionDetector {
    white_threshold: u8,
    min_area: f64,
    polarity: Polarity,
}

impl RegionDetector {
    pub fn new(config: &Config) -> Self {
        Self {
            white_threshold: config.white_threshold,
            min_area: config.min_area,
            polarity: config.polarity,
        }
    }

    /// Bounding boxes of every region whose outer contour encloses more than
    /// `min_area` pixels, in raster order of their first border pixel.
    ///
    /// That order decides output numbering: the region whose top edge is
    /// highest comes first, ties broken left to right.
    ///
    /// An empty result is a normal outcome: the page has no sub-images.
    pub fn detect(&self, page: &RgbImage) -> Result<Vec<BoundingBox>, AutocropError> {
        let (width, height) = page.dimensions();
        if width == 0 || height == 0 {
            return Err(AutocropError::DetectionError(format!(
                "page has no pixels ({}x{})",
                width, height
            )));
        }

        let mask = self.object_mask(&imaging::to_gray(page));

        let boxes = find_contours::<i32>(&mask)
            .into_iter()
            .filter(|contour| contour.border_type == BorderType::Outer && contour.parent.is_none())
            .map(|contour| compress_chain(&contour.points))
            .filter(|points| polygon_area(points) > self.min_area)
            .filter_map(|points| bounding_rect(&points))
            .collect::<Vec<_>>();

        debug_assert!(boxes.iter().all(|b| b.fits_within(width, height)));

        Ok(boxes)
    }

    /// Binary mask in which the sub-images are the non-zero pixels traced by
    /// the contour finder.
    fn object_mask(&self, gray: &GrayImage) -> GrayImage {
        let white = imaging::binary(gray, self.white_threshold);
        match self.polarity {
            Polarity::Light => white,
            Polarity::Dark => imaging::invert(&white),
        }
    }
}

/// Drop border points that lie on a straight run between their neighbours,
/// leaving only the corners of the chain.
fn compress_chain(points: &[Point<i32>]) -> Vec<Point<i32>> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let here = points[i];
            let next = points[(i + 1) % n];
            (here.x - prev.x, here.y - prev.y) != (next.x - here.x, next.y - here.y)
        })
        .map(|i| points[i])
        .collect()
}

/// Shoelace area of a closed polygon
fn polygon_area(points: &[Point<i32>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let twice_area: i64 = (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64
        })
        .sum();

    twice_area.abs() as f64 / 2.0
}

/// Smallest axis-aligned rectangle covering every point, inclusive of the
/// edge pixels
fn bounding_rect(points: &[Point<i32>]) -> Option<BoundingBox> {
    let min_x = points.iter().map(|p| p.x).min()?;
    let max_x = points.iter().map(|p| p.x).max()?;
    let min_y = points.iter().map(|p| p.y).min()?;
    let max_y = points.iter().map(|p| p.y).max()?;

    Some(BoundingBox {
        width: (max_x - min_x + 1) as u32,
        height: (max_y - min_y + 1) as u32,
        x: min_x as u32,
        y: min_y as u32,
    })
}
