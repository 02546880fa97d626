//! Page images pulled straight out of a scanned PDF with lopdf
//!
//! Scanners store each page as a single image XObject, so extracting those
//! recovers the page at its scan resolution without an external rasterizer.
//! Images are taken in object order, which scanners write page by page.

use super::PageSource;
use crate::error::AutocropError;
use image::DynamicImage;
use lopdf::{Document, Object, Stream};
use std::path::{Path, PathBuf};

pub struct EmbeddedImages;

impl PageSource for EmbeddedImages {
    fn name(&self) -> &'static str {
        "embedded"
    }

    fn check_available(&self) -> Result<(), AutocropError> {
        Ok(())
    }

    fn render(&self, pdf: &Path, dir: &Path) -> Result<Vec<PathBuf>, AutocropError> {
        let doc = Document::load(pdf)
            .map_err(|e| AutocropError::RasterizeError(format!("Failed to load PDF: {}", e)))?;

        let mut pages = Vec::new();
        for image in extract_images(&doc) {
            let path = dir.join(format!("page-{}.png", pages.len() + 1));
            image.save(&path)?;
            pages.push(path);
        }

        Ok(pages)
    }
}

/// Decode every image XObject in the document, skipping the ones that fail
fn extract_images(doc: &Document) -> Vec<DynamicImage> {
    let mut images = Vec::new();

    for (object_id, object) in doc.objects.iter() {
        let Ok(stream) = object.as_stream() else {
            continue;
        };
        let is_image = stream
            .dict
            .get(b"Subtype")
            .and_then(Object::as_name)
            .map(|name| name == b"Image")
            .unwrap_or(false);
        if !is_image {
            continue;
        }

        match decode_image(doc, stream) {
            Ok(img) => images.push(img),
            Err(e) => {
                tracing::warn!("Failed to extract image from object {:?}: {}", object_id, e);
            }
        }
    }

    images
}

fn decode_image(doc: &Document, stream: &Stream) -> Result<DynamicImage, AutocropError> {
    let filters = filters(stream);
    if filters.iter().any(|f| f == "DCTDecode") {
        // JPEG data can be handed to the image crate untouched
        return Ok(image::load_from_memory(&stream.content)?);
    }

    let width = dict_int(stream, b"Width")
        .ok_or_else(|| AutocropError::RasterizeError("Missing image width".to_string()))?;
    let height = dict_int(stream, b"Height")
        .ok_or_else(|| AutocropError::RasterizeError("Missing image height".to_string()))?;
    let bits_per_component = dict_int(stream, b"BitsPerComponent").unwrap_or(8);
    if bits_per_component != 8 {
        return Err(AutocropError::RasterizeError(format!(
            "Unsupported bit depth: {} bits",
            bits_per_component
        )));
    }

    let data = if filters.is_empty() {
        stream.content.clone()
    } else {
        stream.decompressed_content().map_err(|e| {
            AutocropError::RasterizeError(format!("Failed to decompress image: {}", e))
        })?
    };

    let invalid = || AutocropError::RasterizeError("Invalid image data".to_string());
    let pixels = (width as usize)
        .checked_mul(height as usize)
        .filter(|p| p.checked_mul(4).is_some())
        .ok_or_else(|| {
            AutocropError::RasterizeError(format!("Image too large: {}x{}", width, height))
        })?;

    match color_space(doc, stream).as_str() {
        "DeviceGray" if data.len() >= pixels => {
            let img = image::GrayImage::from_raw(width, height, data[..pixels].to_vec())
                .ok_or_else(invalid)?;
            Ok(DynamicImage::ImageLuma8(img))
        }
        "DeviceRGB" | "ICCBased" if data.len() >= pixels * 3 => {
            let img = image::RgbImage::from_raw(width, height, data[..pixels * 3].to_vec())
                .ok_or_else(invalid)?;
            Ok(DynamicImage::ImageRgb8(img))
        }
        "DeviceCMYK" if data.len() >= pixels * 4 => {
            let rgb = data[..pixels * 4]
                .chunks_exact(4)
                .flat_map(|cmyk| cmyk_to_rgb([cmyk[0], cmyk[1], cmyk[2], cmyk[3]]))
                .collect();
            let img = image::RgbImage::from_raw(width, height, rgb).ok_or_else(invalid)?;
            Ok(DynamicImage::ImageRgb8(img))
        }
        other => Err(AutocropError::RasterizeError(format!(
            "Unsupported color space or truncated data: {} ({} bytes for {}x{})",
            other,
            data.len(),
            width,
            height
        ))),
    }
}

fn cmyk_to_rgb(cmyk: [u8; 4]) -> [u8; 3] {
    let [c, m, y, k] = cmyk.map(|v| v as f32 / 255.0);
    [
        ((1.0 - c) * (1.0 - k) * 255.0) as u8,
        ((1.0 - m) * (1.0 - k) * 255.0) as u8,
        ((1.0 - y) * (1.0 - k) * 255.0) as u8,
    ]
}

fn dict_int(stream: &Stream, key: &[u8]) -> Option<u32> {
    stream
        .dict
        .get(key)
        .ok()
        .and_then(|v| v.as_i64().ok())
        .and_then(|v| u32::try_from(v).ok())
}

/// Filter names applied to the stream, whether given as a name or an array
fn filters(stream: &Stream) -> Vec<String> {
    match stream.dict.get(b"Filter") {
        Ok(Object::Name(name)) => vec![String::from_utf8_lossy(name).to_string()],
        Ok(Object::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_name().ok())
            .map(|name| String::from_utf8_lossy(name).to_string())
            .collect(),
        _ => Vec::new(),
    }
}

/// Get the color space name from a PDF stream
fn color_space(doc: &Document, stream: &Stream) -> String {
    let cs_obj = match stream.dict.get(b"ColorSpace") {
        Ok(obj) => obj,
        Err(_) => return "DeviceRGB".to_string(),
    };

    let resolved = match cs_obj.as_reference() {
        Ok(reference) => match doc.get_object(reference) {
            Ok(obj) => obj,
            Err(_) => return "DeviceRGB".to_string(),
        },
        Err(_) => cs_obj,
    };

    if let Ok(name) = resolved.as_name() {
        return String::from_utf8_lossy(name).to_string();
    }

    // Array color spaces such as [/ICCBased 12 0 R] are named by their first element
    resolved
        .as_array()
        .ok()
        .and_then(|array| array.first())
        .and_then(|first| first.as_name().ok())
        .map(|name| String::from_utf8_lossy(name).to_string())
        .unwrap_or_else(|| "DeviceRGB".to_string())
}
