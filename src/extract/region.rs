//! Header region cropping.
//!
//! Submittal product pages put the manufacturer and product names in the top
//! band of the page, so extraction reads a crop instead of the full render.

use std::io::Cursor;

use image::ImageFormat;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegionError {
    #[error("Failed to decode page image: {0}")]
    Decode(String),

    #[error("Failed to encode cropped image: {0}")]
    Encode(String),
}

/// Crop the top `percent` of a PNG image, returning PNG bytes.
///
/// `percent` is clamped to 1..=100.
pub fn crop_top(png_bytes: &[u8], percent: u32) -> Result<Vec<u8>, RegionError> {
    let percent = percent.clamp(1, 100);

    let img = image::load_from_memory(png_bytes).map_err(|e| RegionError::Decode(e.to_string()))?;

    let width = img.width();
    let height = img.height();
    let crop_height = ((height as u64 * percent as u64) / 100).max(1) as u32;

    let cropped = img.crop_imm(0, 0, width, crop_height);

    let mut out = Cursor::new(Vec::new());
    cropped
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| RegionError::Encode(e.to_string()))?;

    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    fn test_png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::new(width, height));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_crop_top_thirty_percent() {
        let png = test_png(200, 100);
        let cropped = crop_top(&png, 30).unwrap();

        let img = image::load_from_memory(&cropped).unwrap();
        assert_eq!(img.width(), 200);
        assert_eq!(img.height(), 30);
    }

    #[test]
    fn test_crop_percent_is_clamped() {
        let png = test_png(50, 50);

        let full = crop_top(&png, 150).unwrap();
        let img = image::load_from_memory(&full).unwrap();
        assert_eq!(img.height(), 50);

        let sliver = crop_top(&png, 0).unwrap();
        let img = image::load_from_memory(&sliver).unwrap();
        assert_eq!(img.height(), 1);
    }

    #[test]
    fn test_crop_rejects_garbage() {
        assert!(matches!(
            crop_top(b"not a png", 30),
            Err(RegionError::Decode(_))
        ));
    }
}
