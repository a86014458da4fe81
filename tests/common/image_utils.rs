//! Image utilities for testing.
//!
//! Helpers for checking the PNG files the plot operations write.

use image::{DynamicImage, GenericImageView, ImageError, ImageFormat};
use std::path::Path;

/// Load an image from a file
pub fn load_image(path: &Path) -> Result<DynamicImage, ImageError> {
    image::open(path)
}

/// Detect image format from the first bytes of a file
pub fn detect_file_format(path: &Path) -> Option<ImageFormat> {
    let bytes = std::fs::read(path).ok()?;
    image::guess_format(&bytes).ok()
}

/// Check that the file at `path` is a PNG of the expected size
pub fn assert_png(path: &Path, expected_width: u32, expected_height: u32) -> Result<(), String> {
    match detect_file_format(path) {
        Some(ImageFormat::Png) => {}
        other => return Err(format!("{} is not a PNG: {:?}", path.display(), other)),
    }

    let image = load_image(path).map_err(|e| e.to_string())?;
    let (width, height) = image.dimensions();
    if (width, height) != (expected_width, expected_height) {
        return Err(format!(
            "Image dimensions differ: actual = {}x{}, expected = {}x{}",
            width, height, expected_width, expected_height
        ));
    }
    Ok(())
}

/// Number of distinct RGBA colors in an image
pub fn distinct_colors(image: &DynamicImage) -> usize {
    let mut colors: Vec<[u8; 4]> = image.pixels().map(|(_, _, p)| p.0).collect();
    colors.sort_unstable();
    colors.dedup();
    colors.len()
}

/// Count the pixels of exactly `color`
pub fn count_color(image: &DynamicImage, color: [u8; 4]) -> usize {
    image.pixels().filter(|(_, _, p)| p.0 == color).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    #[test]
    fn test_assert_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        let img = ImageBuffer::<Rgba<u8>, Vec<u8>>::from_pixel(4, 3, Rgba([1, 2, 3, 255]));
        img.save(&path).unwrap();

        assert!(assert_png(&path, 4, 3).is_ok());
        assert!(assert_png(&path, 3, 4).is_err());
        let image = load_image(&path).unwrap();
        assert_eq!(distinct_colors(&image), 1);
        assert_eq!(count_color(&image, [1, 2, 3, 255]), 12);
    }
}
