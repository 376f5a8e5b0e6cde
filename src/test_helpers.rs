//! Shared test utilities for the lot-builder test suite.
//!
//! Small fixture writers (empty files, text markers, synthetic JPEG/PNG
//! images) and listing extractors used across module tests.

use image::{ImageEncoder, RgbImage, RgbaImage};
use std::path::Path;

use crate::scan::ImageFile;

// =========================================================================
// Fixture writers
// =========================================================================

/// Create an empty file, including parent directories.
pub fn touch(path: &Path) {
    write_text(path, "");
}

/// Write `content` to `path`, including parent directories.
///
/// Text markers stand in for pixel data wherever a test only cares about
/// which file ended up where.
pub fn write_text(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// Read a text marker back.
pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}

/// Write a small valid JPEG with the given dimensions.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Write a small RGB PNG with the given dimensions.
pub fn write_png(path: &Path, width: u32, height: u32) {
    RgbImage::from_pixel(width, height, image::Rgb([40, 90, 160]))
        .save(path)
        .unwrap();
}

/// Write a small RGBA PNG (four channels) with the given dimensions.
pub fn write_rgba_png(path: &Path, width: u32, height: u32) {
    RgbaImage::from_fn(width, height, |x, _| {
        image::Rgba([200, 10, 10, if x % 2 == 0 { 255 } else { 0 }])
    })
    .save(path)
    .unwrap();
}

// =========================================================================
// Extractors
// =========================================================================

/// Display names in listing order.
pub fn names(files: &[ImageFile]) -> Vec<String> {
    files.iter().map(|f| f.display_name.clone()).collect()
}

/// Sorted file names in a directory, including non-images.
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut entries: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    entries.sort();
    entries
}
