//! Grayscale image loading and reconstruction export
//!
//! The codec works on square float matrices in [0, 1]; this module is the
//! collaborator that produces them from raster files and renders them back.

use crate::io::error::{CodecError, Result};
use image::imageops::FilterType;
use ndarray::Array2;
use std::path::Path;

/// Load a raster image as a grayscale float matrix with samples in [0, 1]
///
/// When `resize_to` is given the image is bilinearly resized to that square
/// working size first, matching the codec's divisibility expectations for
/// power-of-two sizes.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded
pub fn load_grayscale<P: AsRef<Path>>(path: P, resize_to: Option<usize>) -> Result<Array2<f64>> {
    let path_buf = path.as_ref().to_path_buf();
    let mut img = image::open(&path_buf).map_err(|e| CodecError::ImageLoad {
        path: path_buf,
        source: e,
    })?;

    if let Some(size) = resize_to {
        img = img.resize_exact(size as u32, size as u32, FilterType::Triangle);
    }

    let luma = img.to_luma8();
    let (width, height) = (luma.width() as usize, luma.height() as usize);

    let mut data = Array2::zeros((height, width));
    for (x, y, pixel) in luma.enumerate_pixels() {
        let value = pixel.0.first().copied().unwrap_or(0);
        if let Some(sample) = data.get_mut((y as usize, x as usize)) {
            *sample = f64::from(value) / 255.0;
        }
    }

    Ok(data)
}

/// Export a float matrix as an 8-bit grayscale PNG
///
/// Samples are clamped to [0, 1] and scaled to 0..=255. Parent directories
/// are created as needed.
///
/// # Errors
///
/// Returns an error if directory creation or the image save fails
pub fn export_grayscale(image: &Array2<f64>, output_path: &str) -> Result<()> {
    let (height, width) = image.dim();
    let mut buffer = image::GrayImage::new(width as u32, height as u32);

    for (position, &value) in image.indexed_iter() {
        let level = (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        buffer.put_pixel(position.1 as u32, position.0 as u32, image::Luma([level]));
    }

    if let Some(parent) = Path::new(output_path).parent() {
        std::fs::create_dir_all(parent).map_err(|e| CodecError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    buffer
        .save(output_path)
        .map_err(|e| CodecError::ImageExport {
            path: output_path.into(),
            source: e,
        })?;

    Ok(())
}
