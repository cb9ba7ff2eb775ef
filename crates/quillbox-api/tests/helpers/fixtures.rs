//! Test fixtures: in-memory images and multipart forms.

use axum_test::multipart::{MultipartForm, Part};
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// Solid-color PNG of the given dimensions.
pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbImage::from_pixel(width, height, Rgb([120, 40, 200]))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("Failed to encode PNG");
    bytes
}

/// Multipart form carrying `bytes` in the editor's `upload` field.
pub fn upload_form(file_name: &str, bytes: Vec<u8>, mime: &str) -> MultipartForm {
    let part = Part::bytes(bytes).file_name(file_name).mime_type(mime);
    MultipartForm::new().add_part("upload", part)
}
