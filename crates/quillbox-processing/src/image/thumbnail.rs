//! Thumbnail generation
//!
//! A stored upload is sniffed and decoded; anything that decodes gets a fixed-size,
//! center-cropped preview written beside it under the thumbnail name. Failing to
//! decode is the normal outcome for non-image uploads.

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use image::imageops::FilterType;
use image::{DynamicImage, ImageError, ImageFormat, ImageReader};
use quillbox_core::constants::{DEFAULT_THUMBNAIL_SIZE, INFLIGHT_PREFIX, INFLIGHT_SUFFIX};
use quillbox_core::AppError;
use quillbox_storage::thumbnail_path;

#[derive(Debug, thiserror::Error)]
pub enum ThumbnailError {
    /// Content is not a decodable image.
    #[error("Not a decodable image: {0}")]
    Decode(#[source] ImageError),

    /// Decoded fine but cannot be encoded under the thumbnail's extension.
    #[error("Cannot encode thumbnail {path}: {reason}")]
    Unconvertible { path: PathBuf, reason: String },

    #[error("Thumbnail I/O failed for {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ThumbnailError {
    /// Decode and encode failures both mean "treat this upload as a plain file".
    pub fn is_not_an_image(&self) -> bool {
        matches!(
            self,
            ThumbnailError::Decode(_) | ThumbnailError::Unconvertible { .. }
        )
    }
}

impl From<ThumbnailError> for AppError {
    fn from(err: ThumbnailError) -> Self {
        match err {
            ThumbnailError::Io { path, source } => AppError::StorageWithSource {
                message: format!("Failed to write thumbnail for {}", path.display()),
                source,
            },
            other => AppError::Internal(other.to_string()),
        }
    }
}

/// Writes `stem_thumb.ext` previews of a fixed size.
#[derive(Debug, Clone, Copy)]
pub struct ThumbnailGenerator {
    width: u32,
    height: u32,
}

impl Default for ThumbnailGenerator {
    fn default() -> Self {
        let (width, height) = DEFAULT_THUMBNAIL_SIZE;
        Self::new(width, height)
    }
}

impl ThumbnailGenerator {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Decode `stored`, crop it to the thumbnail box and write it beside the original.
    ///
    /// Returns the thumbnail path. Blocking; call from `spawn_blocking` in async code.
    pub fn generate(&self, stored: &Path) -> Result<PathBuf, ThumbnailError> {
        let start = Instant::now();
        let io_error = |source: io::Error| ThumbnailError::Io {
            path: stored.to_path_buf(),
            source,
        };

        let img = ImageReader::open(stored)
            .map_err(io_error)?
            .with_guessed_format()
            .map_err(io_error)?
            .decode()
            .map_err(ThumbnailError::Decode)?;

        let (source_width, source_height) = (img.width(), img.height());
        let thumbnail = normalize_color(img).resize_to_fill(
            self.width,
            self.height,
            FilterType::Lanczos3,
        );

        let target = thumbnail_path(stored);
        let format = ImageFormat::from_path(&target).map_err(|e| ThumbnailError::Unconvertible {
            path: target.clone(),
            reason: e.to_string(),
        })?;

        write_thumbnail(&thumbnail, &target, format)?;

        tracing::debug!(
            source = %stored.display(),
            thumbnail = %target.display(),
            source_width = source_width,
            source_height = source_height,
            format = ?format,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Thumbnail generated"
        );

        Ok(target)
    }
}

/// Encode into a temporary sibling and publish it under `target` only once encoding
/// succeeded. A failed encode leaves nothing behind.
fn write_thumbnail(
    thumbnail: &DynamicImage,
    target: &Path,
    format: ImageFormat,
) -> Result<(), ThumbnailError> {
    let io_error = |source: io::Error| ThumbnailError::Io {
        path: target.to_path_buf(),
        source,
    };

    let directory = target.parent().unwrap_or_else(|| Path::new("."));
    let temp = tempfile::Builder::new()
        .prefix(INFLIGHT_PREFIX)
        .suffix(INFLIGHT_SUFFIX)
        .tempfile_in(directory)
        .map_err(io_error)?;

    {
        let mut writer = BufWriter::new(temp.as_file());
        thumbnail.write_to(&mut writer, format).map_err(|e| match e {
            ImageError::IoError(source) => io_error(source),
            other => ThumbnailError::Unconvertible {
                path: target.to_path_buf(),
                reason: other.to_string(),
            },
        })?;
        writer.flush().map_err(io_error)?;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(temp.path(), std::fs::Permissions::from_mode(0o644))
            .map_err(io_error)?;
    }

    temp.persist(target).map_err(|e| io_error(e.error))?;
    Ok(())
}

/// 8-bit grayscale and RGB pass through; 16-bit grayscale drops to 8-bit; anything
/// else (alpha, wide or float channels) becomes 8-bit RGB.
fn normalize_color(img: DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => img,
        DynamicImage::ImageLuma16(_) => DynamicImage::ImageLuma8(img.to_luma8()),
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ColorType, GrayImage, ImageBuffer, Luma, Rgb, RgbImage, Rgba, RgbaImage};
    use tempfile::tempdir;

    #[test]
    fn test_generate_png_thumbnail() {
        let dir = tempdir().unwrap();
        let original = dir.path().join("wide.png");
        RgbImage::from_pixel(300, 120, Rgb([200, 10, 10]))
            .save(&original)
            .unwrap();

        let thumb = ThumbnailGenerator::default().generate(&original).unwrap();

        assert_eq!(thumb, dir.path().join("wide_thumb.png"));
        let decoded = image::open(&thumb).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (75, 75));
    }

    #[test]
    fn test_generate_custom_size_jpeg() {
        let dir = tempdir().unwrap();
        let original = dir.path().join("photo.jpg");
        RgbImage::from_pixel(64, 256, Rgb([10, 200, 10]))
            .save(&original)
            .unwrap();

        let thumb = ThumbnailGenerator::new(40, 20).generate(&original).unwrap();

        let decoded = image::open(&thumb).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 20));
    }

    #[test]
    fn test_alpha_is_flattened_to_rgb() {
        let dir = tempdir().unwrap();
        let original = dir.path().join("alpha.png");
        RgbaImage::from_pixel(100, 100, Rgba([0, 0, 255, 128]))
            .save(&original)
            .unwrap();

        let thumb = ThumbnailGenerator::default().generate(&original).unwrap();
        assert_eq!(image::open(&thumb).unwrap().color(), ColorType::Rgb8);
    }

    #[test]
    fn test_grayscale_is_kept() {
        let dir = tempdir().unwrap();
        let gray = dir.path().join("gray.png");
        GrayImage::from_pixel(90, 90, Luma([77])).save(&gray).unwrap();
        let thumb = ThumbnailGenerator::default().generate(&gray).unwrap();
        assert_eq!(image::open(&thumb).unwrap().color(), ColorType::L8);

        let deep = dir.path().join("deep.png");
        ImageBuffer::<Luma<u16>, Vec<u16>>::from_pixel(90, 90, Luma([40_000]))
            .save(&deep)
            .unwrap();
        let thumb = ThumbnailGenerator::default().generate(&deep).unwrap();
        assert_eq!(image::open(&thumb).unwrap().color(), ColorType::L8);
    }

    #[test]
    fn test_text_file_is_not_an_image() {
        let dir = tempdir().unwrap();
        let original = dir.path().join("notes.txt");
        std::fs::write(&original, "just some words").unwrap();

        let err = ThumbnailGenerator::default().generate(&original).unwrap_err();

        assert!(matches!(err, ThumbnailError::Decode(_)));
        assert!(err.is_not_an_image());
        assert!(!dir.path().join("notes_thumb.txt").exists());
    }

    #[test]
    fn test_unknown_extension_is_unconvertible() {
        let dir = tempdir().unwrap();
        let original = dir.path().join("image.data");
        let mut bytes = Vec::new();
        RgbImage::from_pixel(20, 20, Rgb([1, 2, 3]))
            .write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        std::fs::write(&original, bytes).unwrap();

        let err = ThumbnailGenerator::default().generate(&original).unwrap_err();

        assert!(matches!(err, ThumbnailError::Unconvertible { .. }));
        assert!(err.is_not_an_image());
    }

    #[test]
    fn test_failed_encode_leaves_no_thumbnail() {
        let dir = tempdir().unwrap();
        let original = dir.path().join("pic.dds");
        let mut bytes = Vec::new();
        RgbImage::from_pixel(20, 20, Rgb([9, 9, 9]))
            .write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        std::fs::write(&original, bytes).unwrap();

        let err = ThumbnailGenerator::default().generate(&original).unwrap_err();

        assert!(matches!(err, ThumbnailError::Unconvertible { .. }));
        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["pic.dds".to_string()]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = ThumbnailGenerator::default()
            .generate(&dir.path().join("gone.png"))
            .unwrap_err();

        assert!(matches!(err, ThumbnailError::Io { .. }));
        assert!(!err.is_not_an_image());
        let app: AppError = err.into();
        assert_eq!(app.error_type(), "Storage");
    }
}
