//! Quillbox Processing Library
//!
//! CPU-side work on stored uploads: picking an icon for non-image files and
//! deriving thumbnails for images. Everything here is synchronous; async callers
//! are expected to run thumbnailing on the blocking pool.

pub mod icons;
pub mod image;

pub use icons::{IconClassifier, IconRuleError};
pub use crate::image::{ThumbnailError, ThumbnailGenerator};
