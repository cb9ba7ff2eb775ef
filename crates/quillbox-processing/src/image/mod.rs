//! Image processing module
//!
//! Thumbnail derivation for stored uploads.

pub mod thumbnail;

pub use thumbnail::{ThumbnailError, ThumbnailGenerator};
