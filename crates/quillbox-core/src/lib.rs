//! Quillbox Core Library
//!
//! This crate provides the domain models, error types and configuration shared by
//! the upload and browse components. Nothing in here touches the filesystem
//! except configuration loading.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{BaseConfig, Config, QuillboxConfig, UploadSettings};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{GalleryEntry, IconRule, StoredFile, UploadRequest, UserIdentity};
