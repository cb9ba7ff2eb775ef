//! Quillbox Services Layer
//!
//! This crate hosts the two operations the HTTP layer exposes, storing an upload
//! and listing what has been uploaded, and re-exports the storage and processing
//! pieces they are assembled from so that the API crate depends on a single
//! service facade. Keep orchestration here; keep thin HTTP handling in quillbox-api.

pub mod browse;
pub mod upload;

pub use browse::{display_name, BrowseIndexer};
pub use upload::{UploadOutcome, UploadService};

pub use quillbox_processing::{IconClassifier, IconRuleError, ThumbnailError, ThumbnailGenerator};
pub use quillbox_storage::{
    available_name, thumbnail_path, LocalUploadStore, PathNamer, StorageError, StorageResult,
    UploadStore, UrlResolver,
};
