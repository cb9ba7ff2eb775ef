//! Quillbox Storage Library
//!
//! Filesystem placement of uploads and translation of stored paths into public URLs.
//!
//! # Layout
//!
//! Originals land at `{upload_root}/[{username}/]YYYY/MM/DD/{name}[_...]{ext}`. Image
//! uploads get a sibling `{stem}_thumb{ext}`. Nothing else is written; the directory
//! tree is the only index.

pub mod local;
pub mod naming;
pub mod traits;
pub mod urls;

// Re-export commonly used types
pub use local::LocalUploadStore;
pub use naming::{available_name, file_extension, is_thumbnail, thumbnail_path, PathNamer};
pub use traits::{StorageError, StorageResult, UploadStore};
pub use urls::{collapse_path_separators, UrlResolver};
