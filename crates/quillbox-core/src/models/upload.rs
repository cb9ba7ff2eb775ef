use std::path::PathBuf;

use super::UserIdentity;

/// One incoming upload. `R` is the byte stream of the file content.
pub struct UploadRequest<R> {
    pub declared_file_name: String,
    pub content: R,
    pub requesting_user: UserIdentity,
}

impl<R> UploadRequest<R> {
    pub fn new(declared_file_name: impl Into<String>, content: R, user: UserIdentity) -> Self {
        Self {
            declared_file_name: declared_file_name.into(),
            content,
            requesting_user: user,
        }
    }
}

/// A file materialized on disk by the upload path.
///
/// The path did not exist before the upload created it and is never renamed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub absolute_path: PathBuf,
    /// Extension including the leading dot, or empty when the name has none.
    pub extension: String,
    pub size_bytes: u64,
}
