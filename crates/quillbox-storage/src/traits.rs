//! Storage abstraction trait
//!
//! Defines the persistence seam used by the upload service and its error type.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quillbox_core::{AppError, StoredFile};
use thiserror::Error;
use tokio::io::AsyncRead;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidName(msg) => AppError::InvalidInput(msg),
            StorageError::CreateDirFailed { path, source } => AppError::StorageWithSource {
                message: format!("Failed to create directory {}", path.display()),
                source,
            },
            StorageError::WriteFailed { path, source } => AppError::StorageWithSource {
                message: format!("Failed to write {}", path.display()),
                source,
            },
        }
    }
}

/// Persistence backend for new uploads.
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Stream `reader` to completion into a new file at `destination`.
    ///
    /// The file only becomes visible under its final name once all content is written.
    /// If `destination` is taken by the time the content is complete, the next free
    /// name (see [`crate::naming::available_name`]) is used instead. Existing files are
    /// never overwritten. The parent directory must already exist.
    async fn store_new(
        &self,
        destination: &Path,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<StoredFile>;
}
