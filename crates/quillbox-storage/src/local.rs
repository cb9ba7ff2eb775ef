use std::io;
use std::path::Path;

use async_trait::async_trait;
use quillbox_core::constants::{INFLIGHT_PREFIX, INFLIGHT_SUFFIX};
use quillbox_core::StoredFile;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};

use crate::naming::{available_name, file_extension};
use crate::traits::{StorageError, StorageResult, UploadStore};

/// Local filesystem upload store
///
/// Content is streamed into a hidden temporary file next to the destination and then
/// published with a no-clobber rename, so a partially written upload never shows up
/// under its final name and a concurrent upload with the same name is never
/// overwritten.
#[derive(Clone, Debug, Default)]
pub struct LocalUploadStore;

impl LocalUploadStore {
    pub fn new() -> Self {
        LocalUploadStore
    }
}

#[async_trait]
impl UploadStore for LocalUploadStore {
    async fn store_new(
        &self,
        destination: &Path,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<StoredFile> {
        let start = std::time::Instant::now();
        let directory = destination.parent().ok_or_else(|| {
            StorageError::InvalidName(format!("{} has no parent directory", destination.display()))
        })?;

        let temp = tempfile::Builder::new()
            .prefix(INFLIGHT_PREFIX)
            .suffix(INFLIGHT_SUFFIX)
            .tempfile_in(directory)
            .map_err(|source| StorageError::WriteFailed {
                path: directory.to_path_buf(),
                source,
            })?;

        let write_failed = |source: io::Error| StorageError::WriteFailed {
            path: temp.path().to_path_buf(),
            source,
        };

        let mut file = fs::File::from_std(temp.reopen().map_err(write_failed)?);
        let size_bytes = tokio::io::copy(reader, &mut file)
            .await
            .map_err(write_failed)?;
        file.flush().await.map_err(write_failed)?;
        file.sync_all().await.map_err(write_failed)?;
        drop(file);

        // Temporaries are created owner-only; published uploads are served by the web server.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(temp.path(), std::fs::Permissions::from_mode(0o644))
                .await
                .map_err(write_failed)?;
        }

        let mut temp = temp;
        let mut target = destination.to_path_buf();
        loop {
            match temp.persist_noclobber(&target) {
                Ok(_) => break,
                Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
                    let next = available_name(&target).await;
                    tracing::debug!(
                        taken = %target.display(),
                        next = %next.display(),
                        "Upload name taken during write, retrying with next free name"
                    );
                    temp = err.file;
                    target = next;
                }
                Err(err) => {
                    return Err(StorageError::WriteFailed {
                        path: target,
                        source: err.error,
                    })
                }
            }
        }

        tracing::info!(
            path = %target.display(),
            size_bytes = size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(StoredFile {
            extension: file_extension(&target),
            absolute_path: target,
            size_bytes,
        })
    }
}
