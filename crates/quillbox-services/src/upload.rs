//! Upload orchestration
//!
//! normalize name → place → stream to disk → thumbnail (best effort) → public URL

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::{Local, NaiveDate};
use quillbox_core::{AppError, StoredFile, UploadRequest, UploadSettings};
use quillbox_processing::ThumbnailGenerator;
use quillbox_storage::naming::normalize_file_name;
use quillbox_storage::{LocalUploadStore, PathNamer, UploadStore, UrlResolver};
use tokio::io::AsyncRead;

/// Result of a successful upload.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub url: String,
    pub stored: StoredFile,
    /// Present when the upload decoded as an image.
    pub thumbnail: Option<PathBuf>,
}

/// Stores incoming uploads and derives their thumbnails.
pub struct UploadService {
    namer: PathNamer,
    store: Arc<dyn UploadStore>,
    thumbnails: ThumbnailGenerator,
    urls: UrlResolver,
}

impl UploadService {
    pub fn new(
        namer: PathNamer,
        store: Arc<dyn UploadStore>,
        thumbnails: ThumbnailGenerator,
        urls: UrlResolver,
    ) -> Self {
        Self {
            namer,
            store,
            thumbnails,
            urls,
        }
    }

    /// Local filesystem service configured from `settings`.
    pub fn from_settings(settings: &UploadSettings) -> Self {
        let (width, height) = settings.thumbnail_size;
        Self::new(
            PathNamer::from_settings(settings),
            Arc::new(LocalUploadStore::new()),
            ThumbnailGenerator::new(width, height),
            UrlResolver::from_settings(settings),
        )
    }

    /// Store `request` under today's local date.
    pub async fn handle_upload<R>(&self, request: UploadRequest<R>) -> Result<UploadOutcome, AppError>
    where
        R: AsyncRead + Send + Unpin,
    {
        self.handle_upload_on(request, Local::now().date_naive()).await
    }

    /// Store `request` under the date directory for `today`.
    ///
    /// Storage failures are fatal. A thumbnail failure is only fatal when it is an I/O
    /// failure; content that is not an image is stored as a plain file.
    #[tracing::instrument(
        skip(self, request),
        fields(
            file_name = %request.declared_file_name,
            username = %request.requesting_user.username,
        )
    )]
    pub async fn handle_upload_on<R>(
        &self,
        request: UploadRequest<R>,
        today: NaiveDate,
    ) -> Result<UploadOutcome, AppError>
    where
        R: AsyncRead + Send + Unpin,
    {
        let start = Instant::now();
        let UploadRequest {
            declared_file_name,
            mut content,
            requesting_user,
        } = request;

        let file_name = normalize_file_name(&declared_file_name)?;
        let destination = self
            .namer
            .upload_destination(&requesting_user, &file_name, today)
            .await?;

        let stored = self.store.store_new(&destination, &mut content).await?;
        let thumbnail = self.make_thumbnail(&stored).await?;
        let url = self.urls.to_public_url(&stored.absolute_path);

        tracing::info!(
            path = %stored.absolute_path.display(),
            size_bytes = stored.size_bytes,
            is_image = thumbnail.is_some(),
            url = %url,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload stored"
        );

        Ok(UploadOutcome {
            url,
            stored,
            thumbnail,
        })
    }

    async fn make_thumbnail(&self, stored: &StoredFile) -> Result<Option<PathBuf>, AppError> {
        let generator = self.thumbnails;
        let path = stored.absolute_path.clone();

        match tokio::task::spawn_blocking(move || generator.generate(&path)).await {
            Ok(Ok(thumbnail)) => Ok(Some(thumbnail)),
            Ok(Err(err)) if err.is_not_an_image() => {
                tracing::debug!(
                    path = %stored.absolute_path.display(),
                    reason = %err,
                    "Upload is not an image, skipping thumbnail"
                );
                Ok(None)
            }
            Ok(Err(err)) => Err(err.into()),
            Err(join_err) => Err(AppError::InternalWithSource {
                message: "Thumbnail task failed".to_string(),
                source: anyhow::Error::new(join_err),
            }),
        }
    }
}
