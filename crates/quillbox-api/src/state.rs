//! Application state shared by all handlers.

use std::sync::Arc;

use anyhow::Context;
use quillbox_core::Config;
use quillbox_services::{BrowseIndexer, UploadService};

pub struct AppState {
    pub upload_service: Arc<UploadService>,
    /// Shared with blocking listing tasks.
    pub browse_indexer: Arc<BrowseIndexer>,
}

impl AppState {
    /// Build the upload and browse services from validated configuration.
    pub fn from_config(config: &Config) -> Result<Self, anyhow::Error> {
        let settings = config.upload();
        let upload_service = UploadService::from_settings(settings);
        let browse_indexer =
            BrowseIndexer::from_settings(settings).context("Invalid file icon rules")?;

        Ok(Self {
            upload_service: Arc::new(upload_service),
            browse_indexer: Arc::new(browse_indexer),
        })
    }
}
