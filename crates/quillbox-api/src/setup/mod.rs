//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod routes;
pub mod server;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use quillbox_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.environment());

    // Validate configuration - fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    tracing::info!(
        upload_root = %config.upload().upload_root().display(),
        restrict_by_user = config.restrict_by_user(),
        "Configuration loaded and validated successfully"
    );

    let state = Arc::new(AppState::from_config(&config)?);
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
