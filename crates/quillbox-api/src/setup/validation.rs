//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::{Context, Result};
use quillbox_core::Config;
use quillbox_services::IconClassifier;

use crate::auth::IdentityHeaders;

/// Validate critical configuration values
///
/// Runs the configuration's own checks, then everything that can only be checked
/// by building the pieces that consume it: icon rule patterns and identity header names.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    let icons = IconClassifier::new(&config.upload().icon_rules)
        .context("QUILLBOX_FILE_ICONS is invalid")?;
    tracing::debug!(icon_rules = icons.len(), "File icon rules compiled");

    IdentityHeaders::from_config(config)?;

    if config.user_header() == config.superuser_header() {
        return Err(anyhow::anyhow!(
            "QUILLBOX_USER_HEADER and QUILLBOX_SUPERUSER_HEADER must differ"
        ));
    }

    let root = config.upload().upload_root();
    if !root.is_dir() {
        tracing::warn!(
            upload_root = %root.display(),
            "Upload root does not exist yet; it will be created by the first upload"
        );
    }

    Ok(())
}
