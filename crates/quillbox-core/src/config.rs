//! Configuration module
//!
//! Configuration is read once at startup, validated, and then shared read-only with
//! every component. Core logic never looks anything up in the environment itself.

use std::env;
use std::path::{Path, PathBuf};

use crate::constants::DEFAULT_THUMBNAIL_SIZE;
use crate::models::IconRule;

const SERVER_PORT: u16 = 4000;
const MEDIA_URL: &str = "/media/";
const STATIC_PREFIX: &str = "/static/quillbox/";
const USER_HEADER: &str = "x-remote-user";
const SUPERUSER_HEADER: &str = "x-remote-superuser";

/// Server-level settings that the upload core does not care about.
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    /// Trusted header carrying the authenticated username
    pub user_header: String,
    /// Trusted header flagging superusers
    pub superuser_header: String,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            user_header: USER_HEADER.to_string(),
            superuser_header: SUPERUSER_HEADER.to_string(),
        }
    }
}

/// Everything the upload, thumbnail, URL and browse components consume.
#[derive(Clone, Debug)]
pub struct UploadSettings {
    /// Base directory for all uploads and scans
    pub upload_root: PathBuf,
    /// When set, public URLs are built from this instead of `media_url`
    pub upload_url_prefix: Option<String>,
    pub media_root: PathBuf,
    pub media_url: String,
    /// Gates per-username sub-paths for both upload and browse
    pub restrict_by_user: bool,
    pub static_prefix: String,
    pub icon_rules: Vec<IconRule>,
    pub thumbnail_size: (u32, u32),
}

impl UploadSettings {
    /// Settings rooted at `upload_root` with every optional knob at its default.
    /// The generic media pair defaults to the upload root and `/media/`.
    pub fn new(upload_root: impl Into<PathBuf>) -> Self {
        let upload_root = upload_root.into();
        let static_prefix = STATIC_PREFIX.to_string();
        Self {
            media_root: upload_root.clone(),
            upload_root,
            upload_url_prefix: None,
            media_url: MEDIA_URL.to_string(),
            restrict_by_user: false,
            icon_rules: IconRule::default_rules(&file_icons_prefix(&static_prefix)),
            static_prefix,
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
        }
    }

    pub fn with_upload_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.upload_url_prefix = Some(prefix.into());
        self
    }

    pub fn with_media(mut self, media_root: impl Into<PathBuf>, media_url: impl Into<String>) -> Self {
        self.media_root = media_root.into();
        self.media_url = media_url.into();
        self
    }

    pub fn with_restrict_by_user(mut self, restrict: bool) -> Self {
        self.restrict_by_user = restrict;
        self
    }

    pub fn with_icon_rules(mut self, rules: Vec<IconRule>) -> Self {
        self.icon_rules = rules;
        self
    }

    pub fn upload_root(&self) -> &Path {
        &self.upload_root
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.upload_root.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("Upload root cannot be empty"));
        }
        if self.thumbnail_size.0 == 0 || self.thumbnail_size.1 == 0 {
            return Err(anyhow::anyhow!(
                "Thumbnail size must be non-zero, got {}x{}",
                self.thumbnail_size.0,
                self.thumbnail_size.1
            ));
        }
        if self.icon_rules.is_empty() {
            return Err(anyhow::anyhow!("At least one file icon rule is required"));
        }
        Ok(())
    }
}

/// Full application configuration
#[derive(Clone, Debug)]
pub struct QuillboxConfig {
    pub base: BaseConfig,
    pub upload: UploadSettings,
}

/// Application configuration handle.
#[derive(Clone, Debug)]
pub struct Config(pub Box<QuillboxConfig>);

impl Config {
    pub fn new(base: BaseConfig, upload: UploadSettings) -> Self {
        Config(Box::new(QuillboxConfig { base, upload }))
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: var("PORT")
                .unwrap_or_else(|| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            user_header: var("QUILLBOX_USER_HEADER")
                .unwrap_or_else(|| USER_HEADER.to_string())
                .to_lowercase(),
            superuser_header: var("QUILLBOX_SUPERUSER_HEADER")
                .unwrap_or_else(|| SUPERUSER_HEADER.to_string())
                .to_lowercase(),
        };

        let upload_root = var("QUILLBOX_UPLOAD_PATH")
            .map(PathBuf::from)
            .ok_or_else(|| anyhow::anyhow!("QUILLBOX_UPLOAD_PATH must be set"))?;

        let static_prefix = var("QUILLBOX_STATIC_PREFIX").unwrap_or_else(|| STATIC_PREFIX.to_string());

        let icon_rules = match var("QUILLBOX_FILE_ICONS") {
            Some(raw) => serde_json::from_str::<Vec<IconRule>>(&raw).map_err(|e| {
                anyhow::anyhow!("QUILLBOX_FILE_ICONS must be a JSON list of [pattern, icon] pairs: {}", e)
            })?,
            None => IconRule::default_rules(&file_icons_prefix(&static_prefix)),
        };

        let thumbnail_size = match var("QUILLBOX_THUMBNAIL_SIZE") {
            Some(raw) => parse_dimensions(&raw)?,
            None => DEFAULT_THUMBNAIL_SIZE,
        };

        let upload = UploadSettings {
            media_root: var("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| upload_root.clone()),
            upload_root,
            upload_url_prefix: var("QUILLBOX_UPLOAD_PREFIX").filter(|s| !s.trim().is_empty()),
            media_url: var("MEDIA_URL").unwrap_or_else(|| MEDIA_URL.to_string()),
            restrict_by_user: var("QUILLBOX_RESTRICT_BY_USER")
                .map(|s| parse_flag(&s))
                .unwrap_or(false),
            static_prefix,
            icon_rules,
            thumbnail_size,
        };

        let config = Config::new(base, upload);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.server_port() == 0 {
            return Err(anyhow::anyhow!("PORT cannot be 0"));
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        self.upload().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.0.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.0.base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.0.base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.0.base.environment
    }

    pub fn user_header(&self) -> &str {
        &self.0.base.user_header
    }

    pub fn superuser_header(&self) -> &str {
        &self.0.base.superuser_header
    }

    pub fn upload(&self) -> &UploadSettings {
        &self.0.upload
    }

    pub fn restrict_by_user(&self) -> bool {
        self.0.upload.restrict_by_user
    }
}

fn file_icons_prefix(static_prefix: &str) -> String {
    format!("{}file-icons/", static_prefix)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Parse `WxH` into a pixel box.
fn parse_dimensions(raw: &str) -> Result<(u32, u32), anyhow::Error> {
    let (w, h) = raw
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| anyhow::anyhow!("Thumbnail size must look like 75x75, got '{}'", raw))?;
    let width = w
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid thumbnail width '{}'", w))?;
    let height = h
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid thumbnail height '{}'", h))?;
    Ok((width, height))
}
