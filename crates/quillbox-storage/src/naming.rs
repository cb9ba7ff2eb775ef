//! Deterministic naming and placement of uploads.
//!
//! Collision avoidance here is check-then-act: a name reported free may be taken by a
//! concurrent upload before it is written. [`crate::LocalUploadStore`] closes that gap by
//! publishing with an exclusive no-clobber rename and asking for the next free name
//! when it loses the race.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use quillbox_core::constants::{DATE_PATH_FORMAT, THUMBNAIL_MARKER};
use quillbox_core::{UploadSettings, UserIdentity};

use crate::traits::{StorageError, StorageResult};

/// Split a file name into its stem and optional extension (without the dot).
fn split_file_name(path: &Path) -> (OsString, Option<OsString>) {
    let stem = path
        .file_stem()
        .map(OsStr::to_os_string)
        .unwrap_or_default();
    let ext = path.extension().map(OsStr::to_os_string);
    (stem, ext)
}

fn join_file_name(stem: &OsStr, ext: Option<&OsStr>) -> OsString {
    let mut name = stem.to_os_string();
    if let Some(ext) = ext {
        name.push(".");
        name.push(ext);
    }
    name
}

/// Returns a path that does not exist at the instant of the last check.
///
/// While `candidate` exists, an underscore is appended to the file stem (the
/// extension is preserved): `a.png`, `a_.png`, `a__.png`, ...
pub async fn available_name(candidate: &Path) -> PathBuf {
    let (mut stem, ext) = split_file_name(candidate);
    let mut name = candidate.to_path_buf();

    while tokio::fs::try_exists(&name).await.unwrap_or(false) {
        stem.push("_");
        name = candidate.with_file_name(join_file_name(&stem, ext.as_deref()));
    }

    name
}

/// Thumbnail companion of `path`: `stem + "_thumb" + ext`. Pure, no I/O.
pub fn thumbnail_path(path: &Path) -> PathBuf {
    let (mut stem, ext) = split_file_name(path);
    stem.push(THUMBNAIL_MARKER);
    path.with_file_name(join_file_name(&stem, ext.as_deref()))
}

/// Extension of `path` including the leading dot, or an empty string.
pub fn file_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// Whether a file name carries the thumbnail marker.
pub fn is_thumbnail(file_name: &OsStr) -> bool {
    file_name.to_string_lossy().contains(THUMBNAIL_MARKER)
}

/// Reduce a client-declared file name to a single safe path component.
///
/// Directory parts (either separator style) and control characters are dropped.
pub fn normalize_file_name(declared: &str) -> StorageResult<String> {
    let last = declared
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let cleaned: String = last.chars().filter(|c| !c.is_control()).collect();

    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        return Err(StorageError::InvalidName(format!(
            "Unusable upload file name '{}'",
            declared
        )));
    }

    Ok(cleaned)
}

/// Per-user directory under `root`, or `None` when the username cannot be a single
/// path component.
pub fn user_directory(root: &Path, username: &str) -> Option<PathBuf> {
    if username.is_empty()
        || username == "."
        || username == ".."
        || username.contains(['/', '\\'])
        || username.chars().any(char::is_control)
    {
        return None;
    }
    Some(root.join(username))
}

/// Computes destinations for new uploads under the configured upload root.
#[derive(Debug, Clone)]
pub struct PathNamer {
    upload_root: PathBuf,
    restrict_by_user: bool,
}

impl PathNamer {
    pub fn new(upload_root: impl Into<PathBuf>, restrict_by_user: bool) -> Self {
        Self {
            upload_root: upload_root.into(),
            restrict_by_user,
        }
    }

    pub fn from_settings(settings: &UploadSettings) -> Self {
        Self::new(settings.upload_root.clone(), settings.restrict_by_user)
    }

    pub fn upload_root(&self) -> &Path {
        &self.upload_root
    }

    /// `upload_root/[username/]YYYY/MM/DD`
    pub fn upload_directory(&self, user: &UserIdentity, today: NaiveDate) -> StorageResult<PathBuf> {
        let base = if self.restrict_by_user {
            user_directory(&self.upload_root, &user.username).ok_or_else(|| {
                StorageError::InvalidName(format!(
                    "Username '{}' cannot be used as an upload directory",
                    user.username
                ))
            })?
        } else {
            self.upload_root.clone()
        };

        Ok(base.join(today.format(DATE_PATH_FORMAT).to_string()))
    }

    /// Collision-free destination for `file_name`, creating missing directories.
    ///
    /// Directory creation is idempotent, including under concurrent callers.
    pub async fn upload_destination(
        &self,
        user: &UserIdentity,
        file_name: &str,
        today: NaiveDate,
    ) -> StorageResult<PathBuf> {
        let directory = self.upload_directory(user, today)?;

        tokio::fs::create_dir_all(&directory)
            .await
            .map_err(|source| StorageError::CreateDirFailed {
                path: directory.clone(),
                source,
            })?;

        Ok(available_name(&directory.join(file_name)).await)
    }
}
