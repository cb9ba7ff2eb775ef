//! Gallery listing
//!
//! The upload tree is the index: every call walks the live filesystem and rebuilds
//! the entries. Nothing is cached.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use quillbox_core::constants::{
    DISPLAY_NAME_ELLIPSIS, DISPLAY_NAME_KEPT_CHARS, DISPLAY_NAME_MAX_CHARS, INFLIGHT_PREFIX,
    INFLIGHT_SUFFIX,
};
use quillbox_core::{GalleryEntry, UploadSettings, UserIdentity};
use quillbox_processing::{IconClassifier, IconRuleError};
use quillbox_storage::naming::user_directory;
use quillbox_storage::{is_thumbnail, thumbnail_path, UrlResolver};
use walkdir::{DirEntry, WalkDir};

/// Truncate long generic file names for display: 19 characters plus `...` when the
/// name is longer than 20 characters.
pub fn display_name(file_name: &str) -> String {
    if file_name.chars().count() > DISPLAY_NAME_MAX_CHARS {
        let kept: String = file_name.chars().take(DISPLAY_NAME_KEPT_CHARS).collect();
        format!("{}{}", kept, DISPLAY_NAME_ELLIPSIS)
    } else {
        file_name.to_string()
    }
}

fn is_in_flight(file_name: &str) -> bool {
    file_name.starts_with(INFLIGHT_PREFIX) && file_name.ends_with(INFLIGHT_SUFFIX)
}

/// Builds gallery listings from the upload tree.
#[derive(Debug, Clone)]
pub struct BrowseIndexer {
    upload_root: PathBuf,
    restrict_by_user: bool,
    icons: Arc<IconClassifier>,
    urls: UrlResolver,
}

impl BrowseIndexer {
    pub fn new(
        upload_root: impl Into<PathBuf>,
        restrict_by_user: bool,
        icons: Arc<IconClassifier>,
        urls: UrlResolver,
    ) -> Self {
        Self {
            upload_root: upload_root.into(),
            restrict_by_user,
            icons,
            urls,
        }
    }

    pub fn from_settings(settings: &UploadSettings) -> Result<Self, IconRuleError> {
        Ok(Self::new(
            settings.upload_root.clone(),
            settings.restrict_by_user,
            Arc::new(IconClassifier::new(&settings.icon_rules)?),
            UrlResolver::from_settings(settings),
        ))
    }

    /// Directory the listing for `user` covers, or `None` when there is nothing the
    /// user may see.
    ///
    /// Only a known, non-superuser caller under restrict-by-user is scoped to their
    /// own sub-tree.
    pub fn scan_root(&self, user: Option<&UserIdentity>) -> Option<PathBuf> {
        let root = match user {
            Some(user) if self.restrict_by_user && !user.is_superuser => {
                user_directory(&self.upload_root, &user.username)?
            }
            _ => self.upload_root.clone(),
        };
        root.is_dir().then_some(root)
    }

    /// Lazily walk the scan root for `user`, yielding one entry per primary file.
    ///
    /// Each call starts a fresh walk. Entries that vanish or cannot be read mid-walk are
    /// skipped. Siblings are visited in file name order.
    pub fn list_entries<'a>(
        &'a self,
        user: Option<&UserIdentity>,
    ) -> impl Iterator<Item = GalleryEntry> + 'a {
        let walker = self.scan_root(user).map(|root| {
            WalkDir::new(root)
                .follow_links(false)
                .sort_by_file_name()
                .into_iter()
        });

        walker
            .into_iter()
            .flatten()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::warn!(
                        path = ?err.path(),
                        error = %err,
                        "Skipping unreadable entry in upload tree"
                    );
                    None
                }
            })
            .filter_map(move |entry| self.entry_for(&entry))
    }

    fn entry_for(&self, entry: &DirEntry) -> Option<GalleryEntry> {
        if !entry.file_type().is_file() || is_thumbnail(entry.file_name()) {
            return None;
        }

        // Directory listings are read ahead; the file may be gone by now.
        if let Err(err) = entry.metadata() {
            tracing::warn!(
                path = %entry.path().display(),
                error = %err,
                "Skipping vanished entry in upload tree"
            );
            return None;
        }

        let file_name = entry.file_name().to_string_lossy();
        if is_in_flight(&file_name) {
            return None;
        }

        let path = entry.path();
        let full_url = self.urls.to_public_url(path);
        let thumbnail = thumbnail_path(path);

        if has_file(&thumbnail) {
            Some(GalleryEntry::image(
                self.urls.to_public_url(&thumbnail),
                full_url,
            ))
        } else {
            Some(GalleryEntry::file(
                self.icons.icon_for(&file_name).to_string(),
                full_url,
                display_name(&file_name),
            ))
        }
    }
}

fn has_file(path: &Path) -> bool {
    path.try_exists().unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UploadService;
    use chrono::NaiveDate;
    use image::{ImageFormat, Rgb, RgbImage};
    use quillbox_core::UploadRequest;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    fn png_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        RgbImage::from_pixel(50, 50, Rgb([250, 250, 0]))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    async fn upload(service: &UploadService, name: &str, body: &[u8], user: &UserIdentity) {
        service
            .handle_upload_on(UploadRequest::new(name, body, user.clone()), date())
            .await
            .unwrap();
    }

    #[test]
    fn test_display_name_truncation() {
        let long = "abcdefghijklmnopqrstuvwxy";
        assert_eq!(long.chars().count(), 25);
        let shown = display_name(long);
        assert_eq!(shown, "abcdefghijklmnopqrs...");
        assert_eq!(shown.chars().count(), 22);

        let exact = "abcdefghijklmnopqrst";
        assert_eq!(display_name(exact), exact);

        assert_eq!(display_name("ééééééééééééééééééééé"), "ééééééééééééééééééé...");
    }

    #[tokio::test]
    async fn test_round_trip_image_and_text() {
        let dir = tempdir().unwrap();
        let settings = UploadSettings::new(dir.path());
        let service = UploadService::from_settings(&settings);
        let indexer = BrowseIndexer::from_settings(&settings).unwrap();
        let alice = UserIdentity::new("alice");

        upload(&service, "cat.png", &png_bytes(), &alice).await;
        upload(&service, "notes.txt", b"words", &alice).await;

        let entries: Vec<_> = indexer.list_entries(Some(&alice)).collect();
        assert_eq!(entries.len(), 2);

        let image = &entries[0];
        assert!(image.is_image);
        assert_eq!(image.full_url, "/media/2024/03/07/cat.png");
        assert_eq!(image.thumbnail_or_icon_url, "/media/2024/03/07/cat_thumb.png");
        assert_eq!(image.display_name, None);

        let text = &entries[1];
        assert!(!text.is_image);
        assert_eq!(text.full_url, "/media/2024/03/07/notes.txt");
        assert_eq!(
            text.thumbnail_or_icon_url,
            "/static/quillbox/file-icons/txt.png"
        );
        assert_eq!(text.display_name.as_deref(), Some("notes.txt"));
    }

    #[tokio::test]
    async fn test_listing_is_restartable() {
        let dir = tempdir().unwrap();
        let settings = UploadSettings::new(dir.path());
        let service = UploadService::from_settings(&settings);
        let indexer = BrowseIndexer::from_settings(&settings).unwrap();
        let alice = UserIdentity::new("alice");

        upload(&service, "a.txt", b"a", &alice).await;
        assert_eq!(indexer.list_entries(None).count(), 1);

        upload(&service, "b.txt", b"b", &alice).await;
        assert_eq!(indexer.list_entries(None).count(), 2);
    }

    #[tokio::test]
    async fn test_restricted_listing_is_scoped() {
        let dir = tempdir().unwrap();
        let settings = UploadSettings::new(dir.path()).with_restrict_by_user(true);
        let service = UploadService::from_settings(&settings);
        let indexer = BrowseIndexer::from_settings(&settings).unwrap();
        let alice = UserIdentity::new("alice");
        let bob = UserIdentity::new("bob");

        upload(&service, "alice.txt", b"a", &alice).await;
        upload(&service, "bob.txt", b"b", &bob).await;

        let seen: Vec<_> = indexer.list_entries(Some(&alice)).collect();
        assert_eq!(seen.len(), 1);
        assert!(seen.iter().all(|e| e.full_url.starts_with("/media/alice/")));

        let admin = UserIdentity::superuser("admin");
        assert_eq!(indexer.list_entries(Some(&admin)).count(), 2);

        let carol = UserIdentity::new("carol");
        assert_eq!(indexer.list_entries(Some(&carol)).count(), 0);

        let sneaky = UserIdentity::new("..");
        assert_eq!(indexer.list_entries(Some(&sneaky)).count(), 0);
    }

    #[tokio::test]
    async fn test_unrestricted_listing_shows_everyone() {
        let dir = tempdir().unwrap();
        let settings = UploadSettings::new(dir.path());
        let service = UploadService::from_settings(&settings);
        let indexer = BrowseIndexer::from_settings(&settings).unwrap();

        upload(&service, "a.txt", b"a", &UserIdentity::new("alice")).await;
        upload(&service, "b.txt", b"b", &UserIdentity::new("bob")).await;

        assert_eq!(indexer.list_entries(Some(&UserIdentity::new("alice"))).count(), 2);
    }

    #[test]
    fn test_skips_thumbnails_and_in_flight_files() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("report_thumb.pdf"), b"x").unwrap();
        std::fs::write(dir.path().join(".quillbox-upload-abc123.part"), b"x").unwrap();
        std::fs::write(dir.path().join("report.pdf"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("empty")).unwrap();

        let indexer = BrowseIndexer::from_settings(&UploadSettings::new(dir.path())).unwrap();
        let entries: Vec<_> = indexer.list_entries(None).collect();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].full_url, "/media/report.pdf");
        assert_eq!(
            entries[0].thumbnail_or_icon_url,
            "/static/quillbox/file-icons/pdf.png"
        );
    }

    #[test]
    fn test_thumbnail_presence_decides_image() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("fake.jpg"), b"not really a jpeg").unwrap();
        std::fs::write(dir.path().join("fake_thumb.jpg"), b"x").unwrap();

        let indexer = BrowseIndexer::from_settings(&UploadSettings::new(dir.path())).unwrap();
        let entries: Vec<_> = indexer.list_entries(None).collect();

        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_image);
    }

    #[test]
    fn test_files_removed_mid_walk_are_skipped() {
        let dir = tempdir().unwrap();
        for name in ["a.txt", "b.txt", "c.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("z")).unwrap();
        std::fs::write(dir.path().join("z/d.txt"), b"x").unwrap();

        let indexer = BrowseIndexer::from_settings(&UploadSettings::new(dir.path())).unwrap();
        let mut entries = indexer.list_entries(None);

        let first = entries.next().unwrap();
        assert_eq!(first.full_url, "/media/a.txt");

        std::fs::remove_file(dir.path().join("c.txt")).unwrap();
        std::fs::remove_dir_all(dir.path().join("z")).unwrap();

        let rest: Vec<_> = entries.map(|e| e.full_url).collect();
        assert_eq!(rest, vec!["/media/b.txt".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_skipped() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("real.txt"), b"x").unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone.txt"), dir.path().join("link.txt"))
            .unwrap();

        let indexer = BrowseIndexer::from_settings(&UploadSettings::new(dir.path())).unwrap();
        let entries: Vec<_> = indexer.list_entries(None).map(|e| e.full_url).collect();
        assert_eq!(entries, vec!["/media/real.txt".to_string()]);
    }

    #[test]
    fn test_missing_root_lists_nothing() {
        let dir = tempdir().unwrap();
        let indexer =
            BrowseIndexer::from_settings(&UploadSettings::new(dir.path().join("nope"))).unwrap();
        assert_eq!(indexer.list_entries(None).count(), 0);
    }
}
