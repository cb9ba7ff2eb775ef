//! Test helpers: build the router over a temporary upload root.
//!
//! Run from workspace root: `cargo test -p quillbox-api`.

pub mod fixtures;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum_test::TestServer;
use quillbox_api::setup::routes;
use quillbox_api::state::AppState;
use quillbox_core::{BaseConfig, Config, UploadSettings};
use tempfile::TempDir;

pub const USER_HEADER: &str = "x-remote-user";
pub const SUPERUSER_HEADER: &str = "x-remote-superuser";

/// Test application: server plus the temporary upload tree it writes into.
pub struct TestApp {
    pub server: TestServer,
    pub upload_root: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Every regular file under the upload root, sorted.
    pub fn stored_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        collect_files(&self.upload_root, &mut files);
        files.sort();
        files
    }

    /// Stored file names (without directories), sorted.
    pub fn stored_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .stored_files()
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, out);
        } else {
            out.push(path);
        }
    }
}

/// Setup test app with default settings.
pub fn setup_test_app() -> TestApp {
    setup_test_app_with(|settings| settings)
}

/// Setup test app, adjusting the upload settings first.
pub fn setup_test_app_with(customize: impl FnOnce(UploadSettings) -> UploadSettings) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let upload_root = temp_dir.path().join("uploads");

    let upload = customize(UploadSettings::new(&upload_root));
    let config = Config::new(BaseConfig::default(), upload);

    let state = Arc::new(AppState::from_config(&config).expect("Failed to build state"));
    let app = routes::setup_routes(&config, state).expect("Failed to build routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        upload_root,
        _temp_dir: temp_dir,
    }
}
