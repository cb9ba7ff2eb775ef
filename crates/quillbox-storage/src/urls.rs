//! Public URL derivation for stored files.

use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use quillbox_core::UploadSettings;
use regex::Regex;

/// Characters escaped inside a single URL path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'\'')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/');

/// RFC 3986 appendix B split: (scheme + authority)(path)(query + fragment).
static URL_PARTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^((?:[^:/?#]+:)?(?://[^/?#]*)?)([^?#]*)(.*)$")
        .expect("URL split pattern is valid")
});

static REPEATED_SLASHES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("/{2,}").expect("slash pattern is valid"));

/// Collapse runs of `/` in the path component only.
///
/// `//` after the scheme and anything in the query or fragment is left alone.
pub fn collapse_path_separators(url: &str) -> String {
    let Some(caps) = URL_PARTS.captures(url) else {
        return url.to_string();
    };
    let head = caps.get(1).map_or("", |m| m.as_str());
    let path = caps.get(2).map_or("", |m| m.as_str());
    let tail = caps.get(3).map_or("", |m| m.as_str());

    format!("{head}{}{tail}", REPEATED_SLASHES.replace_all(path, "/"))
}

/// Maps absolute filesystem paths under a root onto a public URL prefix.
#[derive(Debug, Clone)]
pub struct UrlResolver {
    root: PathBuf,
    prefix: String,
}

impl UrlResolver {
    pub fn new(root: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            prefix: prefix.into(),
        }
    }

    /// Uses the explicit upload URL prefix when configured, otherwise the general
    /// media root and URL.
    pub fn from_settings(settings: &UploadSettings) -> Self {
        match settings.upload_url_prefix.as_deref() {
            Some(prefix) if !prefix.is_empty() => {
                Self::new(settings.upload_root.clone(), prefix)
            }
            _ => Self::new(settings.media_root.clone(), settings.media_url.clone()),
        }
    }

    /// `prefix + "/" + (path relative to root)`, with duplicate slashes collapsed in
    /// the path component.
    ///
    /// A path outside the root is appended as-is.
    pub fn to_public_url(&self, absolute_path: &Path) -> String {
        let relative = match absolute_path.strip_prefix(&self.root) {
            Ok(relative) => relative
                .components()
                .filter_map(|component| match component {
                    Component::Normal(part) => {
                        Some(utf8_percent_encode(&part.to_string_lossy(), SEGMENT).to_string())
                    }
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("/"),
            Err(_) => {
                tracing::debug!(
                    path = %absolute_path.display(),
                    root = %self.root.display(),
                    "Path is outside the public root, using it verbatim"
                );
                absolute_path.to_string_lossy().into_owned()
            }
        };

        collapse_path_separators(&format!("{}/{}", self.prefix, relative))
    }
}
