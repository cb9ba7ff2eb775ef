//! Constants shared across the upload and browse components.

/// Suffix inserted before the extension to name (and detect) derived thumbnails.
pub const THUMBNAIL_MARKER: &str = "_thumb";

/// Default thumbnail bounding box in pixels.
pub const DEFAULT_THUMBNAIL_SIZE: (u32, u32) = (75, 75);

/// Date-based sub-path layout for new uploads (`YYYY/MM/DD`).
pub const DATE_PATH_FORMAT: &str = "%Y/%m/%d";

/// Generic file names longer than this are truncated in gallery listings.
pub const DISPLAY_NAME_MAX_CHARS: usize = 20;

/// Number of characters kept when a display name is truncated.
pub const DISPLAY_NAME_KEPT_CHARS: usize = 19;

pub const DISPLAY_NAME_ELLIPSIS: &str = "...";

/// Prefix and suffix of in-flight upload temporaries. Browse listings skip these.
pub const INFLIGHT_PREFIX: &str = ".quillbox-upload-";
pub const INFLIGHT_SUFFIX: &str = ".part";
