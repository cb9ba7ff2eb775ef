use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One row of the browsable listing: an image with a thumbnail, or a generic file with an icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GalleryEntry {
    /// Public URL of the thumbnail (images) or the icon path (other files)
    pub thumbnail_or_icon_url: String,
    /// Public URL of the uploaded file itself
    pub full_url: String,
    /// Truncated file name for generic files, `None` for images
    pub display_name: Option<String>,
    pub is_image: bool,
}

impl GalleryEntry {
    pub fn image(thumbnail_url: String, full_url: String) -> Self {
        Self {
            thumbnail_or_icon_url: thumbnail_url,
            full_url,
            display_name: None,
            is_image: true,
        }
    }

    pub fn file(icon_path: String, full_url: String, display_name: String) -> Self {
        Self {
            thumbnail_or_icon_url: icon_path,
            full_url,
            display_name: Some(display_name),
            is_image: false,
        }
    }
}
