//! HTTP surface constants

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "upload";

/// Query parameter naming the editor callback to invoke after an upload.
pub const CALLBACK_PARAM: &str = "CKEditorFuncNum";

pub const UPLOAD_PATH: &str = "/upload";
pub const BROWSE_PATH: &str = "/browse";
pub const HEALTH_PATH: &str = "/health";
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";
