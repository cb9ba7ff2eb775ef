//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use quillbox_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Quillbox API",
        version = "0.1.0",
        description = "Upload and browse endpoints backing a rich-text editor's file dialogs. Identity is supplied by a trusted upstream proxy."
    ),
    paths(
        handlers::upload::upload_file,
        handlers::browse::browse_files,
        handlers::health::health_check,
    ),
    components(schemas(
        models::GalleryEntry,
        handlers::browse::BrowseResponse,
        handlers::health::HealthResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "uploads", description = "Editor upload and browse dialogs"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Serves the generated OpenAPI document.
pub async fn openapi_json() -> axum::Json<utoipa::openapi::OpenApi> {
    axum::Json(ApiDoc::openapi())
}
