use std::sync::Arc;

use axum::{extract::State, Json};
use quillbox_core::{AppError, GalleryEntry};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::CurrentUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BrowseResponse {
    pub entries: Vec<GalleryEntry>,
}

/// List uploaded files for the editor's browse dialog
///
/// Under restrict-by-user, ordinary users only see their own uploads; superusers see
/// everything. The upload tree is rescanned on every call.
#[utoipa::path(
    get,
    path = "/browse",
    tag = "uploads",
    responses(
        (status = 200, description = "Gallery entries", body = BrowseResponse),
        (status = 401, description = "No user identity", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, user),
    fields(username = %user.0.username, operation = "browse")
)]
pub async fn browse_files(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Result<Json<BrowseResponse>, HttpAppError> {
    let CurrentUser(user) = user;
    let indexer = state.browse_indexer.clone();

    let entries = tokio::task::spawn_blocking(move || {
        indexer.list_entries(Some(&user)).collect::<Vec<_>>()
    })
    .await
    .map_err(|e| AppError::InternalWithSource {
        message: "Browse task failed".to_string(),
        source: anyhow::Error::new(e),
    })?;

    tracing::debug!(entries = entries.len(), "Browse listing built");

    Ok(Json(BrowseResponse { entries }))
}
