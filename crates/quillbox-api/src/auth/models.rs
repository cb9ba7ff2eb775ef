use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use quillbox_core::{AppError, UserIdentity};

use crate::error::HttpAppError;

/// Identity of the signed-in editor user, placed in request extensions by
/// [`crate::auth::identity_middleware`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserIdentity);

// Extract directly from request parts so handlers taking Multipart can use it.
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserIdentity>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| AppError::Unauthorized("Missing user identity".to_string()).into())
    }
}
