use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderName},
    middleware::Next,
    response::Response,
};
use quillbox_core::{Config, UserIdentity};

/// Names of the trusted headers carrying the caller's identity.
#[derive(Debug, Clone)]
pub struct IdentityHeaders {
    user: HeaderName,
    superuser: HeaderName,
}

impl IdentityHeaders {
    pub fn new(user: HeaderName, superuser: HeaderName) -> Self {
        Self { user, superuser }
    }

    pub fn from_config(config: &Config) -> Result<Self, anyhow::Error> {
        let user = HeaderName::from_bytes(config.user_header().as_bytes())
            .with_context(|| format!("Invalid user header name '{}'", config.user_header()))?;
        let superuser = HeaderName::from_bytes(config.superuser_header().as_bytes())
            .with_context(|| {
                format!("Invalid superuser header name '{}'", config.superuser_header())
            })?;
        Ok(Self::new(user, superuser))
    }

    /// `None` when the username header is missing, empty or not valid UTF-8.
    pub fn identity_from(&self, headers: &HeaderMap) -> Option<UserIdentity> {
        let username = headers
            .get(&self.user)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|name| !name.is_empty())?;

        let is_superuser = headers
            .get(&self.superuser)
            .and_then(|value| value.to_str().ok())
            .map(|value| matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Some(UserIdentity {
            username: username.to_string(),
            is_superuser,
        })
    }
}

/// Attach the forwarded [`UserIdentity`] to the request, if any.
///
/// Requests without one pass through; handlers that need a user reject them via
/// [`crate::auth::CurrentUser`].
pub async fn identity_middleware(
    State(headers): State<Arc<IdentityHeaders>>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(identity) = headers.identity_from(request.headers()) {
        request.extensions_mut().insert(identity);
    }
    next.run(request).await
}
