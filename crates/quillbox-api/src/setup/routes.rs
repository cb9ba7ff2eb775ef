//! Route configuration and setup

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use quillbox_core::Config;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api_doc::openapi_json;
use crate::auth::{identity_middleware, IdentityHeaders};
use crate::constants::{BROWSE_PATH, HEALTH_PATH, OPENAPI_PATH, UPLOAD_PATH};
use crate::handlers;
use crate::state::AppState;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config);
    let identity_headers = Arc::new(IdentityHeaders::from_config(config)?);

    // Uploads are streamed to disk and carry no size limit.
    let editor_routes = Router::new()
        .route(
            UPLOAD_PATH,
            post(handlers::upload::upload_file).layer(DefaultBodyLimit::disable()),
        )
        .route(BROWSE_PATH, get(handlers::browse::browse_files))
        .layer(axum::middleware::from_fn_with_state(
            identity_headers,
            identity_middleware,
        ));

    let public_routes = Router::new()
        .route(HEALTH_PATH, get(handlers::health::health_check))
        .route(OPENAPI_PATH, get(openapi_json));

    let app = public_routes
        .merge(editor_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> CorsLayer {
    if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins()
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring unparsable CORS origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    }
}
