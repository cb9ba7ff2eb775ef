//! Quillbox API Library
//!
//! This crate provides the HTTP handlers, identity middleware, and application setup
//! for the editor's upload and browse dialogs.

// Module declarations
mod api_doc;
pub mod constants;
mod handlers;
pub mod setup;
mod telemetry;

// Public modules
pub mod auth;
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use handlers::browse::BrowseResponse;
pub use handlers::upload::callback_script;
