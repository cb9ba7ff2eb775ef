//! Request identity
//!
//! Authentication happens upstream: a trusted proxy (or the host application)
//! forwards the signed-in username and superuser flag as request headers.

pub mod middleware;
pub mod models;

pub use middleware::{identity_middleware, IdentityHeaders};
pub use models::CurrentUser;
