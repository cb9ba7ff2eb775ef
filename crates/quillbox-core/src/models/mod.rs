//! Data models for the upload and browse components
//!
//! Everything here is plain data: the filesystem tree is the only index, so none of
//! these types are persisted anywhere.

mod gallery;
mod icon;
mod upload;
mod user;

pub use gallery::*;
pub use icon::*;
pub use upload::*;
pub use user::*;
