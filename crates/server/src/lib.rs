//! HTTP block upload gateway for Strata.
//!
//! This crate provides the HTTP control plane:
//! - Block upload session creation
//! - Block file streaming upload
//! - Upload completion with metadata sanitization

pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod sanitize;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
