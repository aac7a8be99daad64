//! HTTP API server for the myAmen media backend.
//!
//! This crate provides the HTTP surface:
//! - Signed upload URL mediation
//! - Direct base64 uploads
//! - Audio existence checks
//! - Bible audio metadata queries
//! - Passthrough image proxies

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, shared_router};
pub use state::AppState;
