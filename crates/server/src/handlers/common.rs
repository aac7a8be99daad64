//! Shared handler helpers.

use crate::error::{ApiError, ApiResult};
use axum::extract::Request;
use serde::de::DeserializeOwned;

/// Read and parse a JSON request body, bounded by `limit` bytes.
///
/// Read failures (including oversized bodies) and malformed JSON both map
/// to the 400 taxonomy rather than a generic 500.
pub async fn read_json_body<T: DeserializeOwned>(req: Request, limit: usize) -> ApiResult<T> {
    let bytes = axum::body::to_bytes(req.into_body(), limit)
        .await
        .map_err(|e| ApiError::BadRequest(format!("failed to read body: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::BadRequest(format!("invalid JSON: {e}")))
}
