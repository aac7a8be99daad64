//! Health check endpoint.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub storage_backend: &'static str,
}

/// GET /api/health
///
/// Unauthenticated, for load balancer probes. Verifies storage and
/// metadata connectivity on every call.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    state
        .storage
        .health_check()
        .await
        .map_err(|e| ApiError::Internal(format!("storage unhealthy: {e}")))?;
    state
        .metadata
        .health_check()
        .await
        .map_err(|e| ApiError::Internal(format!("metadata unhealthy: {e}")))?;

    Ok(Json(HealthResponse {
        status: "ok",
        storage_backend: state.storage.backend_name(),
    }))
}
