//! Audio existence check and signed upload URL endpoints.

use crate::error::{ApiError, ApiResult};
use crate::handlers::common::read_json_body;
use crate::metrics;
use crate::state::AppState;
use amen_core::key::validate_file_name;
use amen_core::upload::{
    CheckFileRequest, CheckFileResponse, SignedUploadDescriptor, UploadUrlRequest,
    UploadUrlResponse,
};
use axum::Json;
use axum::extract::{Request, State};
use tracing::instrument;

/// POST /api/audio/check
///
/// Metadata-only existence probe. The public URL is only handed out for a
/// key the store has confirmed to exist; a failed probe (network, auth,
/// 5xx) surfaces as 500, never as 404.
#[instrument(skip(state, req))]
pub async fn check_audio(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<Json<CheckFileResponse>> {
    let body: CheckFileRequest =
        read_json_body(req, state.config.server.max_body_bytes).await?;
    validate_file_name(&body.file_name)?;

    if state.storage.exists(&body.file_name).await? {
        metrics::EXISTENCE_CHECKS.with_label_values(&["found"]).inc();
        Ok(Json(CheckFileResponse {
            success: true,
            public_url: state.config.upload.public_url(&body.file_name),
        }))
    } else {
        metrics::EXISTENCE_CHECKS
            .with_label_values(&["missing"])
            .inc();
        Err(ApiError::NotFound(format!(
            "file not found: {}",
            body.file_name
        )))
    }
}

/// POST /api/audio/upload
///
/// Issue a time-boxed signed PUT URL for the requested key. No data is
/// written here; `public_url` only becomes valid once the caller performs
/// the PUT.
#[instrument(skip(state, req))]
pub async fn create_upload_url(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<Json<UploadUrlResponse>> {
    let body: UploadUrlRequest =
        read_json_body(req, state.config.server.max_body_bytes).await?;
    validate_file_name(&body.file_name)?;

    let ttl = state.config.upload.signed_url_ttl();
    let upload_url = state.storage.presign_put(&body.file_name, ttl).await?;
    metrics::SIGNED_URLS_ISSUED.inc();

    let descriptor = SignedUploadDescriptor {
        upload_url,
        public_url: state.config.upload.public_url(&body.file_name),
        expires_in: ttl.as_secs(),
    };
    Ok(Json(UploadUrlResponse::from_descriptor(descriptor)))
}
