//! Direct base64 upload endpoint.

use crate::error::{ApiError, ApiResult};
use crate::handlers::common::read_json_body;
use crate::metrics;
use crate::state::AppState;
use amen_core::key::validate_file_name;
use amen_core::upload::{DirectUploadRequest, DirectUploadResponse};
use axum::Json;
use axum::extract::{Request, State};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use tracing::instrument;

/// POST /api/file/upload
///
/// Decode the inline payload and write it server-side, bypassing signed-URL
/// mediation. The public URL is returned only after the write completes.
/// Re-uploading the same key replaces the object (last-write-wins).
#[instrument(skip(state, req))]
pub async fn direct_upload(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<Json<DirectUploadResponse>> {
    let body: DirectUploadRequest =
        read_json_body(req, state.config.server.max_body_bytes).await?;
    validate_file_name(&body.file_name)?;

    if body.file_base64.is_empty() {
        return Err(ApiError::BadRequest(
            "fileBase64 must not be empty".to_string(),
        ));
    }

    let data = BASE64
        .decode(body.file_base64.as_bytes())
        .map_err(|e| ApiError::BadRequest(format!("invalid base64 payload: {e}")))?;

    let content_type = body
        .content_type
        .as_deref()
        .unwrap_or("application/octet-stream");
    let size = data.len();

    state
        .storage
        .put(&body.file_name, Bytes::from(data), Some(content_type))
        .await?;

    metrics::DIRECT_UPLOADS.inc();
    metrics::DIRECT_UPLOAD_BYTES.inc_by(size as u64);

    Ok(Json(DirectUploadResponse {
        success: true,
        public_url: state.config.upload.public_url(&body.file_name),
    }))
}
