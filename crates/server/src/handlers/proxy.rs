//! Passthrough image proxies.
//!
//! These exist solely to route around browser same-origin and
//! mixed-content restrictions; the payload is streamed back unmodified.

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;
use amen_core::key::is_card_background_name;
use amen_core::{CARD_BACKGROUND_CACHE_SECS, PROXY_CACHE_SECS};
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::instrument;

#[derive(Debug, Deserialize)]
pub struct ProxyImageQuery {
    pub url: Option<String>,
}

/// Fetch an upstream resource and re-stream it with a cache directive.
///
/// Upstream non-success statuses are propagated verbatim with the JSON
/// error envelope; transport failures map to 500.
async fn fetch_passthrough(
    state: &AppState,
    endpoint: &'static str,
    url: &str,
    default_content_type: &'static str,
    cache_secs: u64,
) -> ApiResult<Response> {
    metrics::PROXY_REQUESTS.with_label_values(&[endpoint]).inc();
    let timer = metrics::PROXY_FETCH_DURATION.start_timer();

    let upstream = match state.http.get(url).send().await {
        Ok(resp) => resp,
        Err(e) => {
            // Only completed fetches contribute duration samples.
            timer.stop_and_discard();
            metrics::PROXY_UPSTREAM_ERRORS
                .with_label_values(&[endpoint])
                .inc();
            return Err(ApiError::Internal(format!("upstream fetch failed: {e}")));
        }
    };
    timer.observe_duration();

    let status = upstream.status();
    if !status.is_success() {
        metrics::PROXY_UPSTREAM_ERRORS
            .with_label_values(&[endpoint])
            .inc();
        let status = StatusCode::from_u16(status.as_u16())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = serde_json::json!({
            "success": false,
            "error": format!("upstream returned {}", status.as_u16()),
        });
        return Ok((status, axum::Json(body)).into_response());
    }

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(default_content_type)
        .to_string();

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CACHE_CONTROL,
            format!("public, max-age={cache_secs}"),
        )
        .body(Body::from_stream(upstream.bytes_stream()))
        .map_err(|e| ApiError::Internal(format!("failed to build response: {e}")))?;

    Ok(response)
}

/// GET /api/card-backgrounds/{file}
///
/// Only names matching `bg<digits>.jpg` are fetched; anything else,
/// including traversal attempts, is a 400.
#[instrument(skip(state))]
pub async fn card_background(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> ApiResult<Response> {
    if !is_card_background_name(&file) {
        return Err(ApiError::BadRequest(format!(
            "invalid card background name: {file}"
        )));
    }

    let url = state.config.proxy.card_background_url(&file);
    fetch_passthrough(
        &state,
        "card_backgrounds",
        &url,
        "image/jpeg",
        CARD_BACKGROUND_CACHE_SECS,
    )
    .await
}

/// GET /api/proxy-image?url=
///
/// Generic passthrough for any http(s) image URL.
#[instrument(skip(state))]
pub async fn proxy_image(
    State(state): State<AppState>,
    Query(query): Query<ProxyImageQuery>,
) -> ApiResult<Response> {
    let url = query
        .url
        .ok_or_else(|| ApiError::BadRequest("missing required parameter: url".to_string()))?;

    let parsed = reqwest::Url::parse(&url)
        .map_err(|e| ApiError::BadRequest(format!("invalid url: {e}")))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ApiError::BadRequest(format!(
            "unsupported url scheme: {}",
            parsed.scheme()
        )));
    }

    fetch_passthrough(
        &state,
        "proxy_image",
        parsed.as_str(),
        "application/octet-stream",
        PROXY_CACHE_SECS,
    )
    .await
}
