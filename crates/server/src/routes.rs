//! Route configuration.

use crate::error::{ApiError, ErrorResponse};
use crate::handlers;
use crate::metrics::metrics_handler;
use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{Method, StatusCode, header};
use axum::routing::{get, post};
use tokio::sync::OnceCell;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Process-wide router, constructed once on first use and reused across
/// requests.
static ROUTER: OnceCell<Router> = OnceCell::const_new();

/// Get the shared application router, building it on first call.
///
/// Concurrent first calls race on initialization; the cell guarantees
/// exactly one router is built and every caller observes the same one.
pub async fn shared_router(state: AppState) -> Router {
    ROUTER
        .get_or_init(|| async move { create_router(state) })
        .await
        .clone()
}

/// Convert a handler panic into the standard 500 error envelope.
fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> axum::http::Response<String> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %detail, "handler panicked");

    let body = ErrorResponse {
        success: false,
        error: format!("internal error: {detail}"),
    };
    let json = serde_json::to_string(&body)
        .unwrap_or_else(|_| r#"{"success":false,"error":"internal error"}"#.to_string());

    axum::http::Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "application/json")
        .body(json)
        .unwrap_or_default()
}

/// Unmatched paths answer the same JSON envelope as handler errors.
async fn fallback_handler() -> ApiError {
    ApiError::NotFound("no such endpoint".to_string())
}

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Upload mediation and existence check
        .route("/api/audio/check", post(handlers::check_audio))
        .route("/api/audio/upload", post(handlers::create_upload_url))
        .route("/api/file/upload", post(handlers::direct_upload))
        // Bible audio metadata
        .route(
            "/api/bible/audio-metadata",
            get(handlers::bible_audio_metadata),
        )
        // Passthrough proxies
        .route(
            "/api/card-backgrounds/{file}",
            get(handlers::card_background),
        )
        .route("/api/proxy-image", get(handlers::proxy_image))
        // Health check (intentionally unauthenticated for load balancers/k8s probes)
        .route("/api/health", get(handlers::health_check));

    let mut router = Router::new().merge(api_routes);

    // Conditionally add metrics endpoint based on config.
    // SECURITY: When enabled, this endpoint MUST be network-restricted
    // to authorized Prometheus scraper IPs only.
    // See crate::metrics module documentation for details.
    if state.config.server.metrics_enabled {
        router = router.merge(Router::new().route("/metrics", get(metrics_handler)));
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    router
        .fallback(fallback_handler)
        .layer(DefaultBodyLimit::max(state.config.server.max_body_bytes))
        .layer(cors)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
