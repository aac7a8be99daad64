//! Integration tests for HTTP API endpoints.

mod common;

use amen_metadata::BibleAudioRow;
use amen_storage::ObjectStore;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::TestServer;
use serde_json::{Value, json};
use sqlx::types::Json;
use time::OffsetDateTime;
use tower::ServiceExt;

/// Helper to make JSON requests.
async fn json_request(
    router: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    let body = match body {
        Some(v) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&v).unwrap())
        }
        None => Body::empty(),
    };

    let request = builder.body(body).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

async fn seed_bible_audio(server: &TestServer, book_id: i64, chapter: i64, audio_url: &str) {
    let row = BibleAudioRow {
        book_id,
        chapter,
        audio_url: audio_url.to_string(),
        duration: 123.5,
        verse_timings: Json(json!([{"verse": 1, "start": 0.0, "end": 5.5}])),
        created_at: OffsetDateTime::now_utc(),
    };
    server
        .metadata()
        .upsert_bible_audio(&row)
        .await
        .expect("Failed to seed bible audio");
}

#[tokio::test]
async fn health_check_reports_ok() {
    let server = TestServer::new().await;
    let (status, body) = json_request(&server.router, "GET", "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage_backend"], "memory");
}

#[tokio::test]
async fn check_unknown_file_is_404_envelope() {
    let server = TestServer::new().await;
    let (status, body) = json_request(
        &server.router,
        "POST",
        "/api/audio/check",
        Some(json!({"fileName": "never-written.mp3"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("never-written.mp3"));
}

#[tokio::test]
async fn check_missing_file_name_is_400() {
    let server = TestServer::new().await;
    let (status, body) =
        json_request(&server.router, "POST", "/api/audio/check", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn check_traversal_file_name_is_400() {
    let server = TestServer::new().await;
    let (status, _) = json_request(
        &server.router,
        "POST",
        "/api/audio/check",
        Some(json!({"fileName": "../etc/passwd"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn check_finds_file_after_direct_upload() {
    let server = TestServer::new().await;

    let (status, body) = json_request(
        &server.router,
        "POST",
        "/api/file/upload",
        Some(json!({"fileName": "audio/hymn.mp3", "fileBase64": "aGVsbG8="})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["publicUrl"],
        "https://cdn.test.invalid/audio/hymn.mp3"
    );

    // Idempotent under repeated checks
    for _ in 0..2 {
        let (status, body) = json_request(
            &server.router,
            "POST",
            "/api/audio/check",
            Some(json!({"fileName": "audio/hymn.mp3"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(
            body["publicUrl"],
            "https://cdn.test.invalid/audio/hymn.mp3"
        );
    }
}

#[tokio::test]
async fn check_storage_failure_is_500_not_404() {
    let server = TestServer::new().await;
    server
        .storage
        .fail_all
        .store(true, std::sync::atomic::Ordering::Relaxed);

    let (status, body) = json_request(
        &server.router,
        "POST",
        "/api/audio/check",
        Some(json!({"fileName": "a.mp3"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn upload_mediator_returns_signed_and_public_urls() {
    let server = TestServer::new().await;
    let (status, body) = json_request(
        &server.router,
        "POST",
        "/api/audio/upload",
        Some(json!({"fileName": "audio/psalm23.mp3"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["publicUrl"],
        "https://cdn.test.invalid/audio/psalm23.mp3"
    );
    assert!(
        body["uploadUrl"]
            .as_str()
            .unwrap()
            .starts_with("https://signed.test.invalid/audio/psalm23.mp3")
    );
    assert_eq!(body["expiresIn"], 3600);
}

#[tokio::test]
async fn upload_mediator_issues_no_write() {
    let server = TestServer::new().await;
    json_request(
        &server.router,
        "POST",
        "/api/audio/upload",
        Some(json!({"fileName": "audio/unwritten.mp3"})),
    )
    .await;

    assert!(!server.storage.exists("audio/unwritten.mp3").await.unwrap());
}

#[tokio::test]
async fn upload_mediator_rejects_empty_file_name() {
    let server = TestServer::new().await;
    let (status, _) = json_request(
        &server.router,
        "POST",
        "/api/audio/upload",
        Some(json!({"fileName": ""})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn direct_upload_is_last_write_wins() {
    let server = TestServer::new().await;

    for payload in ["Zmlyc3Q=", "c2Vjb25k"] {
        let (status, _) = json_request(
            &server.router,
            "POST",
            "/api/file/upload",
            Some(json!({"fileName": "cover.png", "fileBase64": payload})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let data = server.storage.get("cover.png").await.unwrap();
    assert_eq!(data.as_ref(), b"second");
}

#[tokio::test]
async fn direct_upload_records_content_type() {
    let server = TestServer::new().await;
    json_request(
        &server.router,
        "POST",
        "/api/file/upload",
        Some(json!({
            "fileName": "cover.jpg",
            "fileBase64": "aGk=",
            "contentType": "image/jpeg",
        })),
    )
    .await;

    let meta = server.storage.head("cover.jpg").await.unwrap();
    assert_eq!(meta.content_type.as_deref(), Some("image/jpeg"));
}

#[tokio::test]
async fn direct_upload_missing_payload_is_400() {
    let server = TestServer::new().await;
    let (status, body) = json_request(
        &server.router,
        "POST",
        "/api/file/upload",
        Some(json!({"fileName": "a.mp3"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn direct_upload_over_body_limit_is_400() {
    let server = TestServer::with_config(|c| c.server.max_body_bytes = 256).await;

    use base64::Engine;
    let payload = base64::engine::general_purpose::STANDARD.encode(vec![0u8; 1024]);
    let (status, body) = json_request(
        &server.router,
        "POST",
        "/api/file/upload",
        Some(json!({"fileName": "big.bin", "fileBase64": payload})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(!server.storage.exists("big.bin").await.unwrap());
}

#[tokio::test]
async fn direct_upload_invalid_base64_is_400() {
    let server = TestServer::new().await;
    let (status, _) = json_request(
        &server.router,
        "POST",
        "/api/file/upload",
        Some(json!({"fileName": "a.mp3", "fileBase64": "not@@base64!!"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bible_metadata_requires_numeric_params() {
    let server = TestServer::new().await;

    let (status, _) =
        json_request(&server.router, "GET", "/api/bible/audio-metadata", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = json_request(
        &server.router,
        "GET",
        "/api/bible/audio-metadata?book_id=abc&chapter=1",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = json_request(
        &server.router,
        "GET",
        "/api/bible/audio-metadata?book_id=1",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bible_metadata_missing_row_is_404() {
    let server = TestServer::new().await;
    let (status, body) = json_request(
        &server.router,
        "GET",
        "/api/bible/audio-metadata?book_id=999&chapter=999",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn bible_metadata_returns_seeded_row() {
    let server = TestServer::new().await;
    seed_bible_audio(&server, 43, 3, "https://cdn.test.invalid/bible/43/3.mp3").await;

    let (status, body) = json_request(
        &server.router,
        "GET",
        "/api/bible/audio-metadata?book_id=43&chapter=3",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["audio_url"], "https://cdn.test.invalid/bible/43/3.mp3");
    assert_eq!(body["duration"], 123.5);
    assert_eq!(body["verse_timings"][0]["verse"], 1);
    assert!(body["created_at"].as_str().unwrap().contains('T'));
}

#[tokio::test]
async fn bible_metadata_empty_audio_url_is_404() {
    let server = TestServer::new().await;
    seed_bible_audio(&server, 1, 1, "").await;

    let (status, _) = json_request(
        &server.router,
        "GET",
        "/api/bible/audio-metadata?book_id=1&chapter=1",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cors_preflight_returns_200_with_headers() {
    let server = TestServer::new().await;

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/audio/check")
        .header("Origin", "https://app.test.invalid")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();
    let response = server.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert!(
        headers["access-control-allow-methods"]
            .to_str()
            .unwrap()
            .contains("POST")
    );
    assert!(
        headers["access-control-allow-headers"]
            .to_str()
            .unwrap()
            .to_ascii_lowercase()
            .contains("content-type")
    );
}

#[tokio::test]
async fn wrong_method_is_405() {
    let server = TestServer::new().await;
    let (status, _) = json_request(&server.router, "GET", "/api/audio/check", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn unknown_path_is_404_envelope() {
    let server = TestServer::new().await;
    let (status, body) = json_request(&server.router, "GET", "/api/no-such-thing", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn metrics_endpoint_respects_config() {
    let enabled = TestServer::new().await;
    let request = Request::builder()
        .method("GET")
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let response = enabled.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let disabled = TestServer::with_config(|c| c.server.metrics_enabled = false).await;
    let request = Request::builder()
        .method("GET")
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let response = disabled.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
