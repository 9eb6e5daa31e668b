//! End-to-end tests for the verification upload API.
//!
//! Each test builds the full router against a temporary vault and an
//! in-memory database, then drives it with `tower::ServiceExt::oneshot`.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use articora_api::auth::Claims;
use articora_api::setup::routes::setup_routes;
use articora_api::setup::services::initialize_services;
use articora_core::Config;
use articora_db::init_schema;

const JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";
const KEY_HEX: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";
const BOUNDARY: &str = "articora-test-boundary";

const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D,
];
const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];

struct TestApp {
    _dir: TempDir,
    router: Router,
}

async fn spawn_app(encryption_key: Option<&str>) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        server_port: 0,
        database_url: "sqlite::memory:".to_string(),
        db_max_connections: 1,
        db_timeout_seconds: 5,
        jwt_secret: JWT_SECRET.to_string(),
        encryption_key: encryption_key.map(String::from),
        storage_dir: dir.path().join("vault"),
        sweep_interval_secs: 3600,
        environment: "test".to_string(),
    };

    // In-memory SQLite needs a single connection or each one gets its own database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    init_schema(&pool).await.unwrap();

    let state = initialize_services(config, pool).await.unwrap();
    state.sweeper.stop();
    let router = setup_routes(state);

    TestApp { _dir: dir, router }
}

fn bearer_token(user_id: Uuid) -> String {
    let claims = Claims {
        sub: user_id,
        exp: usize::MAX,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap();
    format!("Bearer {}", token)
}

fn multipart_body(kind: &str, filename: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"document_kind\"\r\n\r\n{kind}\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"document\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(auth: Option<&str>, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/v0/verification/documents")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body)).unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app(Some(KEY_HEX)).await;
    let response = app
        .router
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_upload_requires_auth() {
    let app = spawn_app(Some(KEY_HEX)).await;
    let body = multipart_body("identity", "id.png", PNG_BYTES);

    let response = app.router.oneshot(upload_request(None, body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = json_body(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_upload_rejects_bad_token() {
    let app = spawn_app(Some(KEY_HEX)).await;
    let body = multipart_body("identity", "id.png", PNG_BYTES);

    let response = app
        .router
        .oneshot(upload_request(Some("Bearer not.a.token"), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_upload_identity_png_returns_receipt() {
    let app = spawn_app(Some(KEY_HEX)).await;
    let user_id = Uuid::new_v4();
    let body = multipart_body("identity", "id.png", PNG_BYTES);

    let response = app
        .router
        .oneshot(upload_request(Some(&bearer_token(user_id)), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["document_kind"], "identity");
    assert!(json["id"].as_str().is_some());

    // The receipt never exposes where or how the ciphertext is stored
    assert!(json.get("storage_path").is_none());
    assert!(json.get("iv_hex").is_none());

    let uploaded_at: DateTime<Utc> = json["uploaded_at"].as_str().unwrap().parse().unwrap();
    let expires_at: DateTime<Utc> = json["expires_at"].as_str().unwrap().parse().unwrap();
    assert_eq!(expires_at - uploaded_at, Duration::hours(72));
}

#[tokio::test]
async fn test_upload_rejects_unknown_kind() {
    let app = spawn_app(Some(KEY_HEX)).await;
    let body = multipart_body("selfie", "me.png", PNG_BYTES);

    let response = app
        .router
        .oneshot(upload_request(Some(&bearer_token(Uuid::new_v4())), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["code"], "INVALID_DOCUMENT_KIND");
}

#[tokio::test]
async fn test_upload_rejects_unknown_file_type() {
    let app = spawn_app(Some(KEY_HEX)).await;
    let body = multipart_body("identity", "anim.gif", b"GIF89a trailing data");

    let response = app
        .router
        .oneshot(upload_request(Some(&bearer_token(Uuid::new_v4())), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["code"], "UNSUPPORTED_MIME_TYPE");
}

#[tokio::test]
async fn test_upload_rejects_oversize_identity() {
    let app = spawn_app(Some(KEY_HEX)).await;
    let mut data = JPEG_BYTES.to_vec();
    data.resize(3 * 1024 * 1024 + 1, 0);
    let body = multipart_body("identity", "big.jpg", &data);

    let response = app
        .router
        .oneshot(upload_request(Some(&bearer_token(Uuid::new_v4())), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let json = json_body(response).await;
    assert_eq!(json["code"], "FILE_TOO_LARGE");
}

#[tokio::test]
async fn test_upload_missing_document_field() {
    let app = spawn_app(Some(KEY_HEX)).await;
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"document_kind\"\r\n\r\nidentity\r\n--{BOUNDARY}--\r\n"
        )
        .as_bytes(),
    );

    let response = app
        .router
        .oneshot(upload_request(Some(&bearer_token(Uuid::new_v4())), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_upload_disabled_without_key() {
    let app = spawn_app(None).await;
    let body = multipart_body("identity", "id.png", PNG_BYTES);

    let response = app
        .router
        .oneshot(upload_request(Some(&bearer_token(Uuid::new_v4())), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = json_body(response).await;
    assert_eq!(json["code"], "ENCRYPTION_KEY_MISSING");
    assert_eq!(json["error"], "Document uploads are temporarily unavailable");
}

#[tokio::test]
async fn test_upload_disabled_with_short_key() {
    // A decodable key of the wrong length also disables uploads
    let app = spawn_app(Some("00112233")).await;
    let body = multipart_body("identity", "id.png", PNG_BYTES);

    let response = app
        .router
        .oneshot(upload_request(Some(&bearer_token(Uuid::new_v4())), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = json_body(response).await;
    assert_eq!(json["code"], "ENCRYPTION_KEY_INVALID");
}

#[tokio::test]
async fn test_list_shows_only_own_documents() {
    let app = spawn_app(Some(KEY_HEX)).await;
    let owner = Uuid::new_v4();
    let other = Uuid::new_v4();

    let body = multipart_body("certificate", "diploma.pdf", b"%PDF-1.4 content");
    let response = app
        .router
        .clone()
        .oneshot(upload_request(Some(&bearer_token(owner)), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let list = |token: String| {
        let router = app.router.clone();
        async move {
            let response = router
                .oneshot(
                    Request::builder()
                        .uri("/api/v0/verification/documents")
                        .header(header::AUTHORIZATION, token)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            json_body(response).await
        }
    };

    let own = list(bearer_token(owner)).await;
    assert_eq!(own.as_array().unwrap().len(), 1);
    assert_eq!(own[0]["document_kind"], "certificate");

    let others = list(bearer_token(other)).await;
    assert_eq!(others.as_array().unwrap().len(), 0);
}
