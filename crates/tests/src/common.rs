use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware, Router,
};
use serde_json::Value;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use tokio::sync::Mutex;
use tower::ServiceExt;

use server::db::AppState;
use server::pinning::{PinningClient, PinningConfig};

/// Global mutex ensuring tests run sequentially against the shared database.
/// Each test acquires this lock before truncating, preventing concurrent
/// tests from interfering with each other's data.
static TEST_MUTEX: std::sync::LazyLock<Mutex<()>> = std::sync::LazyLock::new(|| Mutex::new(()));

/// Build a test router backed by a real Postgres pool.
///
/// Returns None (and the test should bail out) when no database is
/// configured — the suite stays green on machines without Postgres.
/// The returned `MutexGuard` must be held for the duration of the test.
pub async fn test_app() -> Option<(Router, Pool<Postgres>, tokio::sync::MutexGuard<'static, ()>)> {
    let guard = TEST_MUTEX.lock().await;

    let _ = dotenvy::dotenv();
    if std::env::var("JWT_SECRET").is_err() {
        std::env::set_var("JWT_SECRET", "integration-test-secret");
    }

    let Ok(database_url) =
        std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL"))
    else {
        eprintln!("TEST_DATABASE_URL/DATABASE_URL not set — skipping DB-backed test");
        return None;
    };

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    sqlx::query(
        "TRUNCATE users, cases, case_events, hearings, case_notes, case_parties, \
         evidence, custody_log, activity_log CASCADE",
    )
    .execute(&pool)
    .await
    .expect("Failed to truncate");

    // Pinning client pointed at the discard port: every pin or
    // availability call fails fast, which makes the dependency-failure
    // paths deterministic without a network.
    let pinning = PinningClient::new(PinningConfig {
        api_url: "http://127.0.0.1:9".to_string(),
        api_key: None,
        gateway_url: "http://127.0.0.1:9".to_string(),
        timeout: Duration::from_secs(2),
    });

    let state = AppState::new(pool.clone(), pinning, None);

    // Include the permissive auth middleware so the auth extractors see
    // decoded claims when a Bearer token is present.
    let router = server::rest::api_router()
        .route(
            "/health",
            axum::routing::get(server::health::health_check),
        )
        .layer(middleware::from_fn(
            server::auth::middleware::auth_middleware,
        ))
        .with_state(state);

    Some((router, pool, guard))
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

fn with_auth(builder: axum::http::request::Builder, token: Option<&str>) -> axum::http::request::Builder {
    match token {
        Some(t) => builder.header("authorization", format!("Bearer {t}")),
        None => builder,
    }
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    let req = with_auth(Request::builder().method("GET").uri(uri), token)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    body: &Value,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let req = with_auth(Request::builder().method("POST").uri(uri), token)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

pub async fn post_empty(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    let req = with_auth(Request::builder().method("POST").uri(uri), token)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

pub async fn patch_json(
    app: &Router,
    uri: &str,
    body: &Value,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let req = with_auth(Request::builder().method("PATCH").uri(uri), token)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

/// Register a user through the API and log them in. Returns
/// (row UUID, bearer token).
pub async fn seed_user(app: &Router, username: &str, role: &str) -> (uuid::Uuid, String) {
    let body = serde_json::json!({
        "username": username,
        "password": "correct-horse-battery",
        "role": role,
    });
    let (status, resp) = post_json(app, "/api/auth/register", &body, None).await;
    assert_eq!(status, StatusCode::CREATED, "register {username}: {resp}");
    let id = uuid::Uuid::parse_str(resp["id"].as_str().unwrap()).unwrap();

    let login = serde_json::json!({
        "username": username,
        "password": "correct-horse-battery",
    });
    let (status, resp) = post_json(app, "/api/auth/login", &login, None).await;
    assert_eq!(status, StatusCode::OK, "login {username}: {resp}");
    let token = resp["token"].as_str().unwrap().to_string();

    (id, token)
}

/// Register a case through the API as the given officer.
pub async fn seed_case(app: &Router, police_token: &str, title: &str, is_draft: bool) -> Value {
    let body = serde_json::json!({
        "title": title,
        "description": "integration test case",
        "case_number": "FIR-2024-0042",
        "location": "Sector 9",
        "is_draft": is_draft,
        "police_station": "Central Station",
    });
    let (status, resp) = post_json(app, "/api/cases", &body, Some(police_token)).await;
    assert_eq!(status, StatusCode::CREATED, "seed case: {resp}");
    resp
}

/// Insert an evidence row directly, bypassing the pinning service.
pub async fn seed_evidence(
    pool: &Pool<Postgres>,
    case_row_id: uuid::Uuid,
    uploaded_by: uuid::Uuid,
) -> shared_types::Evidence {
    let evidence_id = server::ids::new_evidence_id();
    let evidence = server::repo::evidence::create(
        pool,
        server::repo::evidence::NewEvidence {
            evidence_id: &evidence_id,
            case_id: case_row_id,
            evidence_type: "photo",
            description: "scene photo",
            uploaded_by,
            file_name: "scene.jpg",
            file_size: 2048,
            mime_type: "image/jpeg",
            ipfs_hash: "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG",
            gateway_url: "http://127.0.0.1:9/ipfs/QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG",
            sha256: "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08",
        },
    )
    .await
    .expect("seed evidence");

    server::repo::custody::append(pool, evidence.id, "UPLOADED", uploaded_by, "seeded")
        .await
        .expect("seed custody");

    evidence
}

pub fn row_uuid(resp: &Value) -> uuid::Uuid {
    uuid::Uuid::parse_str(resp["id"].as_str().unwrap()).unwrap()
}
