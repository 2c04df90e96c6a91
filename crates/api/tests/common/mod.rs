#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{Duration, TimeZone, Utc};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use careerkey_api::auth::jwt::JwtConfig;
use careerkey_api::config::ServerConfig;
use careerkey_api::router::build_app_router;
use careerkey_api::state::AppState;
use careerkey_db::models::company::{Company, CreateCompany};
use careerkey_db::models::time_slot::{CreateTimeSlot, TimeSlot};
use careerkey_db::repositories::{CompanyRepo, TimeSlotRepo};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        password_min_length: 8,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router (same middleware stack as production)
/// over the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Sign up through the API and return the session JSON.
pub async fn signup(
    pool: &PgPool,
    email: &str,
    role: Option<&str>,
    display_name: Option<&str>,
) -> serde_json::Value {
    let body = serde_json::json!({
        "email": email,
        "password": "expo-password-1",
        "role": role,
        "display_name": display_name,
    });
    let response = post_json(build_test_app(pool.clone()), "/api/v1/auth/signup", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

pub async fn seed_company(pool: &PgPool, name: &str) -> Company {
    CompanyRepo::create(
        pool,
        &CreateCompany {
            company_name: name.to_string(),
        },
    )
    .await
    .expect("company creation should succeed")
}

/// Seed a 30-minute slot starting `offset_mins` after 2024-03-01 14:00 UTC.
pub async fn seed_slot(pool: &PgPool, company: &Company, offset_mins: i64, capacity: i32) -> TimeSlot {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 14, 0, 0).unwrap() + Duration::minutes(offset_mins);
    TimeSlotRepo::create(
        pool,
        &CreateTimeSlot {
            company_id: company.id,
            start_time: start,
            end_time: start + Duration::minutes(30),
            capacity,
        },
    )
    .await
    .expect("slot creation should succeed")
}
