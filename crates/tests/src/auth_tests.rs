use axum::http::StatusCode;
use serde_json::json;

use crate::common::{post_json, seed_user, test_app};

#[tokio::test]
async fn register_issues_role_scoped_badge() {
    let Some((app, _pool, _guard)) = test_app().await else { return };

    let body = json!({
        "username": "officer_diaz",
        "password": "correct-horse-battery",
        "role": "POLICE",
    });
    let (status, resp) = post_json(&app, "/api/auth/register", &body, None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(resp["username"], "officer_diaz");
    assert_eq!(resp["role"], "POLICE");
    assert!(resp["badge_id"].as_str().unwrap().starts_with("POL-"));
    assert_eq!(resp["is_verified"], false);
    assert!(resp.get("password_hash").is_none());
}

#[tokio::test]
async fn register_rejects_unknown_role() {
    let Some((app, _pool, _guard)) = test_app().await else { return };

    let body = json!({
        "username": "sneaky",
        "password": "correct-horse-battery",
        "role": "SUPERUSER",
    });
    let (status, resp) = post_json(&app, "/api/auth/register", &body, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(resp["message"].as_str().unwrap().contains("Invalid role"));
}

#[tokio::test]
async fn register_duplicate_username_conflicts() {
    let Some((app, _pool, _guard)) = test_app().await else { return };

    seed_user(&app, "officer_diaz", "POLICE").await;

    let body = json!({
        "username": "officer_diaz",
        "password": "another-password-8",
        "role": "JUDGE",
    });
    let (status, _) = post_json(&app, "/api/auth/register", &body, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn login_rejects_bad_password() {
    let Some((app, _pool, _guard)) = test_app().await else { return };

    seed_user(&app, "officer_diaz", "POLICE").await;

    let body = json!({ "username": "officer_diaz", "password": "wrong" });
    let (status, _) = post_json(&app, "/api/auth/login", &body, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_rebinds_wallet_address() {
    let Some((app, _pool, _guard)) = test_app().await else { return };

    seed_user(&app, "officer_diaz", "POLICE").await;

    let body = json!({
        "username": "officer_diaz",
        "password": "correct-horse-battery",
        "wallet_address": "0x00000000219ab540356cBB839Cbe05303d7705Fa",
    });
    let (status, resp) = post_json(&app, "/api/auth/login", &body, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        resp["user"]["wallet_address"],
        "0x00000000219ab540356cBB839Cbe05303d7705Fa"
    );

    // Last write wins on the next login.
    let body = json!({
        "username": "officer_diaz",
        "password": "correct-horse-battery",
        "wallet_address": "0xBE0eB53F46cd790Cd13851d5EFf43D12404d33E8",
    });
    let (status, resp) = post_json(&app, "/api/auth/login", &body, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        resp["user"]["wallet_address"],
        "0xBE0eB53F46cd790Cd13851d5EFf43D12404d33E8"
    );
}

#[tokio::test]
async fn suspended_user_cannot_login() {
    let Some((app, pool, _guard)) = test_app().await else { return };

    let (user_id, _) = seed_user(&app, "officer_diaz", "POLICE").await;
    server::repo::user::set_suspended(&pool, user_id, true)
        .await
        .unwrap();

    let body = json!({ "username": "officer_diaz", "password": "correct-horse-battery" });
    let (status, _) = post_json(&app, "/api/auth/login", &body, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unauthenticated_listing_is_rejected() {
    let Some((app, _pool, _guard)) = test_app().await else { return };

    let (status, _) = crate::common::get(&app, "/api/cases", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
