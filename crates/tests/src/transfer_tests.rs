use axum::http::StatusCode;
use serde_json::json;

use crate::common::{post_empty, post_json, seed_case, seed_user, test_app};

#[tokio::test]
async fn transfer_request_and_approval_move_the_case() {
    let Some((app, _pool, _guard)) = test_app().await else { return };
    let (_, police) = seed_user(&app, "officer_diaz", "POLICE").await;
    let (_, admin) = seed_user(&app, "registrar", "ADMIN").await;

    let case = seed_case(&app, &police, "Stolen vehicle", false).await;
    let id = case["id"].as_str().unwrap().to_string();
    assert_eq!(case["police_station"], "Central Station");

    let body = json!({ "to_station": "North Station", "reason": "Jurisdiction" });
    let (status, resp) =
        post_json(&app, &format!("/api/cases/{id}/transfer"), &body, Some(&police)).await;
    assert_eq!(status, StatusCode::OK, "{resp}");
    assert_eq!(resp["transfer_status"], "PENDING");
    assert_eq!(resp["transfer_to_station"], "North Station");

    let (status, resp) =
        post_empty(&app, &format!("/api/cases/{id}/transfer/approve"), Some(&admin)).await;
    assert_eq!(status, StatusCode::OK, "{resp}");
    assert_eq!(resp["transfer_status"], "APPROVED");
    assert_eq!(resp["police_station"], "North Station");
}

#[tokio::test]
async fn rejected_transfer_keeps_the_station() {
    let Some((app, _pool, _guard)) = test_app().await else { return };
    let (_, police) = seed_user(&app, "officer_diaz", "POLICE").await;
    let (_, admin) = seed_user(&app, "registrar", "ADMIN").await;

    let case = seed_case(&app, &police, "Stolen vehicle", false).await;
    let id = case["id"].as_str().unwrap().to_string();

    let body = json!({ "to_station": "North Station" });
    post_json(&app, &format!("/api/cases/{id}/transfer"), &body, Some(&police)).await;

    let (status, resp) =
        post_empty(&app, &format!("/api/cases/{id}/transfer/reject"), Some(&admin)).await;
    assert_eq!(status, StatusCode::OK, "{resp}");
    assert_eq!(resp["transfer_status"], "REJECTED");
    assert_eq!(resp["police_station"], "Central Station");
}

#[tokio::test]
async fn duplicate_transfer_request_conflicts() {
    let Some((app, _pool, _guard)) = test_app().await else { return };
    let (_, police) = seed_user(&app, "officer_diaz", "POLICE").await;

    let case = seed_case(&app, &police, "Stolen vehicle", false).await;
    let id = case["id"].as_str().unwrap().to_string();

    let body = json!({ "to_station": "North Station" });
    let (status, _) =
        post_json(&app, &format!("/api/cases/{id}/transfer"), &body, Some(&police)).await;
    assert_eq!(status, StatusCode::OK);

    let body = json!({ "to_station": "South Station" });
    let (status, resp) =
        post_json(&app, &format!("/api/cases/{id}/transfer"), &body, Some(&police)).await;
    assert_eq!(status, StatusCode::CONFLICT, "{resp}");
}

#[tokio::test]
async fn resolving_without_a_pending_request_conflicts() {
    let Some((app, _pool, _guard)) = test_app().await else { return };
    let (_, police) = seed_user(&app, "officer_diaz", "POLICE").await;
    let (_, admin) = seed_user(&app, "registrar", "ADMIN").await;

    let case = seed_case(&app, &police, "Stolen vehicle", false).await;
    let id = case["id"].as_str().unwrap().to_string();

    let (status, _) =
        post_empty(&app, &format!("/api/cases/{id}/transfer/approve"), Some(&admin)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // A resolved request cannot be resolved twice.
    let body = json!({ "to_station": "North Station" });
    post_json(&app, &format!("/api/cases/{id}/transfer"), &body, Some(&police)).await;
    post_empty(&app, &format!("/api/cases/{id}/transfer/reject"), Some(&admin)).await;
    let (status, _) =
        post_empty(&app, &format!("/api/cases/{id}/transfer/approve"), Some(&admin)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn only_admin_resolves_and_only_owner_requests() {
    let Some((app, _pool, _guard)) = test_app().await else { return };
    let (_, police) = seed_user(&app, "officer_diaz", "POLICE").await;
    let (_, other_police) = seed_user(&app, "officer_kim", "POLICE").await;

    let case = seed_case(&app, &police, "Stolen vehicle", false).await;
    let id = case["id"].as_str().unwrap().to_string();

    // Another officer cannot request a transfer of someone else's case.
    let body = json!({ "to_station": "North Station" });
    let (status, _) =
        post_json(&app, &format!("/api/cases/{id}/transfer"), &body, Some(&other_police)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The requesting officer cannot resolve their own request.
    post_json(&app, &format!("/api/cases/{id}/transfer"), &body, Some(&police)).await;
    let (status, _) =
        post_empty(&app, &format!("/api/cases/{id}/transfer/approve"), Some(&police)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
