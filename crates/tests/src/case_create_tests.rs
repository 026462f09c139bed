use axum::http::StatusCode;
use serde_json::json;

use crate::common::{get, post_json, seed_case, seed_user, test_app};

#[tokio::test]
async fn create_case_registers_and_starts_timeline() {
    let Some((app, _pool, _guard)) = test_app().await else { return };
    let (_, police) = seed_user(&app, "officer_diaz", "POLICE").await;

    let resp = seed_case(&app, &police, "Warehouse break-in", false).await;
    assert_eq!(resp["status"], "REGISTERED");
    assert_eq!(resp["is_draft"], false);
    assert_eq!(resp["priority"], "MEDIUM");
    assert!(resp["case_id"].as_str().unwrap().starts_with("CASE-"));
    assert_eq!(resp["police_station"], "Central Station");

    let uri = format!("/api/cases/{}/timeline", resp["id"].as_str().unwrap());
    let (status, timeline) = get(&app, &uri, Some(&police)).await;
    assert_eq!(status, StatusCode::OK);
    let entries = timeline.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["status"], "REGISTERED");
}

#[tokio::test]
async fn create_case_rejects_invalid_priority() {
    let Some((app, _pool, _guard)) = test_app().await else { return };
    let (_, police) = seed_user(&app, "officer_diaz", "POLICE").await;

    let body = json!({
        "title": "Warehouse break-in",
        "description": "x",
        "case_number": "FIR-1",
        "location": "Sector 9",
        "priority": "URGENT",
    });
    let (status, resp) = post_json(&app, "/api/cases", &body, Some(&police)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(resp["message"].as_str().unwrap().contains("Invalid priority"));
}

#[tokio::test]
async fn only_police_can_register_cases() {
    let Some((app, _pool, _guard)) = test_app().await else { return };
    let (_, judge) = seed_user(&app, "judge_okafor", "JUDGE").await;

    let body = json!({
        "title": "Warehouse break-in",
        "description": "x",
        "case_number": "FIR-1",
        "location": "Sector 9",
    });
    let (status, _) = post_json(&app, "/api/cases", &body, Some(&judge)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn case_lookup_works_by_public_id() {
    let Some((app, _pool, _guard)) = test_app().await else { return };
    let (_, police) = seed_user(&app, "officer_diaz", "POLICE").await;

    let resp = seed_case(&app, &police, "Warehouse break-in", false).await;
    let public_id = resp["case_id"].as_str().unwrap();

    let (status, found) = get(&app, &format!("/api/cases/{public_id}"), Some(&police)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["id"], resp["id"]);
}

#[tokio::test]
async fn listing_is_scoped_to_the_caller() {
    let Some((app, _pool, _guard)) = test_app().await else { return };
    let (_, diaz) = seed_user(&app, "officer_diaz", "POLICE").await;
    let (_, varga) = seed_user(&app, "officer_varga", "POLICE").await;
    let (_, admin) = seed_user(&app, "registrar", "ADMIN").await;

    seed_case(&app, &diaz, "Warehouse break-in", false).await;
    seed_case(&app, &varga, "Dockside arson", false).await;

    let (_, mine) = get(&app, "/api/cases", Some(&diaz)).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["title"], "Warehouse break-in");

    let (_, all) = get(&app, "/api/cases", Some(&admin)).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn other_officers_cannot_view_a_case() {
    let Some((app, _pool, _guard)) = test_app().await else { return };
    let (_, diaz) = seed_user(&app, "officer_diaz", "POLICE").await;
    let (_, varga) = seed_user(&app, "officer_varga", "POLICE").await;

    let resp = seed_case(&app, &diaz, "Warehouse break-in", false).await;
    let uri = format!("/api/cases/{}", resp["id"].as_str().unwrap());

    let (status, _) = get(&app, &uri, Some(&varga)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn draft_can_be_edited_then_submitted_once() {
    let Some((app, _pool, _guard)) = test_app().await else { return };
    let (_, police) = seed_user(&app, "officer_diaz", "POLICE").await;

    let draft = seed_case(&app, &police, "Draft case", true).await;
    assert_eq!(draft["status"], "DRAFT");
    let id = draft["id"].as_str().unwrap().to_string();

    let patch = json!({ "title": "Amended title", "priority": "HIGH" });
    let (status, resp) =
        crate::common::patch_json(&app, &format!("/api/cases/{id}/draft"), &patch, Some(&police))
            .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["title"], "Amended title");
    assert_eq!(resp["priority"], "HIGH");

    let (status, resp) =
        crate::common::post_empty(&app, &format!("/api/cases/{id}/submit"), Some(&police)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["status"], "REGISTERED");
    assert_eq!(resp["is_draft"], false);

    // No longer a draft: edits and resubmission both conflict.
    let (status, _) =
        crate::common::patch_json(&app, &format!("/api/cases/{id}/draft"), &patch, Some(&police))
            .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) =
        crate::common::post_empty(&app, &format!("/api/cases/{id}/submit"), Some(&police)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn notes_and_parties_attach_to_a_case() {
    let Some((app, _pool, _guard)) = test_app().await else { return };
    let (_, police) = seed_user(&app, "officer_diaz", "POLICE").await;

    let case = seed_case(&app, &police, "Warehouse break-in", false).await;
    let id = case["id"].as_str().unwrap().to_string();

    let note = json!({ "content": "Forced entry through the loading dock" });
    let (status, _) = post_json(&app, &format!("/api/cases/{id}/notes"), &note, Some(&police)).await;
    assert_eq!(status, StatusCode::CREATED);

    let party = json!({ "kind": "WITNESS", "full_name": "R. Mahto" });
    let (status, _) =
        post_json(&app, &format!("/api/cases/{id}/parties"), &party, Some(&police)).await;
    assert_eq!(status, StatusCode::CREATED);

    let bad_party = json!({ "kind": "BYSTANDER", "full_name": "X" });
    let (status, _) =
        post_json(&app, &format!("/api/cases/{id}/parties"), &bad_party, Some(&police)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, notes) = get(&app, &format!("/api/cases/{id}/notes"), Some(&police)).await;
    assert_eq!(notes.as_array().unwrap().len(), 1);
    let (_, parties) = get(&app, &format!("/api/cases/{id}/parties"), Some(&police)).await;
    assert_eq!(parties.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn draft_creation_is_audited_as_a_draft() {
    let Some((app, pool, _guard)) = test_app().await else { return };
    let (_, police) = seed_user(&app, "officer_diaz", "POLICE").await;

    let case = seed_case(&app, &police, "Warehouse break-in", true).await;
    assert_eq!(case["is_draft"], true);
    let case_ref = case["case_id"].as_str().unwrap().to_string();

    // The audit write runs on a spawned task; wait for it to land.
    let mut row: Option<(String, String)> = None;
    for _ in 0..40 {
        row = sqlx::query_as("SELECT action, description FROM activity_log WHERE case_ref = $1")
            .bind(&case_ref)
            .fetch_optional(&pool)
            .await
            .unwrap();
        if row.is_some() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }

    let (action, description) = row.expect("activity row for the draft");
    assert_eq!(action, "CASE_DRAFTED");
    assert!(description.contains("saved as draft"), "got: {description}");
    assert!(!description.contains("registered"));
}
