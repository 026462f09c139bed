use axum::http::StatusCode;
use serde_json::json;

use crate::common::{get, post_empty, post_json, seed_case, seed_user, test_app};

#[tokio::test]
async fn full_lifecycle_to_verdict() {
    let Some((app, _pool, _guard)) = test_app().await else { return };
    let (_, police) = seed_user(&app, "officer_diaz", "POLICE").await;
    let (forensic_id, _) = seed_user(&app, "analyst_chen", "FORENSIC").await;
    let (judge_id, judge) = seed_user(&app, "judge_okafor", "JUDGE").await;
    let (_, admin) = seed_user(&app, "registrar", "ADMIN").await;

    let case = seed_case(&app, &police, "Warehouse break-in", false).await;
    let id = case["id"].as_str().unwrap().to_string();

    // Admin routes the case to forensics.
    let body = json!({ "user_id": forensic_id });
    let (status, resp) =
        post_json(&app, &format!("/api/cases/{id}/assign-forensic"), &body, Some(&admin)).await;
    assert_eq!(status, StatusCode::OK, "{resp}");
    assert_eq!(resp["status"], "IN_FORENSIC_ANALYSIS");

    // Then to a judge for hearing.
    let body = json!({ "user_id": judge_id });
    let (status, resp) =
        post_json(&app, &format!("/api/cases/{id}/assign-judge"), &body, Some(&admin)).await;
    assert_eq!(status, StatusCode::OK, "{resp}");
    assert_eq!(resp["status"], "HEARING");

    // The assigned judge schedules a hearing.
    let body = json!({ "date": "2026-09-14", "time": "10:30", "location": "Courtroom 2" });
    let (status, resp) =
        post_json(&app, &format!("/api/cases/{id}/hearings"), &body, Some(&judge)).await;
    assert_eq!(status, StatusCode::CREATED, "{resp}");
    assert!(resp["scheduled_at"].as_str().unwrap().starts_with("2026-09-14T10:30"));

    // Verdict closes the case.
    let body = json!({ "decision": "GUILTY", "summary": "Convicted on all counts" });
    let (status, resp) =
        post_json(&app, &format!("/api/cases/{id}/verdict"), &body, Some(&judge)).await;
    assert_eq!(status, StatusCode::OK, "{resp}");
    assert_eq!(resp["status"], "CLOSED");
    assert_eq!(resp["verdict_decision"], "GUILTY");
    assert!(resp["closed_at"].as_str().is_some());

    // The timeline recorded every hop in order.
    let (_, timeline) = get(&app, &format!("/api/cases/{id}/timeline"), Some(&judge)).await;
    let statuses: Vec<&str> = timeline
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["status"].as_str().unwrap())
        .collect();
    assert_eq!(
        statuses,
        vec!["REGISTERED", "IN_FORENSIC_ANALYSIS", "HEARING", "HEARING", "CLOSED"]
    );
}

#[tokio::test]
async fn closed_case_rejects_every_action() {
    let Some((app, _pool, _guard)) = test_app().await else { return };
    let (_, police) = seed_user(&app, "officer_diaz", "POLICE").await;
    let (judge_id, judge) = seed_user(&app, "judge_okafor", "JUDGE").await;
    let (forensic_id, _) = seed_user(&app, "analyst_chen", "FORENSIC").await;
    let (_, admin) = seed_user(&app, "registrar", "ADMIN").await;

    let case = seed_case(&app, &police, "Warehouse break-in", false).await;
    let id = case["id"].as_str().unwrap().to_string();

    let body = json!({ "user_id": judge_id });
    post_json(&app, &format!("/api/cases/{id}/assign-judge"), &body, Some(&admin)).await;
    let body = json!({ "decision": "NOT_GUILTY" });
    let (status, _) =
        post_json(&app, &format!("/api/cases/{id}/verdict"), &body, Some(&judge)).await;
    assert_eq!(status, StatusCode::OK);

    // Everything after the verdict conflicts.
    let body = json!({ "user_id": forensic_id });
    let (status, _) =
        post_json(&app, &format!("/api/cases/{id}/assign-forensic"), &body, Some(&admin)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let body = json!({ "decision": "GUILTY" });
    let (status, _) =
        post_json(&app, &format!("/api/cases/{id}/verdict"), &body, Some(&judge)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = post_empty(&app, &format!("/api/cases/{id}/approve"), Some(&admin)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let body = json!({ "to_station": "North Station" });
    let (status, _) =
        post_json(&app, &format!("/api/cases/{id}/transfer"), &body, Some(&police)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn approve_without_ledger_moves_status_locally() {
    let Some((app, _pool, _guard)) = test_app().await else { return };
    let (_, police) = seed_user(&app, "officer_diaz", "POLICE").await;
    let (_, admin) = seed_user(&app, "registrar", "ADMIN").await;

    let case = seed_case(&app, &police, "Warehouse break-in", false).await;
    let id = case["id"].as_str().unwrap().to_string();

    let (status, resp) = post_empty(&app, &format!("/api/cases/{id}/approve"), Some(&admin)).await;
    assert_eq!(status, StatusCode::OK, "{resp}");
    assert_eq!(resp["status"], "APPROVED");
    assert!(resp.get("approval_tx_hash").is_none());
}

#[tokio::test]
async fn only_the_assigned_judge_may_rule() {
    let Some((app, _pool, _guard)) = test_app().await else { return };
    let (_, police) = seed_user(&app, "officer_diaz", "POLICE").await;
    let (judge_id, _) = seed_user(&app, "judge_okafor", "JUDGE").await;
    let (_, other_judge) = seed_user(&app, "judge_laurent", "JUDGE").await;
    let (_, admin) = seed_user(&app, "registrar", "ADMIN").await;

    let case = seed_case(&app, &police, "Warehouse break-in", false).await;
    let id = case["id"].as_str().unwrap().to_string();

    let body = json!({ "user_id": judge_id });
    post_json(&app, &format!("/api/cases/{id}/assign-judge"), &body, Some(&admin)).await;

    let body = json!({ "decision": "GUILTY" });
    let (status, _) =
        post_json(&app, &format!("/api/cases/{id}/verdict"), &body, Some(&other_judge)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn hearing_rejects_malformed_date() {
    let Some((app, _pool, _guard)) = test_app().await else { return };
    let (_, police) = seed_user(&app, "officer_diaz", "POLICE").await;
    let (judge_id, judge) = seed_user(&app, "judge_okafor", "JUDGE").await;
    let (_, admin) = seed_user(&app, "registrar", "ADMIN").await;

    let case = seed_case(&app, &police, "Warehouse break-in", false).await;
    let id = case["id"].as_str().unwrap().to_string();
    let body = json!({ "user_id": judge_id });
    post_json(&app, &format!("/api/cases/{id}/assign-judge"), &body, Some(&admin)).await;

    let body = json!({ "date": "14/09/2026", "time": "10:30" });
    let (status, resp) =
        post_json(&app, &format!("/api/cases/{id}/hearings"), &body, Some(&judge)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{resp}");
    assert!(resp["field_errors"].get("date").is_some());
}

#[tokio::test]
async fn hearing_scheduling_requires_the_hearing_phase() {
    let Some((app, _pool, _guard)) = test_app().await else { return };
    let (_, police) = seed_user(&app, "officer_diaz", "POLICE").await;
    let (judge_id, judge) = seed_user(&app, "judge_okafor", "JUDGE").await;
    let (_, admin) = seed_user(&app, "registrar", "ADMIN").await;

    let case = seed_case(&app, &police, "Warehouse break-in", false).await;
    let id = case["id"].as_str().unwrap().to_string();
    let hearing = json!({ "date": "2026-09-14", "time": "10:30", "location": "Courtroom 2" });

    // No judge assigned yet, so the caller has no standing.
    let (status, _) =
        post_json(&app, &format!("/api/cases/{id}/hearings"), &hearing, Some(&judge)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let body = json!({ "user_id": judge_id });
    post_json(&app, &format!("/api/cases/{id}/assign-judge"), &body, Some(&admin)).await;

    let body = json!({ "decision": "GUILTY", "summary": "Convicted on all counts" });
    let (status, _) =
        post_json(&app, &format!("/api/cases/{id}/verdict"), &body, Some(&judge)).await;
    assert_eq!(status, StatusCode::OK);

    // The case left the hearing phase when it closed.
    let (status, resp) =
        post_json(&app, &format!("/api/cases/{id}/hearings"), &hearing, Some(&judge)).await;
    assert_eq!(status, StatusCode::CONFLICT, "{resp}");
}

#[tokio::test]
async fn assignment_requires_matching_role() {
    let Some((app, _pool, _guard)) = test_app().await else { return };
    let (_, police) = seed_user(&app, "officer_diaz", "POLICE").await;
    let (judge_id, _) = seed_user(&app, "judge_okafor", "JUDGE").await;
    let (_, admin) = seed_user(&app, "registrar", "ADMIN").await;

    let case = seed_case(&app, &police, "Warehouse break-in", false).await;
    let id = case["id"].as_str().unwrap().to_string();

    // A judge cannot be assigned as the forensic analyst.
    let body = json!({ "user_id": judge_id });
    let (status, resp) =
        post_json(&app, &format!("/api/cases/{id}/assign-forensic"), &body, Some(&admin)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{resp}");
}
