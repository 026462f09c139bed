pub mod admin;
pub mod auth;
pub mod case;
pub mod evidence;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::db::AppState;

/// Build the combined REST API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        // Cases
        .route("/api/cases", get(case::list_cases).post(case::create_case))
        .route("/api/cases/{id}", get(case::get_case))
        .route("/api/cases/{id}/draft", patch(case::update_draft))
        .route("/api/cases/{id}/submit", post(case::submit_case))
        .route("/api/cases/{id}/transfer", post(case::request_transfer))
        .route("/api/cases/{id}/transfer/approve", post(case::approve_transfer))
        .route("/api/cases/{id}/transfer/reject", post(case::reject_transfer))
        .route("/api/cases/{id}/assign-forensic", post(case::assign_forensic))
        .route("/api/cases/{id}/assign-judge", post(case::assign_judge))
        .route("/api/cases/{id}/approve", post(case::approve_case))
        .route("/api/cases/{id}/verdict", post(case::submit_verdict))
        .route(
            "/api/cases/{id}/hearings",
            get(case::list_hearings).post(case::schedule_hearing),
        )
        .route("/api/cases/{id}/timeline", get(case::case_timeline))
        .route(
            "/api/cases/{id}/notes",
            get(case::list_case_notes).post(case::add_case_note),
        )
        .route(
            "/api/cases/{id}/parties",
            get(case::list_case_parties).post(case::add_case_party),
        )
        // Evidence
        .route(
            "/api/cases/{id}/evidence",
            get(evidence::list_case_evidence).post(evidence::upload_evidence),
        )
        .route("/api/evidence/{id}", get(evidence::get_evidence))
        .route("/api/evidence/{id}/analysis", post(evidence::submit_analysis))
        .route("/api/evidence/{id}/immutable", post(evidence::mark_immutable))
        .route("/api/evidence/{id}/chain", get(evidence::custody_chain))
        // Admin
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/users/{id}/approve", post(admin::approve_user))
        .route("/api/admin/users/{id}/suspend", post(admin::suspend_user))
        .route("/api/admin/activity", get(admin::search_activity))
}
