use axum::Router;
use shared_types::{
    // Error types
    AppError, AppErrorKind,
    // Auth & user types
    LoginRequest, LoginResponse, RegisterRequest, UserResponse, UserRole,
    // Case types
    AssignRequest, CaseNote, CaseParty, CaseResponse, CreateCaseNoteRequest, CreateCaseRequest,
    CreatePartyRequest, HearingResponse, ScheduleHearingRequest, TimelineEntryResponse,
    TransferRequestBody, UpdateDraftRequest, VerdictRequest,
    // Evidence types
    CustodyEntryResponse, EvidenceResponse, SubmitAnalysisRequest,
    // Activity types
    ActivityLogResponse, ActivitySearchResponse,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::db::AppState;
use crate::health;
use crate::rest;

/// OpenAPI documentation for the API.
#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        rest::auth::register,
        rest::auth::login,
        // Cases
        rest::case::create_case,
        rest::case::list_cases,
        rest::case::get_case,
        rest::case::update_draft,
        rest::case::submit_case,
        rest::case::request_transfer,
        rest::case::approve_transfer,
        rest::case::reject_transfer,
        rest::case::assign_forensic,
        rest::case::assign_judge,
        rest::case::approve_case,
        rest::case::submit_verdict,
        rest::case::schedule_hearing,
        rest::case::list_hearings,
        rest::case::case_timeline,
        rest::case::add_case_note,
        rest::case::list_case_notes,
        rest::case::add_case_party,
        rest::case::list_case_parties,
        // Evidence
        rest::evidence::upload_evidence,
        rest::evidence::list_case_evidence,
        rest::evidence::get_evidence,
        rest::evidence::submit_analysis,
        rest::evidence::mark_immutable,
        rest::evidence::custody_chain,
        // Admin
        rest::admin::list_users,
        rest::admin::approve_user,
        rest::admin::suspend_user,
        rest::admin::search_activity,
    ),
    components(schemas(
        AppError, AppErrorKind,
        RegisterRequest, LoginRequest, LoginResponse, UserResponse, UserRole,
        CreateCaseRequest, UpdateDraftRequest, TransferRequestBody, AssignRequest,
        VerdictRequest, ScheduleHearingRequest, CreateCaseNoteRequest, CreatePartyRequest,
        CaseResponse, TimelineEntryResponse, HearingResponse, CaseNote, CaseParty,
        SubmitAnalysisRequest, EvidenceResponse, CustodyEntryResponse,
        ActivityLogResponse, ActivitySearchResponse,
        health::HealthResponse,
    )),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "cases", description = "Case lifecycle management"),
        (name = "evidence", description = "Evidence upload, analysis and custody chain"),
        (name = "admin", description = "User administration and activity log"),
        (name = "health", description = "Health check endpoint")
    ),
    info(
        title = "Custodia API",
        description = "Digital evidence and case custody management system",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

/// Build an Axum router that serves the API docs at `/docs`
/// and the REST API at `/api/*`.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .merge(rest::api_router())
        .route("/health", axum::routing::get(health::health_check))
        .with_state(state)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
}
