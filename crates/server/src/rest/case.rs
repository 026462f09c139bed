use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, NaiveTime};
use std::collections::HashMap;
use uuid::Uuid;

use shared_types::{
    is_valid_case_priority, is_valid_party_kind, AppError, AssignRequest, Case, CaseAction,
    CaseNote, CaseParty, CaseResponse, CaseStatus, CreateCaseNoteRequest, CreateCaseRequest,
    CreatePartyRequest, HearingResponse, ScheduleHearingRequest, TimelineEntryResponse,
    TransferRequestBody, UpdateDraftRequest, UserRole, VerdictRequest, CASE_PRIORITIES,
    PARTY_KINDS,
};

use crate::activity::Activity;
use crate::auth::{AuthRequired, Claims, RoleRequired};
use crate::db::AppState;
use crate::error_convert::ValidateRequest;
use crate::ids;
use crate::repo;

// ── Helpers ────────────────────────────────────────────────────────

/// Resolve a case from a path segment that may be either the row UUID
/// or the public `CASE-...` identifier.
async fn find_case(state: &AppState, id: &str) -> Result<Case, AppError> {
    let found = match Uuid::parse_str(id) {
        Ok(uuid) => repo::case::find_by_id(&state.pool, uuid).await?,
        Err(_) => repo::case::find_by_public_id(&state.pool, id).await?,
    };
    found.ok_or_else(|| AppError::not_found(format!("Case {} not found", id)))
}

/// Role-scoped visibility: police see their own registrations, forensic
/// and judge see their assignments, admin sees everything.
fn can_view(case: &Case, claims: &Claims) -> bool {
    match UserRole::from_str_opt(&claims.role) {
        Some(UserRole::Admin) => true,
        Some(UserRole::Police) => case.registered_by == claims.sub,
        Some(UserRole::Forensic) => case.assigned_forensic == Some(claims.sub),
        Some(UserRole::Judge) => case.assigned_judge == Some(claims.sub),
        None => false,
    }
}

fn require_view(case: &Case, claims: &Claims) -> Result<(), AppError> {
    if can_view(case, claims) {
        Ok(())
    } else {
        Err(AppError::forbidden("Not a participant in this case"))
    }
}

fn require_owner(case: &Case, claims: &Claims) -> Result<(), AppError> {
    if case.registered_by == claims.sub {
        Ok(())
    } else {
        Err(AppError::forbidden("Only the registering officer may do this"))
    }
}

fn check_priority(priority: Option<&str>) -> Result<(), AppError> {
    if let Some(p) = priority {
        if !is_valid_case_priority(p) {
            return Err(AppError::bad_request(format!(
                "Invalid priority: {}. Valid values: {}",
                p,
                CASE_PRIORITIES.join(", ")
            )));
        }
    }
    Ok(())
}

// ── Case CRUD ──────────────────────────────────────────────────────

/// POST /api/cases
#[utoipa::path(
    post,
    path = "/api/cases",
    request_body = CreateCaseRequest,
    responses(
        (status = 201, description = "Case registered", body = CaseResponse),
        (status = 400, description = "Invalid request", body = AppError),
        (status = 403, description = "Police role required", body = AppError)
    ),
    tag = "cases"
)]
pub async fn create_case(
    State(state): State<AppState>,
    RoleRequired(claims): RoleRequired<1>,
    Json(body): Json<CreateCaseRequest>,
) -> Result<(StatusCode, Json<CaseResponse>), AppError> {
    body.validate_request()?;
    check_priority(body.priority.as_deref())?;

    let case_id = ids::new_case_id();
    let case = repo::case::create(&state.pool, &case_id, &body, claims.sub).await?;

    let note = if case.is_draft {
        "Case saved as draft"
    } else {
        "Case registered"
    };
    repo::case_event::append(&state.pool, case.id, &case.status, note, claims.sub).await?;

    if !case.is_draft {
        if let Some(ledger) = &state.ledger {
            ledger.notify_create_case(
                state.pool.clone(),
                case.id,
                case.case_id.clone(),
                case.title.clone(),
            );
        }
    }

    let (action, description) = if case.is_draft {
        (
            "CASE_DRAFTED",
            format!("Case {} saved as draft: {}", case.case_id, case.title),
        )
    } else {
        (
            "CASE_CREATED",
            format!("Case {} registered: {}", case.case_id, case.title),
        )
    };
    state.activity.record(
        Activity::new(claims.sub, &claims.role, action, description).case(&case.case_id),
    );

    Ok((StatusCode::CREATED, Json(CaseResponse::from(case))))
}

/// GET /api/cases
#[utoipa::path(
    get,
    path = "/api/cases",
    responses(
        (status = 200, description = "Cases visible to the caller", body = Vec<CaseResponse>),
        (status = 401, description = "Not authenticated", body = AppError)
    ),
    tag = "cases"
)]
pub async fn list_cases(
    State(state): State<AppState>,
    AuthRequired(claims): AuthRequired,
) -> Result<Json<Vec<CaseResponse>>, AppError> {
    let role = UserRole::from_str_opt(&claims.role)
        .ok_or_else(|| AppError::forbidden("Unknown role"))?;
    let cases = repo::case::list_for(&state.pool, role, claims.sub).await?;
    Ok(Json(cases.into_iter().map(CaseResponse::from).collect()))
}

/// GET /api/cases/{id}
#[utoipa::path(
    get,
    path = "/api/cases/{id}",
    params(("id" = String, Path, description = "Case UUID or public CASE-... id")),
    responses(
        (status = 200, description = "Case found", body = CaseResponse),
        (status = 403, description = "Not a participant", body = AppError),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "cases"
)]
pub async fn get_case(
    State(state): State<AppState>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
) -> Result<Json<CaseResponse>, AppError> {
    let case = find_case(&state, &id).await?;
    require_view(&case, &claims)?;
    Ok(Json(CaseResponse::from(case)))
}

/// PATCH /api/cases/{id}/draft
#[utoipa::path(
    patch,
    path = "/api/cases/{id}/draft",
    request_body = UpdateDraftRequest,
    params(("id" = String, Path, description = "Case UUID or public CASE-... id")),
    responses(
        (status = 200, description = "Draft updated", body = CaseResponse),
        (status = 403, description = "Not the registering officer", body = AppError),
        (status = 409, description = "Case is no longer a draft", body = AppError)
    ),
    tag = "cases"
)]
pub async fn update_draft(
    State(state): State<AppState>,
    RoleRequired(claims): RoleRequired<1>,
    Path(id): Path<String>,
    Json(body): Json<UpdateDraftRequest>,
) -> Result<Json<CaseResponse>, AppError> {
    check_priority(body.priority.as_deref())?;

    let case = find_case(&state, &id).await?;
    require_owner(&case, &claims)?;

    let updated = repo::case::update_draft(&state.pool, case.id, &body)
        .await?
        .ok_or_else(|| AppError::conflict("Case is no longer a draft"))?;

    Ok(Json(CaseResponse::from(updated)))
}

/// POST /api/cases/{id}/submit
#[utoipa::path(
    post,
    path = "/api/cases/{id}/submit",
    params(("id" = String, Path, description = "Case UUID or public CASE-... id")),
    responses(
        (status = 200, description = "Draft submitted", body = CaseResponse),
        (status = 403, description = "Not the registering officer", body = AppError),
        (status = 409, description = "Case is not in a submittable state", body = AppError)
    ),
    tag = "cases"
)]
pub async fn submit_case(
    State(state): State<AppState>,
    RoleRequired(claims): RoleRequired<1>,
    Path(id): Path<String>,
) -> Result<Json<CaseResponse>, AppError> {
    let case = find_case(&state, &id).await?;
    require_owner(&case, &claims)?;

    let case = repo::case::submit_draft(&state.pool, case.id)
        .await?
        .ok_or_else(|| AppError::conflict("Case is not in a submittable state"))?;

    repo::case_event::append(
        &state.pool,
        case.id,
        &case.status,
        "Draft submitted for registration",
        claims.sub,
    )
    .await?;

    // The ledger mirror happens at submission for drafts — creation
    // skipped it while the record was still mutable.
    if let Some(ledger) = &state.ledger {
        ledger.notify_create_case(
            state.pool.clone(),
            case.id,
            case.case_id.clone(),
            case.title.clone(),
        );
    }

    state.activity.record(
        Activity::new(
            claims.sub,
            &claims.role,
            "CASE_SUBMITTED",
            format!("Draft {} submitted", case.case_id),
        )
        .case(&case.case_id),
    );

    Ok(Json(CaseResponse::from(case)))
}

// ── Transfer requests ──────────────────────────────────────────────

/// POST /api/cases/{id}/transfer
#[utoipa::path(
    post,
    path = "/api/cases/{id}/transfer",
    request_body = TransferRequestBody,
    params(("id" = String, Path, description = "Case UUID or public CASE-... id")),
    responses(
        (status = 200, description = "Transfer requested", body = CaseResponse),
        (status = 409, description = "A transfer request is already pending", body = AppError)
    ),
    tag = "cases"
)]
pub async fn request_transfer(
    State(state): State<AppState>,
    RoleRequired(claims): RoleRequired<1>,
    Path(id): Path<String>,
    Json(body): Json<TransferRequestBody>,
) -> Result<Json<CaseResponse>, AppError> {
    body.validate_request()?;

    let case = find_case(&state, &id).await?;
    require_owner(&case, &claims)?;

    let case = repo::case::request_transfer(&state.pool, case.id, &body.to_station, claims.sub)
        .await?
        .ok_or_else(|| AppError::conflict("A transfer request is already pending"))?;

    let reason = body.reason.as_deref().unwrap_or("no reason given");
    repo::case_event::append(
        &state.pool,
        case.id,
        &case.status,
        &format!("Transfer to {} requested ({})", body.to_station, reason),
        claims.sub,
    )
    .await?;

    state.activity.record(
        Activity::new(
            claims.sub,
            &claims.role,
            "TRANSFER_REQUESTED",
            format!("Transfer of {} to {} requested", case.case_id, body.to_station),
        )
        .case(&case.case_id),
    );

    Ok(Json(CaseResponse::from(case)))
}

async fn resolve_transfer(
    state: AppState,
    claims: Claims,
    id: String,
    approve: bool,
) -> Result<Json<CaseResponse>, AppError> {
    let case = find_case(&state, &id).await?;

    let case = repo::case::resolve_transfer(&state.pool, case.id, approve)
        .await?
        .ok_or_else(|| AppError::conflict("No pending transfer request"))?;

    let (note, action) = if approve {
        (
            format!("Transfer approved; case now held by {}", case.police_station),
            "TRANSFER_APPROVED",
        )
    } else {
        ("Transfer request rejected".to_string(), "TRANSFER_REJECTED")
    };
    repo::case_event::append(&state.pool, case.id, &case.status, &note, claims.sub).await?;

    state.activity.record(
        Activity::new(claims.sub, &claims.role, action, note).case(&case.case_id),
    );

    Ok(Json(CaseResponse::from(case)))
}

/// POST /api/cases/{id}/transfer/approve
#[utoipa::path(
    post,
    path = "/api/cases/{id}/transfer/approve",
    params(("id" = String, Path, description = "Case UUID or public CASE-... id")),
    responses(
        (status = 200, description = "Transfer approved", body = CaseResponse),
        (status = 409, description = "No pending transfer request", body = AppError)
    ),
    tag = "cases"
)]
pub async fn approve_transfer(
    State(state): State<AppState>,
    RoleRequired(claims): RoleRequired<4>,
    Path(id): Path<String>,
) -> Result<Json<CaseResponse>, AppError> {
    resolve_transfer(state, claims, id, true).await
}

/// POST /api/cases/{id}/transfer/reject
#[utoipa::path(
    post,
    path = "/api/cases/{id}/transfer/reject",
    params(("id" = String, Path, description = "Case UUID or public CASE-... id")),
    responses(
        (status = 200, description = "Transfer rejected", body = CaseResponse),
        (status = 409, description = "No pending transfer request", body = AppError)
    ),
    tag = "cases"
)]
pub async fn reject_transfer(
    State(state): State<AppState>,
    RoleRequired(claims): RoleRequired<4>,
    Path(id): Path<String>,
) -> Result<Json<CaseResponse>, AppError> {
    resolve_transfer(state, claims, id, false).await
}

// ── Assignments ────────────────────────────────────────────────────

/// POST /api/cases/{id}/assign-forensic
#[utoipa::path(
    post,
    path = "/api/cases/{id}/assign-forensic",
    request_body = AssignRequest,
    params(("id" = String, Path, description = "Case UUID or public CASE-... id")),
    responses(
        (status = 200, description = "Forensic analyst assigned", body = CaseResponse),
        (status = 400, description = "Target user is not a forensic analyst", body = AppError),
        (status = 409, description = "Case status does not allow assignment", body = AppError)
    ),
    tag = "cases"
)]
pub async fn assign_forensic(
    State(state): State<AppState>,
    RoleRequired(claims): RoleRequired<4>,
    Path(id): Path<String>,
    Json(body): Json<AssignRequest>,
) -> Result<Json<CaseResponse>, AppError> {
    let case = find_case(&state, &id).await?;

    let target = repo::user::find_by_id(&state.pool, body.user_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", body.user_id)))?;
    if UserRole::from_str_opt(&target.role) != Some(UserRole::Forensic) {
        return Err(AppError::bad_request(format!(
            "User {} is not a forensic analyst",
            target.username
        )));
    }

    let case = repo::case::assign_forensic(&state.pool, case.id, target.id)
        .await?
        .ok_or_else(|| AppError::conflict("Case status does not allow forensic assignment"))?;

    repo::case_event::append(
        &state.pool,
        case.id,
        &case.status,
        &format!("Assigned to forensic analyst {}", target.username),
        claims.sub,
    )
    .await?;

    state.activity.record(
        Activity::new(
            claims.sub,
            &claims.role,
            "FORENSIC_ASSIGNED",
            format!("{} assigned to case {}", target.username, case.case_id),
        )
        .case(&case.case_id)
        .resource(&target.badge_id),
    );

    Ok(Json(CaseResponse::from(case)))
}

/// POST /api/cases/{id}/assign-judge
#[utoipa::path(
    post,
    path = "/api/cases/{id}/assign-judge",
    request_body = AssignRequest,
    params(("id" = String, Path, description = "Case UUID or public CASE-... id")),
    responses(
        (status = 200, description = "Judge assigned", body = CaseResponse),
        (status = 400, description = "Target user is not a judge", body = AppError),
        (status = 409, description = "Case status does not allow assignment", body = AppError)
    ),
    tag = "cases"
)]
pub async fn assign_judge(
    State(state): State<AppState>,
    RoleRequired(claims): RoleRequired<4>,
    Path(id): Path<String>,
    Json(body): Json<AssignRequest>,
) -> Result<Json<CaseResponse>, AppError> {
    let case = find_case(&state, &id).await?;

    let target = repo::user::find_by_id(&state.pool, body.user_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", body.user_id)))?;
    if UserRole::from_str_opt(&target.role) != Some(UserRole::Judge) {
        return Err(AppError::bad_request(format!(
            "User {} is not a judge",
            target.username
        )));
    }

    let case = repo::case::assign_judge(&state.pool, case.id, target.id)
        .await?
        .ok_or_else(|| AppError::conflict("Case status does not allow judge assignment"))?;

    repo::case_event::append(
        &state.pool,
        case.id,
        &case.status,
        &format!("Assigned to judge {}", target.username),
        claims.sub,
    )
    .await?;

    state.activity.record(
        Activity::new(
            claims.sub,
            &claims.role,
            "JUDGE_ASSIGNED",
            format!("{} assigned to case {}", target.username, case.case_id),
        )
        .case(&case.case_id)
        .resource(&target.badge_id),
    );

    Ok(Json(CaseResponse::from(case)))
}

// ── Approval and verdict ───────────────────────────────────────────

/// POST /api/cases/{id}/approve
///
/// The one blocking ledger path: when mirroring is on, the on-chain
/// `approveCase` transaction must confirm before the local row moves.
#[utoipa::path(
    post,
    path = "/api/cases/{id}/approve",
    params(("id" = String, Path, description = "Case UUID or public CASE-... id")),
    responses(
        (status = 200, description = "Case approved", body = CaseResponse),
        (status = 400, description = "Case was never mirrored on the ledger", body = AppError),
        (status = 409, description = "Case status does not allow approval", body = AppError),
        (status = 502, description = "Ledger transaction failed", body = AppError)
    ),
    tag = "cases"
)]
pub async fn approve_case(
    State(state): State<AppState>,
    RoleRequired(claims): RoleRequired<4>,
    Path(id): Path<String>,
) -> Result<Json<CaseResponse>, AppError> {
    let case = find_case(&state, &id).await?;

    // Cheap precheck so a doomed approval never pays for gas; the SQL
    // guard below is the authoritative one.
    CaseStatus::from_str_opt(&case.status)
        .filter(|s| CaseAction::Approve.permits(*s))
        .ok_or_else(|| AppError::conflict("Case status does not allow approval"))?;

    let tx_hash = match &state.ledger {
        Some(ledger) => {
            let ledger_case_id = case.ledger_case_id.as_deref().ok_or_else(|| {
                AppError::bad_request("Case was never mirrored on the ledger")
            })?;
            Some(ledger.approve_case(ledger_case_id).await?.tx_hash)
        }
        None => None,
    };

    let case = repo::case::approve(&state.pool, case.id, claims.sub, tx_hash.as_deref())
        .await?
        .ok_or_else(|| AppError::conflict("Case status does not allow approval"))?;

    repo::case_event::append(
        &state.pool,
        case.id,
        &case.status,
        "Case approved",
        claims.sub,
    )
    .await?;

    state.activity.record(
        Activity::new(
            claims.sub,
            &claims.role,
            "CASE_APPROVED",
            format!("Case {} approved", case.case_id),
        )
        .case(&case.case_id),
    );

    Ok(Json(CaseResponse::from(case)))
}

/// POST /api/cases/{id}/verdict
#[utoipa::path(
    post,
    path = "/api/cases/{id}/verdict",
    request_body = VerdictRequest,
    params(("id" = String, Path, description = "Case UUID or public CASE-... id")),
    responses(
        (status = 200, description = "Verdict recorded, case closed", body = CaseResponse),
        (status = 403, description = "Not the assigned judge", body = AppError),
        (status = 409, description = "Case cannot receive a verdict", body = AppError)
    ),
    tag = "cases"
)]
pub async fn submit_verdict(
    State(state): State<AppState>,
    RoleRequired(claims): RoleRequired<3>,
    Path(id): Path<String>,
    Json(body): Json<VerdictRequest>,
) -> Result<Json<CaseResponse>, AppError> {
    body.validate_request()?;

    let case = find_case(&state, &id).await?;
    if case.assigned_judge != Some(claims.sub) {
        return Err(AppError::forbidden("Only the assigned judge may rule"));
    }

    let case = repo::case::submit_verdict(
        &state.pool,
        case.id,
        claims.sub,
        &body.decision,
        body.summary.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::conflict("Case cannot receive a verdict in its current state"))?;

    repo::case_event::append(
        &state.pool,
        case.id,
        &case.status,
        &format!("Verdict recorded: {}", body.decision),
        claims.sub,
    )
    .await?;

    if let Some(ledger) = &state.ledger {
        if let Some(ledger_case_id) = &case.ledger_case_id {
            ledger.notify_record_verdict(ledger_case_id.clone(), body.decision.clone());
        }
    }

    state.activity.record(
        Activity::new(
            claims.sub,
            &claims.role,
            "VERDICT_SUBMITTED",
            format!("Verdict on {}: {}", case.case_id, body.decision),
        )
        .case(&case.case_id),
    );

    Ok(Json(CaseResponse::from(case)))
}

// ── Hearings ───────────────────────────────────────────────────────

/// POST /api/cases/{id}/hearings
#[utoipa::path(
    post,
    path = "/api/cases/{id}/hearings",
    request_body = ScheduleHearingRequest,
    params(("id" = String, Path, description = "Case UUID or public CASE-... id")),
    responses(
        (status = 201, description = "Hearing scheduled", body = HearingResponse),
        (status = 403, description = "Not the assigned judge", body = AppError),
        (status = 409, description = "Case is not in the hearing phase", body = AppError),
        (status = 422, description = "Malformed date or time", body = AppError)
    ),
    tag = "cases"
)]
pub async fn schedule_hearing(
    State(state): State<AppState>,
    RoleRequired(claims): RoleRequired<3>,
    Path(id): Path<String>,
    Json(body): Json<ScheduleHearingRequest>,
) -> Result<(StatusCode, Json<HearingResponse>), AppError> {
    let case = find_case(&state, &id).await?;
    if case.assigned_judge != Some(claims.sub) {
        return Err(AppError::forbidden("Only the assigned judge may schedule hearings"));
    }

    let permitted = CaseStatus::from_str_opt(&case.status)
        .map(|s| CaseAction::ScheduleHearing.permits(s))
        .unwrap_or(false);
    if !permitted {
        return Err(AppError::conflict("Case is not in the hearing phase"));
    }

    let date = NaiveDate::parse_from_str(&body.date, "%Y-%m-%d").map_err(|_| {
        AppError::validation(
            "Malformed hearing date",
            HashMap::from([("date".to_string(), "expected YYYY-MM-DD".to_string())]),
        )
    })?;
    let time = NaiveTime::parse_from_str(&body.time, "%H:%M").map_err(|_| {
        AppError::validation(
            "Malformed hearing time",
            HashMap::from([("time".to_string(), "expected HH:MM (24h)".to_string())]),
        )
    })?;
    let scheduled_at = date.and_time(time).and_utc();

    let hearing = repo::hearing::create(
        &state.pool,
        case.id,
        scheduled_at,
        body.location.as_deref().unwrap_or(""),
        body.notes.as_deref().unwrap_or(""),
        claims.sub,
    )
    .await?;

    repo::case_event::append(
        &state.pool,
        case.id,
        &case.status,
        &format!("Hearing scheduled for {} {}", body.date, body.time),
        claims.sub,
    )
    .await?;

    state.activity.record(
        Activity::new(
            claims.sub,
            &claims.role,
            "HEARING_SCHEDULED",
            format!("Hearing on {} scheduled for {} {}", case.case_id, body.date, body.time),
        )
        .case(&case.case_id),
    );

    Ok((StatusCode::CREATED, Json(HearingResponse::from(hearing))))
}

/// GET /api/cases/{id}/hearings
#[utoipa::path(
    get,
    path = "/api/cases/{id}/hearings",
    params(("id" = String, Path, description = "Case UUID or public CASE-... id")),
    responses(
        (status = 200, description = "Hearings in schedule order", body = Vec<HearingResponse>),
        (status = 403, description = "Not a participant", body = AppError)
    ),
    tag = "cases"
)]
pub async fn list_hearings(
    State(state): State<AppState>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
) -> Result<Json<Vec<HearingResponse>>, AppError> {
    let case = find_case(&state, &id).await?;
    require_view(&case, &claims)?;
    let hearings = repo::hearing::list_by_case(&state.pool, case.id).await?;
    Ok(Json(hearings.into_iter().map(HearingResponse::from).collect()))
}

// ── Timeline, notes, parties ───────────────────────────────────────

/// GET /api/cases/{id}/timeline
#[utoipa::path(
    get,
    path = "/api/cases/{id}/timeline",
    params(("id" = String, Path, description = "Case UUID or public CASE-... id")),
    responses(
        (status = 200, description = "Timeline in insertion order", body = Vec<TimelineEntryResponse>),
        (status = 403, description = "Not a participant", body = AppError)
    ),
    tag = "cases"
)]
pub async fn case_timeline(
    State(state): State<AppState>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
) -> Result<Json<Vec<TimelineEntryResponse>>, AppError> {
    let case = find_case(&state, &id).await?;
    require_view(&case, &claims)?;
    let events = repo::case_event::list_by_case(&state.pool, case.id).await?;
    Ok(Json(events.into_iter().map(TimelineEntryResponse::from).collect()))
}

/// POST /api/cases/{id}/notes
#[utoipa::path(
    post,
    path = "/api/cases/{id}/notes",
    request_body = CreateCaseNoteRequest,
    params(("id" = String, Path, description = "Case UUID or public CASE-... id")),
    responses(
        (status = 201, description = "Note added", body = CaseNote),
        (status = 403, description = "Not a participant", body = AppError)
    ),
    tag = "cases"
)]
pub async fn add_case_note(
    State(state): State<AppState>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
    Json(body): Json<CreateCaseNoteRequest>,
) -> Result<(StatusCode, Json<CaseNote>), AppError> {
    body.validate_request()?;
    let case = find_case(&state, &id).await?;
    require_view(&case, &claims)?;
    let note = repo::case_note::create(&state.pool, case.id, claims.sub, &body.content).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// GET /api/cases/{id}/notes
#[utoipa::path(
    get,
    path = "/api/cases/{id}/notes",
    params(("id" = String, Path, description = "Case UUID or public CASE-... id")),
    responses(
        (status = 200, description = "Notes in insertion order", body = Vec<CaseNote>),
        (status = 403, description = "Not a participant", body = AppError)
    ),
    tag = "cases"
)]
pub async fn list_case_notes(
    State(state): State<AppState>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
) -> Result<Json<Vec<CaseNote>>, AppError> {
    let case = find_case(&state, &id).await?;
    require_view(&case, &claims)?;
    Ok(Json(repo::case_note::list_by_case(&state.pool, case.id).await?))
}

/// POST /api/cases/{id}/parties
#[utoipa::path(
    post,
    path = "/api/cases/{id}/parties",
    request_body = CreatePartyRequest,
    params(("id" = String, Path, description = "Case UUID or public CASE-... id")),
    responses(
        (status = 201, description = "Party attached", body = CaseParty),
        (status = 400, description = "Invalid party kind", body = AppError),
        (status = 403, description = "Not the registering officer", body = AppError)
    ),
    tag = "cases"
)]
pub async fn add_case_party(
    State(state): State<AppState>,
    RoleRequired(claims): RoleRequired<1>,
    Path(id): Path<String>,
    Json(body): Json<CreatePartyRequest>,
) -> Result<(StatusCode, Json<CaseParty>), AppError> {
    body.validate_request()?;
    if !is_valid_party_kind(&body.kind) {
        return Err(AppError::bad_request(format!(
            "Invalid party kind: {}. Valid values: {}",
            body.kind,
            PARTY_KINDS.join(", ")
        )));
    }

    let case = find_case(&state, &id).await?;
    require_owner(&case, &claims)?;

    let party = repo::party::create(
        &state.pool,
        case.id,
        &body.kind,
        &body.full_name,
        body.description.as_deref().unwrap_or(""),
        body.contact.as_deref().unwrap_or(""),
        claims.sub,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(party)))
}

/// GET /api/cases/{id}/parties
#[utoipa::path(
    get,
    path = "/api/cases/{id}/parties",
    params(("id" = String, Path, description = "Case UUID or public CASE-... id")),
    responses(
        (status = 200, description = "Parties in insertion order", body = Vec<CaseParty>),
        (status = 403, description = "Not a participant", body = AppError)
    ),
    tag = "cases"
)]
pub async fn list_case_parties(
    State(state): State<AppState>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
) -> Result<Json<Vec<CaseParty>>, AppError> {
    let case = find_case(&state, &id).await?;
    require_view(&case, &claims)?;
    Ok(Json(repo::party::list_by_case(&state.pool, case.id).await?))
}
