use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use shared_types::{
    is_valid_evidence_type, AppError, Case, CustodyEntryResponse, Evidence, EvidenceResponse,
    SubmitAnalysisRequest, UserRole, EVIDENCE_TYPES,
};

use crate::activity::Activity;
use crate::auth::{AuthRequired, Claims, RoleRequired};
use crate::db::AppState;
use crate::error_convert::ValidateRequest;
use crate::ids;
use crate::repo;
use crate::repo::evidence::NewEvidence;

/// Upload size cap: 50 MB.
const MAX_EVIDENCE_SIZE: usize = 50 * 1024 * 1024;

// ── Helpers ────────────────────────────────────────────────────────

/// Resolve evidence from a path segment that may be either the row UUID
/// or the public `EV-...` identifier.
async fn find_evidence(state: &AppState, id: &str) -> Result<Evidence, AppError> {
    let found = match Uuid::parse_str(id) {
        Ok(uuid) => repo::evidence::find_by_id(&state.pool, uuid).await?,
        Err(_) => repo::evidence::find_by_public_id(&state.pool, id).await?,
    };
    found.ok_or_else(|| AppError::not_found(format!("Evidence {} not found", id)))
}

async fn parent_case(state: &AppState, evidence: &Evidence) -> Result<Case, AppError> {
    repo::case::find_by_id(&state.pool, evidence.case_id)
        .await?
        .ok_or_else(|| AppError::internal("Evidence references a missing case"))
}

fn require_view(case: &Case, claims: &Claims) -> Result<(), AppError> {
    let visible = match UserRole::from_str_opt(&claims.role) {
        Some(UserRole::Admin) => true,
        Some(UserRole::Police) => case.registered_by == claims.sub,
        Some(UserRole::Forensic) => case.assigned_forensic == Some(claims.sub),
        Some(UserRole::Judge) => case.assigned_judge == Some(claims.sub),
        None => false,
    };
    if visible {
        Ok(())
    } else {
        Err(AppError::forbidden("Not a participant in this case"))
    }
}

/// Fields collected from the upload form.
struct UploadForm {
    file_name: String,
    mime_type: String,
    bytes: Vec<u8>,
    evidence_type: String,
    description: String,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut evidence_type = String::new();
    let mut description = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(e.to_string(), Default::default()))?
    {
        match field.name().unwrap_or_default() {
            "file" => {
                let file_name = field.file_name().unwrap_or("evidence.bin").to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::internal(e.to_string()))?;
                if data.len() > MAX_EVIDENCE_SIZE {
                    return Err(AppError::validation(
                        "Evidence file must be under 50 MB",
                        Default::default(),
                    ));
                }
                file = Some((file_name, mime_type, data.to_vec()));
            }
            "evidence_type" => {
                evidence_type = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(e.to_string(), Default::default()))?;
            }
            "description" => {
                description = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(e.to_string(), Default::default()))?;
            }
            _ => {}
        }
    }

    let (file_name, mime_type, bytes) =
        file.ok_or_else(|| AppError::bad_request("Missing file field"))?;
    if bytes.is_empty() {
        return Err(AppError::bad_request("Uploaded file is empty"));
    }
    if description.trim().is_empty() {
        return Err(AppError::bad_request("description must not be empty"));
    }
    if !is_valid_evidence_type(&evidence_type) {
        return Err(AppError::bad_request(format!(
            "Invalid evidence_type: {}. Valid values: {}",
            evidence_type,
            EVIDENCE_TYPES.join(", ")
        )));
    }

    Ok(UploadForm {
        file_name,
        mime_type,
        bytes,
        evidence_type,
        description,
    })
}

// ── Handlers ───────────────────────────────────────────────────────

/// POST /api/cases/{id}/evidence
///
/// Pin first, record second: a failed pin leaves no database row.
#[utoipa::path(
    post,
    path = "/api/cases/{id}/evidence",
    params(("id" = String, Path, description = "Case UUID or public CASE-... id")),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Evidence pinned and recorded", body = EvidenceResponse),
        (status = 403, description = "Not the registering officer", body = AppError),
        (status = 409, description = "Case does not accept evidence", body = AppError),
        (status = 502, description = "Pinning service failure", body = AppError)
    ),
    tag = "evidence"
)]
pub async fn upload_evidence(
    State(state): State<AppState>,
    RoleRequired(claims): RoleRequired<1>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<EvidenceResponse>), AppError> {
    let case = match Uuid::parse_str(&id) {
        Ok(uuid) => repo::case::find_by_id(&state.pool, uuid).await?,
        Err(_) => repo::case::find_by_public_id(&state.pool, &id).await?,
    }
    .ok_or_else(|| AppError::not_found(format!("Case {} not found", id)))?;

    if case.registered_by != claims.sub {
        return Err(AppError::forbidden("Only the registering officer may upload evidence"));
    }
    if case.is_draft {
        return Err(AppError::conflict("Submit the draft before uploading evidence"));
    }
    if case.verdict_decision.is_some() {
        return Err(AppError::conflict("Closed cases do not accept evidence"));
    }

    let form = read_upload_form(multipart).await?;

    let sha256 = hex::encode(Sha256::digest(&form.bytes));
    let file_size = form.bytes.len() as i64;

    let receipt = state.pinning.pin_bytes(&form.file_name, form.bytes).await?;

    let evidence_id = ids::new_evidence_id();
    let evidence = repo::evidence::create(
        &state.pool,
        NewEvidence {
            evidence_id: &evidence_id,
            case_id: case.id,
            evidence_type: &form.evidence_type,
            description: &form.description,
            uploaded_by: claims.sub,
            file_name: &form.file_name,
            file_size,
            mime_type: &form.mime_type,
            ipfs_hash: &receipt.hash,
            gateway_url: &receipt.url,
            sha256: &sha256,
        },
    )
    .await?;

    repo::custody::append(
        &state.pool,
        evidence.id,
        "UPLOADED",
        claims.sub,
        &format!("Pinned as {}", receipt.hash),
    )
    .await?;

    state.activity.record(
        Activity::new(
            claims.sub,
            &claims.role,
            "EVIDENCE_UPLOADED",
            format!("Evidence {} uploaded to case {}", evidence.evidence_id, case.case_id),
        )
        .case(&case.case_id)
        .resource(&evidence.evidence_id),
    );

    Ok((StatusCode::CREATED, Json(EvidenceResponse::from(evidence))))
}

/// GET /api/cases/{id}/evidence
#[utoipa::path(
    get,
    path = "/api/cases/{id}/evidence",
    params(("id" = String, Path, description = "Case UUID or public CASE-... id")),
    responses(
        (status = 200, description = "Evidence in upload order", body = Vec<EvidenceResponse>),
        (status = 403, description = "Not a participant", body = AppError)
    ),
    tag = "evidence"
)]
pub async fn list_case_evidence(
    State(state): State<AppState>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
) -> Result<Json<Vec<EvidenceResponse>>, AppError> {
    let case = match Uuid::parse_str(&id) {
        Ok(uuid) => repo::case::find_by_id(&state.pool, uuid).await?,
        Err(_) => repo::case::find_by_public_id(&state.pool, &id).await?,
    }
    .ok_or_else(|| AppError::not_found(format!("Case {} not found", id)))?;
    require_view(&case, &claims)?;

    let items = repo::evidence::list_by_case(&state.pool, case.id).await?;
    Ok(Json(items.into_iter().map(EvidenceResponse::from).collect()))
}

/// GET /api/evidence/{id}
#[utoipa::path(
    get,
    path = "/api/evidence/{id}",
    params(("id" = String, Path, description = "Evidence UUID or public EV-... id")),
    responses(
        (status = 200, description = "Evidence found", body = EvidenceResponse),
        (status = 403, description = "Not a participant", body = AppError),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "evidence"
)]
pub async fn get_evidence(
    State(state): State<AppState>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
) -> Result<Json<EvidenceResponse>, AppError> {
    let evidence = find_evidence(&state, &id).await?;
    let case = parent_case(&state, &evidence).await?;
    require_view(&case, &claims)?;
    Ok(Json(EvidenceResponse::from(evidence)))
}

/// POST /api/evidence/{id}/analysis
#[utoipa::path(
    post,
    path = "/api/evidence/{id}/analysis",
    request_body = SubmitAnalysisRequest,
    params(("id" = String, Path, description = "Evidence UUID or public EV-... id")),
    responses(
        (status = 200, description = "Analysis recorded", body = EvidenceResponse),
        (status = 403, description = "Not the assigned analyst", body = AppError),
        (status = 409, description = "Evidence is immutable", body = AppError)
    ),
    tag = "evidence"
)]
pub async fn submit_analysis(
    State(state): State<AppState>,
    RoleRequired(claims): RoleRequired<2>,
    Path(id): Path<String>,
    Json(body): Json<SubmitAnalysisRequest>,
) -> Result<Json<EvidenceResponse>, AppError> {
    body.validate_request()?;

    let evidence = find_evidence(&state, &id).await?;
    let case = parent_case(&state, &evidence).await?;
    if case.assigned_forensic != Some(claims.sub) {
        return Err(AppError::forbidden("Only the assigned analyst may submit analysis"));
    }

    let evidence = repo::evidence::submit_analysis(
        &state.pool,
        evidence.id,
        claims.sub,
        &body.report,
        body.notes.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::conflict("Evidence is immutable and cannot be re-analyzed"))?;

    repo::custody::append(
        &state.pool,
        evidence.id,
        "ANALYSIS_SUBMITTED",
        claims.sub,
        "Forensic analysis recorded",
    )
    .await?;

    // The parent case advances when it is still in analysis; any other
    // status is left untouched.
    repo::case::complete_analysis(&state.pool, case.id).await?;

    state.activity.record(
        Activity::new(
            claims.sub,
            &claims.role,
            "ANALYSIS_SUBMITTED",
            format!("Analysis recorded for {}", evidence.evidence_id),
        )
        .case(&case.case_id)
        .resource(&evidence.evidence_id),
    );

    Ok(Json(EvidenceResponse::from(evidence)))
}

/// POST /api/evidence/{id}/immutable
///
/// Marks evidence immutable after a gateway availability check. The
/// check proves reachability only, not content integrity.
#[utoipa::path(
    post,
    path = "/api/evidence/{id}/immutable",
    params(("id" = String, Path, description = "Evidence UUID or public EV-... id")),
    responses(
        (status = 200, description = "Evidence marked immutable", body = EvidenceResponse),
        (status = 403, description = "Not the assigned judge", body = AppError),
        (status = 409, description = "Evidence is already immutable", body = AppError),
        (status = 502, description = "Payload unreachable at the gateway", body = AppError)
    ),
    tag = "evidence"
)]
pub async fn mark_immutable(
    State(state): State<AppState>,
    RoleRequired(claims): RoleRequired<3>,
    Path(id): Path<String>,
) -> Result<Json<EvidenceResponse>, AppError> {
    let evidence = find_evidence(&state, &id).await?;
    let case = parent_case(&state, &evidence).await?;
    if case.assigned_judge != Some(claims.sub) {
        return Err(AppError::forbidden("Only the assigned judge may seal evidence"));
    }
    if evidence.is_immutable {
        return Err(AppError::conflict("Evidence is already immutable"));
    }

    let reachable = state.pinning.check_availability(&evidence.ipfs_hash).await?;
    repo::custody::append(
        &state.pool,
        evidence.id,
        "AVAILABILITY_CHECKED",
        claims.sub,
        if reachable {
            "Gateway reports the payload reachable"
        } else {
            "Gateway could not serve the payload"
        },
    )
    .await?;
    if !reachable {
        return Err(AppError::dependency(
            "Evidence payload is not reachable at the gateway",
        ));
    }

    let evidence = repo::evidence::mark_immutable(&state.pool, evidence.id)
        .await?
        .ok_or_else(|| AppError::conflict("Evidence is already immutable"))?;

    repo::custody::append(
        &state.pool,
        evidence.id,
        "MARKED_IMMUTABLE",
        claims.sub,
        "Evidence sealed",
    )
    .await?;

    state.activity.record(
        Activity::new(
            claims.sub,
            &claims.role,
            "EVIDENCE_MARKED_IMMUTABLE",
            format!("Evidence {} sealed", evidence.evidence_id),
        )
        .case(&case.case_id)
        .resource(&evidence.evidence_id),
    );

    Ok(Json(EvidenceResponse::from(evidence)))
}

/// GET /api/evidence/{id}/chain
#[utoipa::path(
    get,
    path = "/api/evidence/{id}/chain",
    params(("id" = String, Path, description = "Evidence UUID or public EV-... id")),
    responses(
        (status = 200, description = "Custody chain in insertion order", body = Vec<CustodyEntryResponse>),
        (status = 403, description = "Not a participant", body = AppError)
    ),
    tag = "evidence"
)]
pub async fn custody_chain(
    State(state): State<AppState>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
) -> Result<Json<Vec<CustodyEntryResponse>>, AppError> {
    let evidence = find_evidence(&state, &id).await?;
    let case = parent_case(&state, &evidence).await?;
    require_view(&case, &claims)?;
    Ok(Json(repo::custody::chain_for_evidence(&state.pool, evidence.id).await?))
}
