use shared_types::{AppError, Case, CaseAction, CreateCaseRequest, UpdateDraftRequest, UserRole};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const CASE_COLS: &str = "id, case_id, title, description, case_number, location, priority, \
     is_draft, status, registered_by, assigned_forensic, assigned_judge, police_station, \
     transfer_status, transfer_to_station, transfer_requested_by, transfer_requested_at, \
     ledger_case_id, approved_by, approval_tx_hash, \
     verdict_decision, verdict_summary, verdict_by, verdict_at, \
     created_at, updated_at, closed_at";

fn allowed_from(action: CaseAction) -> Vec<String> {
    action
        .allowed_from_strs()
        .into_iter()
        .map(String::from)
        .collect()
}

/// Insert a new case. Status is DRAFT or REGISTERED depending on the
/// draft flag; the first timeline entry is appended by the caller.
pub async fn create(
    pool: &Pool<Postgres>,
    case_id: &str,
    req: &CreateCaseRequest,
    registered_by: Uuid,
) -> Result<Case, AppError> {
    let priority = req.priority.as_deref().unwrap_or("MEDIUM");
    let status = if req.is_draft { "DRAFT" } else { "REGISTERED" };
    let sql = format!(
        "INSERT INTO cases \
            (case_id, title, description, case_number, location, priority, \
             is_draft, status, registered_by, police_station) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING {CASE_COLS}"
    );
    sqlx::query_as::<_, Case>(&sql)
        .bind(case_id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(&req.case_number)
        .bind(&req.location)
        .bind(priority)
        .bind(req.is_draft)
        .bind(status)
        .bind(registered_by)
        .bind(req.police_station.as_deref().unwrap_or(""))
        .fetch_one(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

pub async fn find_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<Case>, AppError> {
    let sql = format!("SELECT {CASE_COLS} FROM cases WHERE id = $1");
    sqlx::query_as::<_, Case>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Find by the public composite identifier (`CASE-...`).
pub async fn find_by_public_id(
    pool: &Pool<Postgres>,
    case_id: &str,
) -> Result<Option<Case>, AppError> {
    let sql = format!("SELECT {CASE_COLS} FROM cases WHERE case_id = $1");
    sqlx::query_as::<_, Case>(&sql)
        .bind(case_id)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Role-scoped listing: POLICE sees self-registered cases, FORENSIC and
/// JUDGE see cases assigned to them, ADMIN sees all.
pub async fn list_for(
    pool: &Pool<Postgres>,
    role: UserRole,
    user_id: Uuid,
) -> Result<Vec<Case>, AppError> {
    let filter = match role {
        UserRole::Police => Some("WHERE registered_by = $1"),
        UserRole::Forensic => Some("WHERE assigned_forensic = $1"),
        UserRole::Judge => Some("WHERE assigned_judge = $1"),
        UserRole::Admin => None,
    };
    match filter {
        Some(clause) => {
            let sql = format!("SELECT {CASE_COLS} FROM cases {clause} ORDER BY created_at DESC");
            sqlx::query_as::<_, Case>(&sql)
                .bind(user_id)
                .fetch_all(pool)
                .await
                .map_err(SqlxErrorExt::into_app_error)
        }
        None => {
            let sql = format!("SELECT {CASE_COLS} FROM cases ORDER BY created_at DESC");
            sqlx::query_as::<_, Case>(&sql)
                .fetch_all(pool)
                .await
                .map_err(SqlxErrorExt::into_app_error)
        }
    }
}

/// Draft edits. Only touches rows still in draft; the ownership check
/// happens in the handler so it can distinguish 403 from 409.
pub async fn update_draft(
    pool: &Pool<Postgres>,
    id: Uuid,
    req: &UpdateDraftRequest,
) -> Result<Option<Case>, AppError> {
    let sql = format!(
        "UPDATE cases SET \
            title       = COALESCE($2, title), \
            description = COALESCE($3, description), \
            case_number = COALESCE($4, case_number), \
            location    = COALESCE($5, location), \
            priority    = COALESCE($6, priority), \
            updated_at  = NOW() \
         WHERE id = $1 AND is_draft = TRUE \
         RETURNING {CASE_COLS}"
    );
    sqlx::query_as::<_, Case>(&sql)
        .bind(id)
        .bind(req.title.as_deref())
        .bind(req.description.as_deref())
        .bind(req.case_number.as_deref())
        .bind(req.location.as_deref())
        .bind(req.priority.as_deref())
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Draft submission: flips `is_draft` and moves DRAFT → REGISTERED.
/// The status guard makes the update atomic; None means the case was
/// not in a submittable state.
pub async fn submit_draft(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<Case>, AppError> {
    let sql = format!(
        "UPDATE cases SET is_draft = FALSE, status = $3, updated_at = NOW() \
         WHERE id = $1 AND status = ANY($2) AND verdict_decision IS NULL \
         RETURNING {CASE_COLS}"
    );
    sqlx::query_as::<_, Case>(&sql)
        .bind(id)
        .bind(allowed_from(CaseAction::SubmitDraft))
        .bind(CaseAction::SubmitDraft.to_status().as_str())
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Open a transfer request. Guarded so a new request is rejected while
/// one is already PENDING (None result), never silently overwritten.
pub async fn request_transfer(
    pool: &Pool<Postgres>,
    id: Uuid,
    to_station: &str,
    requested_by: Uuid,
) -> Result<Option<Case>, AppError> {
    let sql = format!(
        "UPDATE cases SET \
            transfer_status = 'PENDING', \
            transfer_to_station = $2, \
            transfer_requested_by = $3, \
            transfer_requested_at = NOW(), \
            updated_at = NOW() \
         WHERE id = $1 \
           AND (transfer_status IS NULL OR transfer_status <> 'PENDING') \
           AND verdict_decision IS NULL \
         RETURNING {CASE_COLS}"
    );
    sqlx::query_as::<_, Case>(&sql)
        .bind(id)
        .bind(to_station)
        .bind(requested_by)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Resolve a PENDING transfer request. Approval moves the case to the
/// requested station; None means there was no pending request.
pub async fn resolve_transfer(
    pool: &Pool<Postgres>,
    id: Uuid,
    approve: bool,
) -> Result<Option<Case>, AppError> {
    let sql = if approve {
        format!(
            "UPDATE cases SET \
                police_station = COALESCE(transfer_to_station, police_station), \
                transfer_status = 'APPROVED', \
                updated_at = NOW() \
             WHERE id = $1 AND transfer_status = 'PENDING' \
             RETURNING {CASE_COLS}"
        )
    } else {
        format!(
            "UPDATE cases SET transfer_status = 'REJECTED', updated_at = NOW() \
             WHERE id = $1 AND transfer_status = 'PENDING' \
             RETURNING {CASE_COLS}"
        )
    };
    sqlx::query_as::<_, Case>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Assign the forensic analyst and move into IN_FORENSIC_ANALYSIS,
/// guarded by the transition table (a closed or draft case is untouched).
pub async fn assign_forensic(
    pool: &Pool<Postgres>,
    id: Uuid,
    forensic: Uuid,
) -> Result<Option<Case>, AppError> {
    let sql = format!(
        "UPDATE cases SET assigned_forensic = $2, status = $4, updated_at = NOW() \
         WHERE id = $1 AND status = ANY($3) AND verdict_decision IS NULL \
         RETURNING {CASE_COLS}"
    );
    sqlx::query_as::<_, Case>(&sql)
        .bind(id)
        .bind(forensic)
        .bind(allowed_from(CaseAction::AssignForensic))
        .bind(CaseAction::AssignForensic.to_status().as_str())
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Assign the judge and move into HEARING, guarded by the transition table.
pub async fn assign_judge(
    pool: &Pool<Postgres>,
    id: Uuid,
    judge: Uuid,
) -> Result<Option<Case>, AppError> {
    let sql = format!(
        "UPDATE cases SET assigned_judge = $2, status = $4, updated_at = NOW() \
         WHERE id = $1 AND status = ANY($3) AND verdict_decision IS NULL \
         RETURNING {CASE_COLS}"
    );
    sqlx::query_as::<_, Case>(&sql)
        .bind(id)
        .bind(judge)
        .bind(allowed_from(CaseAction::AssignJudge))
        .bind(CaseAction::AssignJudge.to_status().as_str())
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Record the ledger id handed back when case creation was mirrored.
pub async fn set_ledger_case_id(
    pool: &Pool<Postgres>,
    id: Uuid,
    ledger_case_id: &str,
) -> Result<(), AppError> {
    sqlx::query("UPDATE cases SET ledger_case_id = $2, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .bind(ledger_case_id)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;
    Ok(())
}

/// Approval after a successful on-chain approveCase transaction.
pub async fn approve(
    pool: &Pool<Postgres>,
    id: Uuid,
    approved_by: Uuid,
    tx_hash: Option<&str>,
) -> Result<Option<Case>, AppError> {
    let sql = format!(
        "UPDATE cases SET status = $5, approved_by = $2, approval_tx_hash = $3, updated_at = NOW() \
         WHERE id = $1 AND status = ANY($4) AND verdict_decision IS NULL \
         RETURNING {CASE_COLS}"
    );
    sqlx::query_as::<_, Case>(&sql)
        .bind(id)
        .bind(approved_by)
        .bind(tx_hash)
        .bind(allowed_from(CaseAction::Approve))
        .bind(CaseAction::Approve.to_status().as_str())
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Best-effort bump IN_FORENSIC_ANALYSIS → ANALYSIS_COMPLETE when an
/// analysis lands. A case in any other status is left alone.
pub async fn complete_analysis(pool: &Pool<Postgres>, id: Uuid) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE cases SET status = $3, updated_at = NOW() \
         WHERE id = $1 AND status = ANY($2) AND verdict_decision IS NULL",
    )
    .bind(id)
    .bind(allowed_from(CaseAction::CompleteAnalysis))
    .bind(CaseAction::CompleteAnalysis.to_status().as_str())
    .execute(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;
    Ok(())
}

/// Terminal verdict: closes the case. Once `verdict_decision` is set no
/// status-mutating statement in this module can touch the row again.
pub async fn submit_verdict(
    pool: &Pool<Postgres>,
    id: Uuid,
    judge: Uuid,
    decision: &str,
    summary: Option<&str>,
) -> Result<Option<Case>, AppError> {
    let sql = format!(
        "UPDATE cases SET \
            status = $6, \
            verdict_decision = $2, \
            verdict_summary = $3, \
            verdict_by = $4, \
            verdict_at = NOW(), \
            closed_at = NOW(), \
            updated_at = NOW() \
         WHERE id = $1 AND status = ANY($5) AND verdict_decision IS NULL \
         RETURNING {CASE_COLS}"
    );
    sqlx::query_as::<_, Case>(&sql)
        .bind(id)
        .bind(decision)
        .bind(summary.unwrap_or(""))
        .bind(judge)
        .bind(allowed_from(CaseAction::SubmitVerdict))
        .bind(CaseAction::SubmitVerdict.to_status().as_str())
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}
