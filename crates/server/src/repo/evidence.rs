use shared_types::{AppError, Evidence};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const EVIDENCE_COLS: &str = "id, evidence_id, case_id, evidence_type, description, uploaded_by, \
     file_name, file_size, mime_type, ipfs_hash, gateway_url, sha256, status, \
     analysis_status, analysis_report, analysis_notes, analyzed_by, analyzed_at, \
     is_immutable, verified_at, created_at";

/// Fields captured at upload time, after a successful pin.
pub struct NewEvidence<'a> {
    pub evidence_id: &'a str,
    pub case_id: Uuid,
    pub evidence_type: &'a str,
    pub description: &'a str,
    pub uploaded_by: Uuid,
    pub file_name: &'a str,
    pub file_size: i64,
    pub mime_type: &'a str,
    pub ipfs_hash: &'a str,
    pub gateway_url: &'a str,
    pub sha256: &'a str,
}

/// Insert an evidence row. Called only after the pinning service
/// confirmed the artifact — a failed pin creates no row.
pub async fn create(pool: &Pool<Postgres>, new: NewEvidence<'_>) -> Result<Evidence, AppError> {
    let sql = format!(
        "INSERT INTO evidence \
            (evidence_id, case_id, evidence_type, description, uploaded_by, \
             file_name, file_size, mime_type, ipfs_hash, gateway_url, sha256) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         RETURNING {EVIDENCE_COLS}"
    );
    sqlx::query_as::<_, Evidence>(&sql)
        .bind(new.evidence_id)
        .bind(new.case_id)
        .bind(new.evidence_type)
        .bind(new.description)
        .bind(new.uploaded_by)
        .bind(new.file_name)
        .bind(new.file_size)
        .bind(new.mime_type)
        .bind(new.ipfs_hash)
        .bind(new.gateway_url)
        .bind(new.sha256)
        .fetch_one(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

pub async fn find_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<Evidence>, AppError> {
    let sql = format!("SELECT {EVIDENCE_COLS} FROM evidence WHERE id = $1");
    sqlx::query_as::<_, Evidence>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Find by the public composite identifier (`EV-...`).
pub async fn find_by_public_id(
    pool: &Pool<Postgres>,
    evidence_id: &str,
) -> Result<Option<Evidence>, AppError> {
    let sql = format!("SELECT {EVIDENCE_COLS} FROM evidence WHERE evidence_id = $1");
    sqlx::query_as::<_, Evidence>(&sql)
        .bind(evidence_id)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

pub async fn list_by_case(pool: &Pool<Postgres>, case_id: Uuid) -> Result<Vec<Evidence>, AppError> {
    let sql = format!(
        "SELECT {EVIDENCE_COLS} FROM evidence WHERE case_id = $1 ORDER BY created_at ASC"
    );
    sqlx::query_as::<_, Evidence>(&sql)
        .bind(case_id)
        .fetch_all(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Record a forensic analysis. Guarded: immutable evidence is never
/// touched (None result), so the custody chain stays truthful.
pub async fn submit_analysis(
    pool: &Pool<Postgres>,
    id: Uuid,
    analyzed_by: Uuid,
    report: &str,
    notes: Option<&str>,
) -> Result<Option<Evidence>, AppError> {
    let sql = format!(
        "UPDATE evidence SET \
            status = 'ANALYSIS_COMPLETE', \
            analysis_status = 'COMPLETE', \
            analysis_report = $2, \
            analysis_notes = $3, \
            analyzed_by = $4, \
            analyzed_at = NOW() \
         WHERE id = $1 AND is_immutable = FALSE \
         RETURNING {EVIDENCE_COLS}"
    );
    sqlx::query_as::<_, Evidence>(&sql)
        .bind(id)
        .bind(report)
        .bind(notes.unwrap_or(""))
        .bind(analyzed_by)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Flip the immutability flag after the gateway availability check.
pub async fn mark_immutable(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<Evidence>, AppError> {
    let sql = format!(
        "UPDATE evidence SET \
            is_immutable = TRUE, \
            status = 'IMMUTABLE', \
            verified_at = NOW() \
         WHERE id = $1 AND is_immutable = FALSE \
         RETURNING {EVIDENCE_COLS}"
    );
    sqlx::query_as::<_, Evidence>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// (public id, pinning hash) pairs for the periodic integrity sweep.
pub async fn list_pinned_hashes(pool: &Pool<Postgres>) -> Result<Vec<(String, String)>, AppError> {
    sqlx::query_as::<_, (String, String)>(
        "SELECT evidence_id, ipfs_hash FROM evidence ORDER BY created_at ASC",
    )
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
