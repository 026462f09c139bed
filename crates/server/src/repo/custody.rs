use shared_types::{AppError, CustodyEntry, CustodyEntryResponse};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const CUSTODY_COLS: &str = "id, evidence_id, action, actor, detail, created_at";

/// Append one custody-chain entry. Single INSERT, append-only.
pub async fn append(
    pool: &Pool<Postgres>,
    evidence_id: Uuid,
    action: &str,
    actor: Uuid,
    detail: &str,
) -> Result<CustodyEntry, AppError> {
    let sql = format!(
        "INSERT INTO custody_log (evidence_id, action, actor, detail) \
         VALUES ($1, $2, $3, $4) \
         RETURNING {CUSTODY_COLS}"
    );
    sqlx::query_as::<_, CustodyEntry>(&sql)
        .bind(evidence_id)
        .bind(action)
        .bind(actor)
        .bind(detail)
        .fetch_one(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Custody chain in insertion order, with actor identities resolved.
pub async fn chain_for_evidence(
    pool: &Pool<Postgres>,
    evidence_id: Uuid,
) -> Result<Vec<CustodyEntryResponse>, AppError> {
    sqlx::query_as::<_, CustodyEntryResponse>(
        "SELECT c.id, c.action, c.actor, u.username AS actor_username, \
                u.role AS actor_role, c.detail, c.created_at \
         FROM custody_log c \
         JOIN users u ON u.id = c.actor \
         WHERE c.evidence_id = $1 \
         ORDER BY c.created_at ASC",
    )
    .bind(evidence_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
