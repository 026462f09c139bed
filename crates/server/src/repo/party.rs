use shared_types::{AppError, CaseParty};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const PARTY_COLS: &str = "id, case_id, kind, full_name, description, contact, added_by, created_at";

/// Attach a suspect or witness record to a case.
pub async fn create(
    pool: &Pool<Postgres>,
    case_id: Uuid,
    kind: &str,
    full_name: &str,
    description: &str,
    contact: &str,
    added_by: Uuid,
) -> Result<CaseParty, AppError> {
    let sql = format!(
        "INSERT INTO case_parties (case_id, kind, full_name, description, contact, added_by) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING {PARTY_COLS}"
    );
    sqlx::query_as::<_, CaseParty>(&sql)
        .bind(case_id)
        .bind(kind)
        .bind(full_name)
        .bind(description)
        .bind(contact)
        .bind(added_by)
        .fetch_one(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

pub async fn list_by_case(
    pool: &Pool<Postgres>,
    case_id: Uuid,
) -> Result<Vec<CaseParty>, AppError> {
    let sql =
        format!("SELECT {PARTY_COLS} FROM case_parties WHERE case_id = $1 ORDER BY created_at ASC");
    sqlx::query_as::<_, CaseParty>(&sql)
        .bind(case_id)
        .fetch_all(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}
