use shared_types::{AppError, CaseEvent};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const EVENT_COLS: &str = "id, case_id, status, note, actor, created_at";

/// Append one timeline entry. Single INSERT — concurrent appends cannot
/// clobber each other.
pub async fn append(
    pool: &Pool<Postgres>,
    case_id: Uuid,
    status: &str,
    note: &str,
    actor: Uuid,
) -> Result<CaseEvent, AppError> {
    let sql = format!(
        "INSERT INTO case_events (case_id, status, note, actor) \
         VALUES ($1, $2, $3, $4) \
         RETURNING {EVENT_COLS}"
    );
    sqlx::query_as::<_, CaseEvent>(&sql)
        .bind(case_id)
        .bind(status)
        .bind(note)
        .bind(actor)
        .fetch_one(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Timeline in insertion order.
pub async fn list_by_case(pool: &Pool<Postgres>, case_id: Uuid) -> Result<Vec<CaseEvent>, AppError> {
    let sql = format!(
        "SELECT {EVENT_COLS} FROM case_events WHERE case_id = $1 ORDER BY created_at ASC"
    );
    sqlx::query_as::<_, CaseEvent>(&sql)
        .bind(case_id)
        .fetch_all(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}
