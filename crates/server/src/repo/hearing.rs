use chrono::{DateTime, Utc};
use shared_types::{AppError, Hearing};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const HEARING_COLS: &str = "id, case_id, scheduled_at, location, notes, scheduled_by, created_at";

pub async fn create(
    pool: &Pool<Postgres>,
    case_id: Uuid,
    scheduled_at: DateTime<Utc>,
    location: &str,
    notes: &str,
    scheduled_by: Uuid,
) -> Result<Hearing, AppError> {
    let sql = format!(
        "INSERT INTO hearings (case_id, scheduled_at, location, notes, scheduled_by) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING {HEARING_COLS}"
    );
    sqlx::query_as::<_, Hearing>(&sql)
        .bind(case_id)
        .bind(scheduled_at)
        .bind(location)
        .bind(notes)
        .bind(scheduled_by)
        .fetch_one(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

pub async fn list_by_case(pool: &Pool<Postgres>, case_id: Uuid) -> Result<Vec<Hearing>, AppError> {
    let sql = format!(
        "SELECT {HEARING_COLS} FROM hearings WHERE case_id = $1 ORDER BY scheduled_at ASC"
    );
    sqlx::query_as::<_, Hearing>(&sql)
        .bind(case_id)
        .fetch_all(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}
