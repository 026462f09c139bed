use shared_types::{AppError, CaseNote};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const NOTE_COLS: &str = "id, case_id, author, content, created_at";

pub async fn create(
    pool: &Pool<Postgres>,
    case_id: Uuid,
    author: Uuid,
    content: &str,
) -> Result<CaseNote, AppError> {
    let sql = format!(
        "INSERT INTO case_notes (case_id, author, content) \
         VALUES ($1, $2, $3) \
         RETURNING {NOTE_COLS}"
    );
    sqlx::query_as::<_, CaseNote>(&sql)
        .bind(case_id)
        .bind(author)
        .bind(content)
        .fetch_one(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

pub async fn list_by_case(pool: &Pool<Postgres>, case_id: Uuid) -> Result<Vec<CaseNote>, AppError> {
    let sql = format!("SELECT {NOTE_COLS} FROM case_notes WHERE case_id = $1 ORDER BY created_at ASC");
    sqlx::query_as::<_, CaseNote>(&sql)
        .bind(case_id)
        .fetch_all(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}
