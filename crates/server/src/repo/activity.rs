use shared_types::{ActivityLog, AppError};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const ACTIVITY_COLS: &str = "id, actor, actor_role, action, case_ref, resource_ref, \
     description, created_at";

/// Append one audit record. The recorder calls this from a spawned task;
/// failures never reach the request path.
pub async fn insert(
    pool: &Pool<Postgres>,
    actor: Option<Uuid>,
    actor_role: &str,
    action: &str,
    case_ref: Option<&str>,
    resource_ref: Option<&str>,
    description: &str,
) -> Result<ActivityLog, AppError> {
    let sql = format!(
        "INSERT INTO activity_log \
            (actor, actor_role, action, case_ref, resource_ref, description) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING {ACTIVITY_COLS}"
    );
    sqlx::query_as::<_, ActivityLog>(&sql)
        .bind(actor)
        .bind(actor_role)
        .bind(action)
        .bind(case_ref)
        .bind(resource_ref)
        .bind(description)
        .fetch_one(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Paged audit listing, newest first. Returns (entries, total).
pub async fn search(
    pool: &Pool<Postgres>,
    case_ref: Option<&str>,
    action: Option<&str>,
    offset: i64,
    limit: i64,
) -> Result<(Vec<ActivityLog>, i64), AppError> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM activity_log \
         WHERE ($1::TEXT IS NULL OR case_ref = $1) \
           AND ($2::TEXT IS NULL OR action = $2)",
    )
    .bind(case_ref)
    .bind(action)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    let sql = format!(
        "SELECT {ACTIVITY_COLS} FROM activity_log \
         WHERE ($1::TEXT IS NULL OR case_ref = $1) \
           AND ($2::TEXT IS NULL OR action = $2) \
         ORDER BY created_at DESC \
         LIMIT $3 OFFSET $4"
    );
    let rows = sqlx::query_as::<_, ActivityLog>(&sql)
        .bind(case_ref)
        .bind(action)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    Ok((rows, total))
}
