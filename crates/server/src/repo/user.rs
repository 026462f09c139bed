use shared_types::{AppError, User};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const USER_COLS: &str = "id, username, password_hash, role, badge_id, wallet_address, \
     is_verified, is_suspended, created_at";

/// Insert a new user. Fails with a conflict on a duplicate username.
pub async fn create(
    pool: &Pool<Postgres>,
    username: &str,
    password_hash: &str,
    role: &str,
    badge_id: &str,
    wallet_address: Option<&str>,
) -> Result<User, AppError> {
    let sql = format!(
        "INSERT INTO users (username, password_hash, role, badge_id, wallet_address) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING {USER_COLS}"
    );
    sqlx::query_as::<_, User>(&sql)
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .bind(badge_id)
        .bind(wallet_address)
        .fetch_one(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

pub async fn find_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<User>, AppError> {
    let sql = format!("SELECT {USER_COLS} FROM users WHERE id = $1");
    sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

pub async fn find_by_username(
    pool: &Pool<Postgres>,
    username: &str,
) -> Result<Option<User>, AppError> {
    let sql = format!("SELECT {USER_COLS} FROM users WHERE username = $1");
    sqlx::query_as::<_, User>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Re-bind the wallet address recorded for a user. Last write wins.
pub async fn update_wallet(
    pool: &Pool<Postgres>,
    id: Uuid,
    wallet_address: &str,
) -> Result<(), AppError> {
    sqlx::query("UPDATE users SET wallet_address = $2 WHERE id = $1")
        .bind(id)
        .bind(wallet_address)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;
    Ok(())
}

/// Admin approval. Returns the updated row or None if the user is missing.
pub async fn set_verified(
    pool: &Pool<Postgres>,
    id: Uuid,
    verified: bool,
) -> Result<Option<User>, AppError> {
    let sql = format!("UPDATE users SET is_verified = $2 WHERE id = $1 RETURNING {USER_COLS}");
    sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .bind(verified)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Admin suspension. Users are never hard-deleted.
pub async fn set_suspended(
    pool: &Pool<Postgres>,
    id: Uuid,
    suspended: bool,
) -> Result<Option<User>, AppError> {
    let sql = format!("UPDATE users SET is_suspended = $2 WHERE id = $1 RETURNING {USER_COLS}");
    sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .bind(suspended)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

pub async fn list(pool: &Pool<Postgres>) -> Result<Vec<User>, AppError> {
    let sql = format!("SELECT {USER_COLS} FROM users ORDER BY created_at DESC");
    sqlx::query_as::<_, User>(&sql)
        .fetch_all(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}
