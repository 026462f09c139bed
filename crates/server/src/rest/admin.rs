use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use shared_types::{
    is_valid_activity_action, ActivityLogResponse, ActivitySearchResponse, AppError, UserResponse,
    ACTIVITY_ACTIONS,
};

use crate::activity::Activity;
use crate::auth::RoleRequired;
use crate::db::AppState;
use crate::repo;

/// GET /api/admin/users
#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "All users, newest first", body = Vec<UserResponse>),
        (status = 403, description = "Admin role required", body = AppError)
    ),
    tag = "admin"
)]
pub async fn list_users(
    State(state): State<AppState>,
    RoleRequired(_claims): RoleRequired<4>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = repo::user::list(&state.pool).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// POST /api/admin/users/{id}/approve
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/approve",
    params(("id" = Uuid, Path, description = "User UUID")),
    responses(
        (status = 200, description = "User verified", body = UserResponse),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "admin"
)]
pub async fn approve_user(
    State(state): State<AppState>,
    RoleRequired(claims): RoleRequired<4>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let user = repo::user::set_verified(&state.pool, id, true)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", id)))?;

    state.activity.record(
        Activity::new(
            claims.sub,
            &claims.role,
            "USER_APPROVED",
            format!("User {} verified", user.username),
        )
        .resource(&user.badge_id),
    );

    Ok(Json(UserResponse::from(user)))
}

/// POST /api/admin/users/{id}/suspend
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/suspend",
    params(("id" = Uuid, Path, description = "User UUID")),
    responses(
        (status = 200, description = "User suspended", body = UserResponse),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "admin"
)]
pub async fn suspend_user(
    State(state): State<AppState>,
    RoleRequired(claims): RoleRequired<4>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let user = repo::user::set_suspended(&state.pool, id, true)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", id)))?;

    state.activity.record(
        Activity::new(
            claims.sub,
            &claims.role,
            "USER_SUSPENDED",
            format!("User {} suspended", user.username),
        )
        .resource(&user.badge_id),
    );

    Ok(Json(UserResponse::from(user)))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ActivityQuery {
    /// Filter by public case identifier.
    pub case_ref: Option<String>,
    /// Filter by action name.
    pub action: Option<String>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /api/admin/activity
#[utoipa::path(
    get,
    path = "/api/admin/activity",
    params(ActivityQuery),
    responses(
        (status = 200, description = "Audit entries, newest first", body = ActivitySearchResponse),
        (status = 400, description = "Unknown action filter", body = AppError),
        (status = 403, description = "Admin role required", body = AppError)
    ),
    tag = "admin"
)]
pub async fn search_activity(
    State(state): State<AppState>,
    RoleRequired(_claims): RoleRequired<4>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<ActivitySearchResponse>, AppError> {
    if let Some(action) = &query.action {
        if !is_valid_activity_action(action) {
            return Err(AppError::bad_request(format!(
                "Unknown action: {}. Valid values: {}",
                action,
                ACTIVITY_ACTIONS.join(", ")
            )));
        }
    }

    let offset = query.offset.unwrap_or(0).max(0);
    let limit = query.limit.unwrap_or(50).clamp(1, 200);

    let (entries, total) = repo::activity::search(
        &state.pool,
        query.case_ref.as_deref(),
        query.action.as_deref(),
        offset,
        limit,
    )
    .await?;

    Ok(Json(ActivitySearchResponse {
        entries: entries.into_iter().map(ActivityLogResponse::from).collect(),
        total,
    }))
}
