use axum::{extract::State, http::StatusCode, Json};

use shared_types::{
    AppError, LoginRequest, LoginResponse, RegisterRequest, UserResponse, UserRole, USER_ROLES,
};

use crate::activity::Activity;
use crate::auth::jwt::create_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::db::AppState;
use crate::error_convert::ValidateRequest;
use crate::ids;
use crate::repo;

/// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid request", body = AppError),
        (status = 409, description = "Username taken", body = AppError)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    body.validate_request()?;

    let role = UserRole::from_str_opt(&body.role).ok_or_else(|| {
        AppError::bad_request(format!(
            "Invalid role: {}. Valid values: {}",
            body.role,
            USER_ROLES.join(", ")
        ))
    })?;

    let password_hash = hash_password(&body.password)?;

    let badge_id = ids::new_badge_id(role);
    let user = repo::user::create(
        &state.pool,
        &body.username,
        &password_hash,
        role.as_str(),
        &badge_id,
        body.wallet_address.as_deref(),
    )
    .await?;

    if let (Some(ledger), Some(wallet)) = (&state.ledger, &user.wallet_address) {
        ledger.notify_register_role(role.as_str().to_string(), wallet.clone());
    }

    state.activity.record(
        Activity::new(
            user.id,
            role.as_str(),
            "USER_REGISTERED",
            format!("User {} registered as {}", user.username, role.as_str()),
        )
        .resource(&user.badge_id),
    );

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Bad credentials", body = AppError),
        (status = 403, description = "Account suspended", body = AppError)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    body.validate_request()?;

    let mut user = repo::user::find_by_username(&state.pool, &body.username)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid username or password"))?;

    if !verify_password(&body.password, &user.password_hash)? {
        return Err(AppError::unauthorized("Invalid username or password"));
    }

    if user.is_suspended {
        return Err(AppError::forbidden("Account is suspended"));
    }

    // Wallet re-binding: the address presented at login wins.
    if let Some(wallet) = &body.wallet_address {
        if user.wallet_address.as_deref() != Some(wallet.as_str()) {
            repo::user::update_wallet(&state.pool, user.id, wallet).await?;
            user.wallet_address = Some(wallet.clone());
        }
    }

    let token = create_access_token(user.id, &user.username, &user.role, &user.badge_id)
        .map_err(|e| AppError::internal(format!("Token creation failed: {e}")))?;

    state.activity.record(
        Activity::new(
            user.id,
            &user.role,
            "USER_LOGIN",
            format!("User {} logged in", user.username),
        )
        .resource(&user.badge_id),
    );

    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from(user),
    }))
}
