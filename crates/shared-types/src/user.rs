use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// An actor in the workflow. Never hard-deleted; admins suspend instead.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    /// Role-scoped public identifier issued at registration
    /// (`POL-<millis>-<rand>` etc.).
    pub badge_id: String,
    /// Last wallet seen at login; last-write-wins.
    pub wallet_address: Option<String>,
    pub is_verified: bool,
    pub is_suspended: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 64, message = "username must be 3-64 characters"))]
    pub username: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    /// One of POLICE, FORENSIC, JUDGE, ADMIN.
    pub role: String,
    pub wallet_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username must not be empty"))]
    pub username: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
    /// Optional wallet re-binding; overwrites the stored address.
    pub wallet_address: Option<String>,
}

/// Public projection of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub role: String,
    pub badge_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    pub is_verified: bool,
    pub is_suspended: bool,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id.to_string(),
            username: u.username,
            role: u.role,
            badge_id: u.badge_id,
            wallet_address: u.wallet_address,
            is_verified: u.is_verified,
            is_suspended: u.is_suspended,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// Login response carrying the bearer token alongside the profile.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}
