use axum::{extract::FromRequestParts, http::request::Parts};
use shared_types::{AppError, UserRole};

use super::jwt::Claims;

/// Extractor that requires authentication. Returns 401 if no valid token.
pub struct AuthRequired(pub Claims);

impl<S: Send + Sync> FromRequestParts<S> for AuthRequired {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthRequired)
            .ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}

/// Extractor that requires authentication AND an exact workflow role.
/// Returns 401 if unauthenticated, 403 on a role mismatch.
///
/// Role permissions in this workflow are disjoint — no role satisfies
/// another's actions, admin included.
///
/// Role constants (match `UserRole` variants):
/// - 1 = Police
/// - 2 = Forensic
/// - 3 = Judge
/// - 4 = Admin
pub struct RoleRequired<const ROLE: u8>(pub Claims);

impl<const ROLE: u8, S: Send + Sync> FromRequestParts<S> for RoleRequired<ROLE> {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<Claims>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("Authentication required"))?;

        let required = match ROLE {
            1 => UserRole::Police,
            2 => UserRole::Forensic,
            3 => UserRole::Judge,
            _ => UserRole::Admin,
        };

        let actual = UserRole::from_str_opt(&claims.role);
        if actual != Some(required) {
            return Err(AppError::forbidden(format!(
                "{} role required",
                required.as_str()
            )));
        }

        Ok(RoleRequired(claims))
    }
}
