use axum::extract::Request;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use super::jwt::validate_access_token;

/// Permissive auth middleware.
///
/// Validates the Bearer token (when present) and inserts the decoded
/// `Claims` into request extensions. Does NOT reject unauthenticated
/// requests — downstream extractors decide authorization.
pub async fn auth_middleware(mut req: Request, next: Next) -> Response {
    if let Some(token) = extract_bearer_token(&req) {
        if let Ok(claims) = validate_access_token(&token) {
            req.extensions_mut().insert(claims);
        }
    }

    next.run(req).await
}

fn extract_bearer_token(req: &Request) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
}
