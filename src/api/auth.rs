//! Bearer token gate for admin routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use super::state::AppState;
use super::ApiError;

/// Reject admin requests whose `Authorization: Bearer` token does not match
/// the configured one. With no token configured, admin routes are disabled.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if state.admin_token.is_empty() {
        return Err(ApiError::Forbidden(
            "Admin access is not configured".to_string(),
        ));
    }

    let header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            warn!("Admin request without Authorization header: {}", req.uri());
            ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = header.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::Unauthorized("Expected a Bearer token".to_string())
    })?;

    if !tokens_match(token.trim(), &state.admin_token) {
        warn!("Admin request with invalid token: {}", req.uri());
        return Err(ApiError::Unauthorized("Invalid token".to_string()));
    }

    Ok(next.run(req).await)
}

/// Compare without short-circuiting on the first differing byte.
fn tokens_match(given: &str, expected: &str) -> bool {
    let (a, b) = (given.as_bytes(), expected.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
