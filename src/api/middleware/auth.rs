//! Bearer token authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::Session;
use crate::errors::AppError;

/// Bearer authentication middleware.
///
/// Resolves the access token from the Authorization header against the token
/// store, then injects the `Session` into the request extensions. Any
/// caller-side failure, expiry included, is reported as 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let session = state
        .auth_service
        .authenticate(token)
        .await
        .map_err(|e| if e.is_unexpected() { e } else { AppError::Unauthorized })?;

    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}

/// Require admin role, returns Forbidden error if not admin.
pub fn require_admin(session: &Session) -> Result<(), AppError> {
    if session.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Admin-only guard. Must run after `auth_middleware` has attached the session.
pub async fn admin_middleware(request: Request, next: Next) -> Result<Response, AppError> {
    let session = request
        .extensions()
        .get::<Session>()
        .ok_or(AppError::Unauthorized)?;

    if let Err(err) = require_admin(session) {
        tracing::warn!(user_id = %session.user_id, "Admin route refused");
        return Err(err);
    }

    Ok(next.run(request).await)
}
