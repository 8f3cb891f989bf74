//! Authentication handlers.
//!
//! Each endpoint fills in the client address and hands the request to the
//! mediator; status codes come from `AppError`.

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::Json,
    routing::post,
    Extension, Router,
};

use crate::api::extractors::{ClientIp, JsonBody};
use crate::api::middleware::auth_middleware;
use crate::api::AppState;
use crate::domain::Session;
use crate::errors::{AppResult, ErrorResponse};
use crate::requests::{GetToken, LoginUser, RefreshToken, RegisterUser, RevokeToken, TokenResponse};

/// Create authentication routes
pub fn auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/Register", post(register_user))
        .route("/Login", post(login_user))
        .route("/GetToken", post(get_token))
        .route("/RefreshToken", post(refresh_token))
        .route(
            "/RevokeToken",
            post(revoke_token).route_layer(middleware::from_fn_with_state(state, auth_middleware)),
        )
}

/// Register a new user and issue their first token
#[utoipa::path(
    post,
    path = "/Auth/Register",
    tag = "Authentication",
    request_body = RegisterUser,
    responses(
        (status = 201, description = "User registered", body = TokenResponse),
        (status = 400, description = "Validation error", body = ErrorResponse)
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    ClientIp(ip_address): ClientIp,
    JsonBody(mut request): JsonBody<RegisterUser>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    tracing::debug!(username = %request.username, ip = %ip_address, "Register request");
    request.ip_address = ip_address;

    let response = state.mediator.send(request).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Login and get a token pair
#[utoipa::path(
    post,
    path = "/Auth/Login",
    tag = "Authentication",
    request_body = LoginUser,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error or invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login_user(
    State(state): State<AppState>,
    ClientIp(ip_address): ClientIp,
    JsonBody(mut request): JsonBody<LoginUser>,
) -> AppResult<Json<TokenResponse>> {
    tracing::debug!(username = %request.username, ip = %ip_address, "Login request");
    request.ip_address = ip_address;

    let response = state.mediator.send(request).await?;

    Ok(Json(response))
}

/// Get a token pair for username and password
#[utoipa::path(
    post,
    path = "/Auth/GetToken",
    tag = "Authentication",
    request_body = GetToken,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn get_token(
    State(state): State<AppState>,
    ClientIp(ip_address): ClientIp,
    JsonBody(mut request): JsonBody<GetToken>,
) -> AppResult<Json<TokenResponse>> {
    request.ip_address = ip_address;

    let response = state.mediator.send(request).await?;

    Ok(Json(response))
}

/// Exchange a token pair for a new one
#[utoipa::path(
    post,
    path = "/Auth/RefreshToken",
    tag = "Authentication",
    request_body = RefreshToken,
    responses(
        (status = 200, description = "Token rotated", body = TokenResponse),
        (status = 400, description = "Validation error or expired token", body = ErrorResponse),
        (status = 403, description = "Unknown, revoked or already rotated token", body = ErrorResponse)
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    ClientIp(ip_address): ClientIp,
    JsonBody(mut request): JsonBody<RefreshToken>,
) -> AppResult<Json<TokenResponse>> {
    request.ip_address = ip_address;

    let response = state.mediator.send(request).await?;

    Ok(Json(response))
}

/// Revoke the bearer token
#[utoipa::path(
    post,
    path = "/Auth/RevokeToken",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Token revoked"),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse)
    )
)]
pub async fn revoke_token(
    State(state): State<AppState>,
    ClientIp(ip_address): ClientIp,
    Extension(session): Extension<Session>,
) -> AppResult<StatusCode> {
    tracing::debug!(user_id = %session.user_id, "Revoke request");

    state
        .mediator
        .send(RevokeToken {
            token: session.access_token,
            ip_address,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
