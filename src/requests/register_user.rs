use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::{Request, TokenResponse};
use crate::config::{MAX_USERNAME_LENGTH, MIN_USERNAME_LENGTH};
use crate::errors::AppResult;
use crate::services::Services;

/// Letters, digits, '_', '.' and '-'. Emptiness is left to the length rule.
static USERNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-]*$").expect("username pattern is valid"));

/// User registration request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterUser {
    #[validate(
        length(
            min = MIN_USERNAME_LENGTH,
            max = MAX_USERNAME_LENGTH,
            message = "Username must be between 3 and 32 characters"
        ),
        regex(
            path = *USERNAME_PATTERN,
            message = "Username may only contain letters, digits, '_', '.' and '-'"
        )
    )]
    #[schema(example = "alice", min_length = 3, max_length = 32)]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    #[schema(example = "Pw1!")]
    pub password: String,
    /// Filled from the connection, never from the body
    #[serde(skip)]
    #[validate(length(min = 1, message = "ipAddress must not be empty"))]
    pub ip_address: String,
}

#[async_trait]
impl Request for RegisterUser {
    type Response = TokenResponse;

    async fn execute(self, services: &Services) -> AppResult<TokenResponse> {
        services
            .auth
            .register_user(self.username, self.email, self.password, self.ip_address)
            .await
            .map(TokenResponse::from)
    }
}
