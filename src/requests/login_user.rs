use async_trait::async_trait;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::{Request, TokenResponse};
use crate::errors::AppResult;
use crate::services::Services;

/// User login request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginUser {
    #[validate(length(min = 1, message = "username must not be empty"))]
    #[schema(example = "alice")]
    pub username: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    #[schema(example = "Pw1!")]
    pub password: String,
    #[serde(skip)]
    #[validate(length(min = 1, message = "ipAddress must not be empty"))]
    pub ip_address: String,
}

#[async_trait]
impl Request for LoginUser {
    type Response = TokenResponse;

    async fn execute(self, services: &Services) -> AppResult<TokenResponse> {
        services
            .auth
            .login_user(self.username, self.password, self.ip_address)
            .await
            .map(TokenResponse::from)
    }
}
