use async_trait::async_trait;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::{Request, TokenResponse};
use crate::errors::AppResult;
use crate::services::Services;

/// Refresh request carrying the current token pair
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct RefreshToken {
    /// Current access token
    #[validate(length(min = 1, message = "token must not be empty"))]
    pub token: String,
    #[validate(length(min = 1, message = "refreshToken must not be empty"))]
    pub refresh_token: String,
    #[serde(skip)]
    #[validate(length(min = 1, message = "ipAddress must not be empty"))]
    pub ip_address: String,
}

#[async_trait]
impl Request for RefreshToken {
    type Response = TokenResponse;

    async fn execute(self, services: &Services) -> AppResult<TokenResponse> {
        services
            .auth
            .refresh_token(self.token, self.refresh_token, self.ip_address)
            .await
            .map(TokenResponse::from)
    }
}
