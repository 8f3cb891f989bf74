use async_trait::async_trait;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::{Request, TokenResponse};
use crate::errors::AppResult;
use crate::services::Services;

/// Token request by username and password
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct GetToken {
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
impl Request for GetToken {
    type Response = TokenResponse;

    /// Bad credentials surface as 403 on this endpoint.
    async fn execute(self, services: &Services) -> AppResult<TokenResponse> {
        services
            .auth
            .get_token(self.username, self.password, self.ip_address)
            .await
            .map(TokenResponse::from)
            .map_err(|e| e.credentials_forbidden())
    }
}
