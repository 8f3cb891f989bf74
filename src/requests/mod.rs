//! Request handlers dispatched through the mediator.
//!
//! Each request type carries its own field rules and knows which service
//! operation answers it. The mediator validates a request before executing
//! it, so handlers never see an empty field.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::config::TOKEN_TYPE_BEARER;
use crate::domain::IssuedToken;
use crate::errors::AppResult;
use crate::services::Services;

mod create_album;
mod create_singer;
mod create_song;
mod create_tag;
mod get_token;
mod login_user;
mod refresh_token;
mod register_user;
mod revoke_token;

pub use create_album::CreateAlbum;
pub use create_singer::CreateSinger;
pub use create_song::CreateSong;
pub use create_tag::CreateTag;
pub use get_token::GetToken;
pub use login_user::LoginUser;
pub use refresh_token::RefreshToken;
pub use register_user::RegisterUser;
pub use revoke_token::RevokeToken;

/// A validated unit of work answered by one of the services.
#[async_trait]
pub trait Request: Validate + Send + Sized {
    type Response: Send;

    async fn execute(self, services: &Services) -> AppResult<Self::Response>;
}

/// Dispatches requests to their handlers.
#[derive(Clone)]
pub struct Mediator {
    services: Services,
}

impl Mediator {
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    /// Validate `request`, then run it.
    pub async fn send<R: Request>(&self, request: R) -> AppResult<R::Response> {
        request.validate()?;
        request.execute(&self.services).await
    }
}

/// Token pair returned by every issuing endpoint
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Refresh token, shown only once
    #[schema(example = "3f2b8c0e9a4d4c1f8e7b6a5d4c3b2a1f0e9d8c7b6a5f4e3d2c1b0a9f8e7d6c5b")]
    pub refresh_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Seconds until the access token expires
    #[schema(example = 3600)]
    pub expires_in: i64,
    pub expires_at: DateTime<Utc>,
    /// Number of times this token has been refreshed
    #[schema(example = 0)]
    pub usage_count: i32,
}

impl From<IssuedToken> for TokenResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            expires_in: issued.token.expires_in(),
            access_token: issued.token.access_token,
            refresh_token: issued.refresh_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_at: issued.token.expires_at,
            usage_count: issued.token.usage_count,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_from_issued() {
        let response = TokenResponse::from(test_support::issued(2));

        assert_eq!(response.access_token, "access");
        assert_eq!(response.refresh_token, "refresh");
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.usage_count, 2);
        assert!(response.expires_in > 3500 && response.expires_in <= 3600);
    }

    #[test]
    fn test_token_response_uses_camel_case() {
        let json = serde_json::to_value(TokenResponse::from(test_support::issued(0))).unwrap();

        assert!(json.get("accessToken").is_some());
        assert!(json.get("refreshToken").is_some());
        assert!(json.get("expiresIn").is_some());
        assert!(json.get("usageCount").is_some());
    }
}
