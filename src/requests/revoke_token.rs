use async_trait::async_trait;
use validator::Validate;

use super::Request;
use crate::errors::AppResult;
use crate::services::Services;

/// Revoke the bearer's own token.
#[derive(Debug, Default, Validate)]
pub struct RevokeToken {
    #[validate(length(min = 1, message = "token must not be empty"))]
    pub token: String,
    #[validate(length(min = 1, message = "ipAddress must not be empty"))]
    pub ip_address: String,
}

#[async_trait]
impl Request for RevokeToken {
    type Response = ();

    async fn execute(self, services: &Services) -> AppResult<()> {
        services.auth.revoke_token(self.token, self.ip_address).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::requests::test_support;
    use crate::services::MockAuthService;

    #[tokio::test]
    async fn test_unknown_token_is_forbidden() {
        let mut auth = MockAuthService::new();
        auth.expect_revoke_token()
            .returning(|_, _| Err(AppError::Forbidden));
        let mediator = test_support::mediator(auth);

        let result = mediator
            .send(RevokeToken {
                token: "gone".into(),
                ip_address: "10.0.0.1".into(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Forbidden)));
    }
}
