//! Authentication service - Credential checks and token lifecycle.
//!
//! Every operation that issues or mutates a token runs inside a Unit of Work
//! transaction. Transaction closures own everything they use; shared state
//! is passed in as an `Arc`.

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;

use super::token_issuer::TokenIssuer;
use crate::config::Config;
use crate::domain::{
    IssuedToken, NewToken, NewUser, Password, Session, TokenRotation, TokenState, User, UserRole,
};
use crate::errors::{AppError, AppResult, FieldError};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Verified when the username is unknown so both login paths cost one hash.
static DUMMY_PASSWORD_HASH: Lazy<String> = Lazy::new(|| {
    Password::hash_secret("karaoke-timing-equalizer")
        .map(Password::into_string)
        .expect("argon2 hashes a fixed secret")
});

/// Authentication service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account and issue its first token.
    async fn register_user(
        &self,
        username: String,
        email: String,
        password: String,
        ip_address: String,
    ) -> AppResult<IssuedToken>;

    /// Check credentials and issue a new token.
    async fn login_user(
        &self,
        username: String,
        password: String,
        ip_address: String,
    ) -> AppResult<IssuedToken>;

    /// Same contract as login, exposed as its own endpoint.
    async fn get_token(
        &self,
        username: String,
        password: String,
        ip_address: String,
    ) -> AppResult<IssuedToken>;

    /// Rotate a token using its paired refresh token.
    async fn refresh_token(
        &self,
        access_token: String,
        refresh_token: String,
        ip_address: String,
    ) -> AppResult<IssuedToken>;

    /// Revoke a token. Revoking twice is not an error.
    async fn revoke_token(&self, access_token: String, ip_address: String) -> AppResult<()>;

    /// Resolve a bearer access token to the session it belongs to.
    async fn authenticate(&self, access_token: &str) -> AppResult<Session>;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    issuer: Arc<TokenIssuer>,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: &Config) -> Self {
        Self {
            uow,
            issuer: Arc::new(TokenIssuer::new(config)),
        }
    }

    /// Look up the user and verify the password.
    async fn verify_credentials(&self, username: &str, password: &str) -> AppResult<User> {
        let user = self.uow.users().find_by_username(username).await?;

        let stored_hash = match &user {
            Some(user) => user.password_hash.clone(),
            None => (*DUMMY_PASSWORD_HASH).clone(),
        };
        let password_valid = Password::from_hash(stored_hash).verify(password);

        match user {
            Some(user) if password_valid => Ok(user),
            _ => {
                tracing::info!(username = %username, "Rejected credentials");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    /// Mint and persist a brand new token for `user`.
    async fn issue(&self, user: User, ip_address: String) -> AppResult<IssuedToken> {
        let credentials = self.issuer.issue(&user)?;
        let new_token = NewToken {
            access_token: credentials.access_token,
            refresh_token_hash: credentials.refresh_token_hash,
            user_id: user.id,
            ip_address,
            expires_at: credentials.expires_at,
        };
        let refresh_token = credentials.refresh_token;

        let token = self
            .uow
            .transaction(move |repos| {
                Box::pin(async move { repos.tokens().create(new_token).await })
            })
            .await?;

        tracing::info!(
            user_id = %user.id,
            token_id = %token.id,
            ip = %token.ip_address,
            "Token issued"
        );

        Ok(IssuedToken {
            token,
            refresh_token,
        })
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register_user(
        &self,
        username: String,
        email: String,
        password: String,
        ip_address: String,
    ) -> AppResult<IssuedToken> {
        let password_hash = Password::new(&password)?.into_string();
        let issuer = Arc::clone(&self.issuer);

        let issued = self
            .uow
            .transaction(move |repos| {
                Box::pin(async move {
                    let mut taken = Vec::new();
                    if repos.users().find_by_username(&username).await?.is_some() {
                        taken.push(FieldError::new("username", "Username is already taken"));
                    }
                    if repos.users().find_by_email(&email).await?.is_some() {
                        taken.push(FieldError::new("email", "Email is already registered"));
                    }
                    if !taken.is_empty() {
                        return Err(AppError::Validation(taken));
                    }

                    let user = repos
                        .users()
                        .create(NewUser {
                            username,
                            email,
                            password_hash,
                        })
                        .await?;

                    let credentials = issuer.issue(&user)?;
                    let token = repos
                        .tokens()
                        .create(NewToken {
                            access_token: credentials.access_token,
                            refresh_token_hash: credentials.refresh_token_hash,
                            user_id: user.id,
                            ip_address,
                            expires_at: credentials.expires_at,
                        })
                        .await?;

                    Ok(IssuedToken {
                        token,
                        refresh_token: credentials.refresh_token,
                    })
                })
            })
            .await?;

        tracing::info!(
            user_id = %issued.token.user_id,
            token_id = %issued.token.id,
            "User registered"
        );

        Ok(issued)
    }

    async fn login_user(
        &self,
        username: String,
        password: String,
        ip_address: String,
    ) -> AppResult<IssuedToken> {
        let user = self.verify_credentials(&username, &password).await?;
        tracing::debug!(user_id = %user.id, "Login accepted");
        self.issue(user, ip_address).await
    }

    async fn get_token(
        &self,
        username: String,
        password: String,
        ip_address: String,
    ) -> AppResult<IssuedToken> {
        let user = self.verify_credentials(&username, &password).await?;
        tracing::debug!(user_id = %user.id, "Token request accepted");
        self.issue(user, ip_address).await
    }

    async fn refresh_token(
        &self,
        access_token: String,
        refresh_token: String,
        ip_address: String,
    ) -> AppResult<IssuedToken> {
        let issuer = Arc::clone(&self.issuer);

        let issued = self
            .uow
            .transaction(move |repos| {
                Box::pin(async move {
                    let current = repos
                        .tokens()
                        .find_by_access_token(&access_token)
                        .await?
                        .ok_or(AppError::Forbidden)?;

                    if !current.verify_refresh_token(&refresh_token) {
                        tracing::warn!(token_id = %current.id, "Refresh token mismatch");
                        return Err(AppError::Forbidden);
                    }

                    match current.state() {
                        TokenState::Revoked => return Err(AppError::Forbidden),
                        TokenState::Expired => return Err(AppError::TokenExpired),
                        TokenState::Active => {}
                    }

                    if current.ip_address != ip_address {
                        tracing::warn!(
                            token_id = %current.id,
                            issued_ip = %current.ip_address,
                            ip = %ip_address,
                            "Token refreshed from a different address"
                        );
                    }

                    let user = repos
                        .users()
                        .find_by_id(current.user_id)
                        .await?
                        .ok_or(AppError::Forbidden)?;

                    let credentials = issuer.issue(&user)?;
                    let rotated = repos
                        .tokens()
                        .rotate(TokenRotation {
                            id: current.id,
                            expected_version: current.version,
                            access_token: credentials.access_token,
                            refresh_token_hash: credentials.refresh_token_hash,
                            ip_address,
                            expires_at: credentials.expires_at,
                        })
                        .await?;

                    let Some(token) = rotated else {
                        tracing::warn!(token_id = %current.id, "Lost concurrent rotation");
                        return Err(AppError::Forbidden);
                    };

                    Ok(IssuedToken {
                        token,
                        refresh_token: credentials.refresh_token,
                    })
                })
            })
            .await?;

        tracing::info!(
            token_id = %issued.token.id,
            usage_count = issued.token.usage_count,
            "Token refreshed"
        );

        Ok(issued)
    }

    async fn revoke_token(&self, access_token: String, ip_address: String) -> AppResult<()> {
        let (token, newly_revoked) = self
            .uow
            .transaction(move |repos| {
                Box::pin(async move {
                    let token = repos
                        .tokens()
                        .find_by_access_token(&access_token)
                        .await?
                        .ok_or(AppError::Forbidden)?;
                    let newly_revoked = repos.tokens().revoke(token.id).await?;
                    Ok((token, newly_revoked))
                })
            })
            .await?;

        if newly_revoked {
            tracing::info!(
                token_id = %token.id,
                user_id = %token.user_id,
                ip = %ip_address,
                "Token revoked"
            );
        } else {
            tracing::debug!(token_id = %token.id, "Token already revoked");
        }

        Ok(())
    }

    async fn authenticate(&self, access_token: &str) -> AppResult<Session> {
        let claims = self.issuer.decode(access_token).map_err(|e| match e {
            AppError::TokenExpired => AppError::TokenExpired,
            _ => AppError::Unauthorized,
        })?;

        let token = self
            .uow
            .tokens()
            .find_by_access_token(access_token)
            .await?
            .filter(|token| token.user_id == claims.sub)
            .ok_or(AppError::Unauthorized)?;

        match token.state() {
            TokenState::Revoked => Err(AppError::Unauthorized),
            TokenState::Expired => Err(AppError::TokenExpired),
            TokenState::Active => Ok(Session {
                user_id: token.user_id,
                username: claims.username,
                role: UserRole::from(claims.role.as_str()),
                access_token: token.access_token,
            }),
        }
    }
}
