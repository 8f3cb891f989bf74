//! Access and refresh credential minting.
//!
//! Access tokens are HS256 JWTs; refresh tokens are random hex strings that
//! are only ever persisted as Argon2 hashes.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{Password, User};
use crate::errors::{AppError, AppResult};

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub role: String,
    /// Fresh per mint so two tokens issued in the same second still differ
    pub jti: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly minted credential pair, before it is persisted.
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: String,
    pub refresh_token_hash: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies access tokens.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(config: &Config) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret_bytes()),
            ttl: Duration::seconds(config.access_token_ttl_seconds),
        }
    }

    /// Mint a new access/refresh pair for `user`.
    pub fn issue(&self, user: &User) -> AppResult<Credentials> {
        let now = Utc::now();
        let expires_at = now + self.ttl;

        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            role: user.role.to_string(),
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign access token: {e}")))?;

        let refresh_token = generate_refresh_token();
        let refresh_token_hash = Password::hash_secret(&refresh_token)?.into_string();

        Ok(Credentials {
            access_token,
            refresh_token,
            refresh_token_hash,
            expires_at,
        })
    }

    /// Verify the signature and expiry of an access token.
    pub fn decode(&self, access_token: &str) -> AppResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(access_token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::Jwt(e),
            })
    }
}

/// 64 hex characters drawn from the OS random source.
fn generate_refresh_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;

    fn config() -> Config {
        Config::new("postgres://localhost/test", "test-secret-key-minimum-32-chars!!")
            .expect("valid config")
    }

    fn user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password_hash: String::new(),
            role: UserRole::User,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_issue_and_decode() {
        let issuer = TokenIssuer::new(&config());
        let user = user();

        let credentials = issuer.issue(&user).unwrap();
        let claims = issuer.decode(&credentials.access_token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, "user");
        assert_eq!(claims.exp, credentials.expires_at.timestamp());
    }

    #[test]
    fn test_consecutive_mints_differ() {
        let issuer = TokenIssuer::new(&config());
        let user = user();

        let first = issuer.issue(&user).unwrap();
        let second = issuer.issue(&user).unwrap();

        assert_ne!(first.access_token, second.access_token);
        assert_ne!(first.refresh_token, second.refresh_token);
    }

    #[test]
    fn test_refresh_token_is_hashed() {
        let issuer = TokenIssuer::new(&config());
        let credentials = issuer.issue(&user()).unwrap();

        assert_eq!(credentials.refresh_token.len(), 64);
        assert_ne!(credentials.refresh_token, credentials.refresh_token_hash);
        assert!(Password::from_hash(credentials.refresh_token_hash).verify(&credentials.refresh_token));
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let issuer = TokenIssuer::new(&config());
        let other = Config::new("postgres://localhost/test", "another-secret-key-minimum-32-chars")
            .unwrap();
        let credentials = TokenIssuer::new(&other).issue(&user()).unwrap();

        assert!(matches!(
            issuer.decode(&credentials.access_token),
            Err(AppError::Jwt(_))
        ));
    }

    #[test]
    fn test_expired_access_token() {
        let issuer = TokenIssuer::new(&config().with_access_token_ttl(-120));
        let credentials = issuer.issue(&user()).unwrap();

        assert!(matches!(
            issuer.decode(&credentials.access_token),
            Err(AppError::TokenExpired)
        ));
    }
}
