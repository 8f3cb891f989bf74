//! Issued token entity and its lifecycle.
//!
//! A token pairs a short-lived access value with a refresh credential. The
//! stored row keeps its id across rotations; the access value, refresh hash
//! and expiry are replaced on every refresh.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{Password, UserRole};

/// Lifecycle state of a stored token at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenState {
    Active,
    Expired,
    Revoked,
}

/// Token domain entity
#[derive(Debug, Clone, Serialize)]
pub struct Token {
    pub id: Uuid,
    pub access_token: String,
    #[serde(skip_serializing)]
    pub refresh_token_hash: String,
    pub user_id: Uuid,
    pub ip_address: String,
    pub usage_count: i32,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    /// Bumped on every rotation; a rotation only applies if it still matches.
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Token {
    /// Seconds until expiry relative to `now`. Negative once expired.
    pub fn expires_in_at(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds()
    }

    /// Seconds until expiry. Negative once expired.
    pub fn expires_in(&self) -> i64 {
        self.expires_in_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Revocation wins over expiry.
    pub fn state_at(&self, now: DateTime<Utc>) -> TokenState {
        if self.is_revoked() {
            TokenState::Revoked
        } else if self.is_expired_at(now) {
            TokenState::Expired
        } else {
            TokenState::Active
        }
    }

    pub fn state(&self) -> TokenState {
        self.state_at(Utc::now())
    }

    /// Check a presented refresh token against the stored hash.
    pub fn verify_refresh_token(&self, candidate: &str) -> bool {
        Password::from_hash(self.refresh_token_hash.clone()).verify(candidate)
    }
}

/// Data needed to persist a newly minted token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewToken {
    pub access_token: String,
    pub refresh_token_hash: String,
    pub user_id: Uuid,
    pub ip_address: String,
    pub expires_at: DateTime<Utc>,
}

/// Compare-and-swap replacement of a token's credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRotation {
    pub id: Uuid,
    /// Version read before the rotation was decided
    pub expected_version: i32,
    pub access_token: String,
    pub refresh_token_hash: String,
    pub ip_address: String,
    pub expires_at: DateTime<Utc>,
}

/// A persisted token together with the plaintext refresh token.
///
/// The plaintext only exists at issuance; the store keeps the hash.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: Token,
    pub refresh_token: String,
}

/// Identity resolved from a valid bearer access token.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Uuid,
    pub username: String,
    pub role: UserRole,
    pub access_token: String,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token_expiring_at(expires_at: DateTime<Utc>) -> Token {
        let now = Utc::now();
        Token {
            id: Uuid::new_v4(),
            access_token: "access".to_string(),
            refresh_token_hash: String::new(),
            user_id: Uuid::new_v4(),
            ip_address: "127.0.0.1".to_string(),
            usage_count: 0,
            expires_at,
            revoked_at: None,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_fresh_token_is_active() {
        let now = Utc::now();
        let token = token_expiring_at(now + Duration::hours(1));

        assert!(!token.is_expired_at(now));
        assert_eq!(token.state_at(now), TokenState::Active);
        assert_eq!(token.expires_in_at(now), 3600);
    }

    #[test]
    fn test_expiry_is_inclusive() {
        let now = Utc::now();
        let token = token_expiring_at(now);

        assert!(token.is_expired_at(now));
        assert_eq!(token.expires_in_at(now), 0);
    }

    #[test]
    fn test_past_expiry_reports_negative_seconds() {
        let now = Utc::now();
        let token = token_expiring_at(now - Duration::seconds(90));

        assert!(token.is_expired());
        assert_eq!(token.expires_in_at(now), -90);
        assert_eq!(token.state_at(now), TokenState::Expired);
    }

    #[test]
    fn test_revoked_wins_over_expired() {
        let now = Utc::now();
        let mut token = token_expiring_at(now - Duration::seconds(1));
        token.revoked_at = Some(now);

        assert_eq!(token.state_at(now), TokenState::Revoked);
    }

    #[test]
    fn test_verify_refresh_token() {
        let mut token = token_expiring_at(Utc::now() + Duration::hours(1));
        token.refresh_token_hash = Password::hash_secret("refresh-secret")
            .unwrap()
            .into_string();

        assert!(token.verify_refresh_token("refresh-secret"));
        assert!(!token.verify_refresh_token("other-secret"));
    }
}
