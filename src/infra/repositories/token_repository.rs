//! Token repository - Token Store.
//!
//! Rotation is an optimistic compare-and-swap on the `version` column so two
//! concurrent refreshes of the same token cannot both win.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::base::Executor;
use super::entities::token::{self, ActiveModel, Entity as TokenEntity};
use crate::domain::{NewToken, Token, TokenRotation};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Token repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Find token by its current access value
    async fn find_by_access_token(&self, access_token: &str) -> AppResult<Option<Token>>;

    /// Persist a freshly minted token
    async fn create(&self, token: NewToken) -> AppResult<Token>;

    /// Replace the credentials of a token if its version still matches and it
    /// has not been revoked. Returns `None` when the swap lost.
    async fn rotate(&self, rotation: TokenRotation) -> AppResult<Option<Token>>;

    /// Mark a token revoked. Returns `false` if it was already revoked or
    /// does not exist.
    async fn revoke(&self, id: Uuid) -> AppResult<bool>;
}

/// SeaORM-backed token repository.
pub struct TokenStore<E = DatabaseConnection> {
    db: E,
}

impl<E: Executor> TokenStore<E> {
    /// Create new repository instance
    pub fn new(db: E) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<E: Executor> TokenRepository for TokenStore<E> {
    async fn find_by_access_token(&self, access_token: &str) -> AppResult<Option<Token>> {
        let result = TokenEntity::find()
            .filter(token::Column::AccessToken.eq(access_token))
            .one(self.db.connection())
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Token::from))
    }

    async fn create(&self, new_token: NewToken) -> AppResult<Token> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            access_token: Set(new_token.access_token),
            refresh_token_hash: Set(new_token.refresh_token_hash),
            user_id: Set(new_token.user_id),
            ip_address: Set(new_token.ip_address),
            usage_count: Set(0),
            expires_at: Set(new_token.expires_at),
            revoked_at: Set(None),
            version: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(self.db.connection())
            .await
            .map_err(AppError::from)?;

        Ok(Token::from(model))
    }

    async fn rotate(&self, rotation: TokenRotation) -> AppResult<Option<Token>> {
        let current = TokenEntity::find_by_id(rotation.id)
            .one(self.db.connection())
            .await
            .map_err(AppError::from)?;

        let Some(current) = current else {
            return Ok(None);
        };
        if current.version != rotation.expected_version || current.revoked_at.is_some() {
            return Ok(None);
        }

        let rotated = token::Model {
            access_token: rotation.access_token,
            refresh_token_hash: rotation.refresh_token_hash,
            ip_address: rotation.ip_address,
            usage_count: current.usage_count + 1,
            expires_at: rotation.expires_at,
            version: rotation.expected_version + 1,
            updated_at: chrono::Utc::now(),
            ..current
        };

        let changes = ActiveModel {
            access_token: Set(rotated.access_token.clone()),
            refresh_token_hash: Set(rotated.refresh_token_hash.clone()),
            ip_address: Set(rotated.ip_address.clone()),
            usage_count: Set(rotated.usage_count),
            expires_at: Set(rotated.expires_at),
            version: Set(rotated.version),
            updated_at: Set(rotated.updated_at),
            ..Default::default()
        };

        let result = TokenEntity::update_many()
            .set(changes)
            .filter(token::Column::Id.eq(rotation.id))
            .filter(token::Column::Version.eq(rotation.expected_version))
            .filter(token::Column::RevokedAt.is_null())
            .exec(self.db.connection())
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        Ok(Some(Token::from(rotated)))
    }

    async fn revoke(&self, id: Uuid) -> AppResult<bool> {
        let now = chrono::Utc::now();
        let changes = ActiveModel {
            revoked_at: Set(Some(now)),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = TokenEntity::update_many()
            .set(changes)
            .filter(token::Column::Id.eq(id))
            .filter(token::Column::RevokedAt.is_null())
            .exec(self.db.connection())
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn stored(version: i32) -> token::Model {
        let now = Utc::now();
        token::Model {
            id: Uuid::new_v4(),
            access_token: "access-1".to_string(),
            refresh_token_hash: "hash-1".to_string(),
            user_id: Uuid::new_v4(),
            ip_address: "10.0.0.1".to_string(),
            usage_count: 2,
            expires_at: now + Duration::hours(1),
            revoked_at: None,
            version,
            created_at: now,
            updated_at: now,
        }
    }

    fn rotation(current: &token::Model, expected_version: i32) -> TokenRotation {
        TokenRotation {
            id: current.id,
            expected_version,
            access_token: "access-2".to_string(),
            refresh_token_hash: "hash-2".to_string(),
            ip_address: "10.0.0.2".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
        }
    }

    fn updated(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn test_rotate_applies_when_version_matches() {
        let current = stored(2);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![current.clone()]])
            .append_exec_results([updated(1)])
            .into_connection();

        let rotated = TokenStore::new(db)
            .rotate(rotation(&current, 2))
            .await
            .unwrap()
            .expect("rotation applies");

        assert_eq!(rotated.id, current.id);
        assert_eq!(rotated.access_token, "access-2");
        assert_eq!(rotated.ip_address, "10.0.0.2");
        assert_eq!(rotated.usage_count, 3);
        assert_eq!(rotated.version, 3);
    }

    #[tokio::test]
    async fn test_rotate_lost_when_update_matches_no_row() {
        let current = stored(2);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![current.clone()]])
            .append_exec_results([updated(0)])
            .into_connection();

        let result = TokenStore::new(db).rotate(rotation(&current, 2)).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_rotate_stale_version_skips_update() {
        let current = stored(3);
        // No exec result queued: issuing the update would fail the test.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![current.clone()]])
            .into_connection();

        let result = TokenStore::new(db).rotate(rotation(&current, 2)).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_rotate_revoked_token() {
        let mut current = stored(2);
        current.revoked_at = Some(Utc::now());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![current.clone()]])
            .into_connection();

        let result = TokenStore::new(db).rotate(rotation(&current, 2)).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_revoke_twice_reports_no_change() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([updated(1), updated(0)])
            .into_connection();
        let store = TokenStore::new(db);
        let id = Uuid::new_v4();

        assert!(store.revoke(id).await.unwrap());
        assert!(!store.revoke(id).await.unwrap());
    }
}
