//! Unit of Work pattern implementation.
//!
//! Centralizes access to the user and token repositories and runs
//! multi-step operations inside a single database transaction, so a token is
//! never issued without being persisted and a user is never created without
//! its first token.

use async_trait::async_trait;
use futures::future::BoxFuture;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};

use super::repositories::{TokenRepository, TokenStore, UserRepository, UserStore};
use crate::errors::{AppError, AppResult};

/// Access to every repository, either pooled or transaction-bound.
pub trait Repositories: Send + Sync {
    /// Get user repository
    fn users(&self) -> &dyn UserRepository;

    /// Get token repository
    fn tokens(&self) -> &dyn TokenRepository;
}

/// Unit of Work trait for dependency injection.
///
/// Not object safe because of the generic transaction method; services are
/// generic over it instead.
#[async_trait]
pub trait UnitOfWork: Repositories {
    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed if the closure returns `Ok` and rolled
    /// back otherwise. Uses ReadCommitted isolation; token rotation relies on
    /// its own version check rather than on serializable isolation.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(&'a dyn Repositories) -> BoxFuture<'a, AppResult<T>> + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
pub struct TransactionContext<'a> {
    users: UserStore<&'a DatabaseTransaction>,
    tokens: TokenStore<&'a DatabaseTransaction>,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self {
            users: UserStore::new(txn),
            tokens: TokenStore::new(txn),
        }
    }
}

impl Repositories for TransactionContext<'_> {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn tokens(&self) -> &dyn TokenRepository {
        &self.tokens
    }
}

/// Concrete implementation of UnitOfWork over a SeaORM connection pool.
pub struct Persistence {
    db: DatabaseConnection,
    users: UserStore,
    tokens: TokenStore,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: UserStore::new(db.clone()),
            tokens: TokenStore::new(db.clone()),
            db,
        }
    }
}

impl Repositories for Persistence {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn tokens(&self) -> &dyn TokenRepository {
        &self.tokens
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(&'a dyn Repositories) -> BoxFuture<'a, AppResult<T>> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)?;

        let result = {
            let ctx = TransactionContext::new(&txn);
            f(&ctx).await
        };

        match result {
            Ok(value) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}
