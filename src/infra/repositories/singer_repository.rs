//! Singer repository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use super::base::Executor;
use super::entities::singer::{self, ActiveModel, Entity as SingerEntity};
use crate::domain::{NewSinger, Singer};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Singer repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SingerRepository: Send + Sync {
    /// Find singer by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Singer>>;

    /// List all singers ordered by name
    async fn list(&self) -> AppResult<Vec<Singer>>;

    /// Create a new singer
    async fn create(&self, singer: NewSinger) -> AppResult<Singer>;
}

/// SeaORM-backed singer repository.
pub struct SingerStore<E = DatabaseConnection> {
    db: E,
}

impl<E: Executor> SingerStore<E> {
    /// Create new repository instance
    pub fn new(db: E) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<E: Executor> SingerRepository for SingerStore<E> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Singer>> {
        let result = SingerEntity::find_by_id(id)
            .one(self.db.connection())
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Singer::from))
    }

    async fn list(&self) -> AppResult<Vec<Singer>> {
        let models = SingerEntity::find()
            .order_by_asc(singer::Column::Name)
            .all(self.db.connection())
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Singer::from).collect())
    }

    async fn create(&self, new_singer: NewSinger) -> AppResult<Singer> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new_singer.name),
            nickname: Set(new_singer.nickname),
            birthday: Set(new_singer.birthday),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(self.db.connection())
            .await
            .map_err(AppError::from)?;

        Ok(Singer::from(model))
    }
}
