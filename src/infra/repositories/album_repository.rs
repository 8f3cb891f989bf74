//! Album repository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use super::base::{map_reference_error, Executor};
use super::entities::album::{self, ActiveModel, Entity as AlbumEntity};
use crate::domain::{Album, NewAlbum};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Album repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AlbumRepository: Send + Sync {
    /// Find album by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Album>>;

    /// List all albums ordered by title
    async fn list(&self) -> AppResult<Vec<Album>>;

    /// Create a new album
    async fn create(&self, album: NewAlbum) -> AppResult<Album>;
}

/// SeaORM-backed album repository.
pub struct AlbumStore<E = DatabaseConnection> {
    db: E,
}

impl<E: Executor> AlbumStore<E> {
    /// Create new repository instance
    pub fn new(db: E) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<E: Executor> AlbumRepository for AlbumStore<E> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Album>> {
        let result = AlbumEntity::find_by_id(id)
            .one(self.db.connection())
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Album::from))
    }

    async fn list(&self) -> AppResult<Vec<Album>> {
        let models = AlbumEntity::find()
            .order_by_asc(album::Column::Title)
            .all(self.db.connection())
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Album::from).collect())
    }

    async fn create(&self, new_album: NewAlbum) -> AppResult<Album> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(new_album.title),
            singer_id: Set(new_album.singer_id),
            release_year: Set(new_album.release_year),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(self.db.connection())
            .await
            .map_err(map_reference_error)?;

        Ok(Album::from(model))
    }
}
