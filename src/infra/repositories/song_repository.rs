//! Song repository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use super::base::{map_reference_error, Executor};
use super::entities::song::{self, ActiveModel, Entity as SongEntity};
use crate::domain::{NewSong, Song};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Song repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SongRepository: Send + Sync {
    /// Find song by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Song>>;

    /// List all songs ordered by title
    async fn list(&self) -> AppResult<Vec<Song>>;

    /// Create a new song
    async fn create(&self, song: NewSong) -> AppResult<Song>;
}

/// SeaORM-backed song repository.
pub struct SongStore<E = DatabaseConnection> {
    db: E,
}

impl<E: Executor> SongStore<E> {
    /// Create new repository instance
    pub fn new(db: E) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<E: Executor> SongRepository for SongStore<E> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Song>> {
        let result = SongEntity::find_by_id(id)
            .one(self.db.connection())
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Song::from))
    }

    async fn list(&self) -> AppResult<Vec<Song>> {
        let models = SongEntity::find()
            .order_by_asc(song::Column::Title)
            .all(self.db.connection())
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Song::from).collect())
    }

    async fn create(&self, new_song: NewSong) -> AppResult<Song> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(new_song.title),
            album_id: Set(new_song.album_id),
            singer_id: Set(new_song.singer_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(self.db.connection())
            .await
            .map_err(map_reference_error)?;

        Ok(Song::from(model))
    }
}
