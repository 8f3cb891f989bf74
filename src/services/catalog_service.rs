//! Catalog service - singers, albums, songs and tags.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Album, NewAlbum, NewSinger, NewSong, Singer, Song, Tag};
use crate::errors::{AppError, AppResult, FieldError};
use crate::infra::{AlbumRepository, SingerRepository, SongRepository, TagRepository};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Catalog service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn get_album(&self, id: Uuid) -> AppResult<Album>;

    async fn list_albums(&self) -> AppResult<Vec<Album>>;

    /// Create an album. The credited singer, if any, must exist.
    async fn create_album(&self, album: NewAlbum) -> AppResult<Album>;

    async fn get_song(&self, id: Uuid) -> AppResult<Song>;

    async fn list_songs(&self) -> AppResult<Vec<Song>>;

    /// Create a song. Referenced album and singer must exist.
    async fn create_song(&self, song: NewSong) -> AppResult<Song>;

    async fn get_singer(&self, id: Uuid) -> AppResult<Singer>;

    async fn list_singers(&self) -> AppResult<Vec<Singer>>;

    async fn create_singer(&self, singer: NewSinger) -> AppResult<Singer>;

    async fn get_tag(&self, id: Uuid) -> AppResult<Tag>;

    /// Return the tag with this name, creating it on first use.
    async fn get_or_create_tag(&self, name: String) -> AppResult<Tag>;
}

/// Concrete implementation of CatalogService over the catalog stores.
pub struct CatalogManager {
    albums: Arc<dyn AlbumRepository>,
    songs: Arc<dyn SongRepository>,
    singers: Arc<dyn SingerRepository>,
    tags: Arc<dyn TagRepository>,
}

impl CatalogManager {
    pub fn new(
        albums: Arc<dyn AlbumRepository>,
        songs: Arc<dyn SongRepository>,
        singers: Arc<dyn SingerRepository>,
        tags: Arc<dyn TagRepository>,
    ) -> Self {
        Self {
            albums,
            songs,
            singers,
            tags,
        }
    }

    /// Collect a field error for every reference that points nowhere.
    async fn check_references(
        &self,
        album_id: Option<Uuid>,
        singer_id: Option<Uuid>,
    ) -> AppResult<()> {
        let mut missing = Vec::new();
        if let Some(id) = album_id {
            if self.albums.find_by_id(id).await?.is_none() {
                missing.push(FieldError::new("albumId", "Album does not exist"));
            }
        }
        if let Some(id) = singer_id {
            if self.singers.find_by_id(id).await?.is_none() {
                missing.push(FieldError::new("singerId", "Singer does not exist"));
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(missing))
        }
    }
}

#[async_trait]
impl CatalogService for CatalogManager {
    async fn get_album(&self, id: Uuid) -> AppResult<Album> {
        self.albums.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    async fn list_albums(&self) -> AppResult<Vec<Album>> {
        self.albums.list().await
    }

    async fn create_album(&self, album: NewAlbum) -> AppResult<Album> {
        self.check_references(None, album.singer_id).await?;
        let created = self.albums.create(album).await?;
        tracing::info!(album_id = %created.id, title = %created.title, "Album created");
        Ok(created)
    }

    async fn get_song(&self, id: Uuid) -> AppResult<Song> {
        self.songs.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    async fn list_songs(&self) -> AppResult<Vec<Song>> {
        self.songs.list().await
    }

    async fn create_song(&self, song: NewSong) -> AppResult<Song> {
        self.check_references(song.album_id, song.singer_id).await?;
        let created = self.songs.create(song).await?;
        tracing::info!(song_id = %created.id, title = %created.title, "Song created");
        Ok(created)
    }

    async fn get_singer(&self, id: Uuid) -> AppResult<Singer> {
        self.singers.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    async fn list_singers(&self) -> AppResult<Vec<Singer>> {
        self.singers.list().await
    }

    async fn create_singer(&self, singer: NewSinger) -> AppResult<Singer> {
        let created = self.singers.create(singer).await?;
        tracing::info!(singer_id = %created.id, name = %created.name, "Singer created");
        Ok(created)
    }

    async fn get_tag(&self, id: Uuid) -> AppResult<Tag> {
        self.tags.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    async fn get_or_create_tag(&self, name: String) -> AppResult<Tag> {
        self.tags.get_or_create(name.trim()).await
    }
}
