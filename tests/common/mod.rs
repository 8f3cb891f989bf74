//! Shared fixtures for integration tests.
//!
//! `InMemoryUnitOfWork` keeps users and tokens in maps and applies the same
//! compare-and-swap rule as the SeaORM store, so the real `Authenticator`
//! and router can be driven without a database. Transactions run the closure
//! directly and are not rolled back. The catalog stores are plain maps.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use chrono::{Duration, Utc};
use futures::future::BoxFuture;
use uuid::Uuid;

use karaoke_api::api::{create_router, AppState};
use karaoke_api::config::Config;
use karaoke_api::domain::{
    Album, NewAlbum, NewSinger, NewSong, NewToken, NewUser, Singer, Song, Tag, Token,
    TokenRotation, User, UserRole,
};
use karaoke_api::errors::{AppError, AppResult};
use karaoke_api::infra::{
    AlbumRepository, Repositories, SingerRepository, SongRepository, TagRepository,
    TokenRepository, UnitOfWork, UserRepository,
};
use karaoke_api::services::{Authenticator, CatalogManager};

pub const TEST_JWT_SECRET: &str = "integration-test-secret-at-least-32-chars";

pub fn test_config() -> Config {
    Config::new("postgres://localhost/karaoke_test", TEST_JWT_SECRET).expect("valid test config")
}

pub fn authenticator(uow: Arc<InMemoryUnitOfWork>) -> Authenticator<InMemoryUnitOfWork> {
    Authenticator::new(uow, &test_config())
}

pub fn catalog() -> CatalogManager {
    CatalogManager::new(
        Arc::new(InMemoryAlbums::default()),
        Arc::new(InMemorySongs::default()),
        Arc::new(InMemorySingers::default()),
        Arc::new(InMemoryTags::default()),
    )
}

pub fn test_app(uow: Arc<InMemoryUnitOfWork>) -> Router {
    create_router(AppState::new(
        Arc::new(authenticator(uow)),
        Arc::new(catalog()),
    ))
}

#[derive(Default)]
pub struct InMemoryUsers {
    rows: Mutex<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.values().find(|u| u.email == email).cloned())
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut rows = self.rows.lock().unwrap();
        if rows.values().any(|u| u.username == new_user.username) {
            return Err(AppError::validation("username", "Username is already taken"));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            role: UserRole::User,
            created_at: now,
            updated_at: now,
        };
        rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn set_role(&self, username: &str, role: UserRole) -> AppResult<Option<User>> {
        let mut rows = self.rows.lock().unwrap();
        let Some(user) = rows.values_mut().find(|u| u.username == username) else {
            return Ok(None);
        };
        user.role = role;
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }
}

#[derive(Default)]
pub struct InMemoryTokens {
    rows: Mutex<HashMap<Uuid, Token>>,
}

#[async_trait]
impl TokenRepository for InMemoryTokens {
    async fn find_by_access_token(&self, access_token: &str) -> AppResult<Option<Token>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.values().find(|t| t.access_token == access_token).cloned())
    }

    async fn create(&self, new_token: NewToken) -> AppResult<Token> {
        let now = Utc::now();
        let token = Token {
            id: Uuid::new_v4(),
            access_token: new_token.access_token,
            refresh_token_hash: new_token.refresh_token_hash,
            user_id: new_token.user_id,
            ip_address: new_token.ip_address,
            usage_count: 0,
            expires_at: new_token.expires_at,
            revoked_at: None,
            version: 0,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().insert(token.id, token.clone());
        Ok(token)
    }

    async fn rotate(&self, rotation: TokenRotation) -> AppResult<Option<Token>> {
        let mut rows = self.rows.lock().unwrap();
        let Some(current) = rows.get_mut(&rotation.id) else {
            return Ok(None);
        };
        if current.version != rotation.expected_version || current.revoked_at.is_some() {
            return Ok(None);
        }

        current.access_token = rotation.access_token;
        current.refresh_token_hash = rotation.refresh_token_hash;
        current.ip_address = rotation.ip_address;
        current.expires_at = rotation.expires_at;
        current.usage_count += 1;
        current.version += 1;
        current.updated_at = Utc::now();
        Ok(Some(current.clone()))
    }

    async fn revoke(&self, id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&id) {
            Some(token) if token.revoked_at.is_none() => {
                token.revoked_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct InMemoryUnitOfWork {
    users: InMemoryUsers,
    tokens: InMemoryTokens,
}

impl InMemoryUnitOfWork {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn token_count(&self) -> usize {
        self.tokens.rows.lock().unwrap().len()
    }

    pub fn find_token(&self, access_token: &str) -> Option<Token> {
        let rows = self.tokens.rows.lock().unwrap();
        rows.values().find(|t| t.access_token == access_token).cloned()
    }

    /// Grant the admin role. Tokens issued afterwards carry it.
    pub async fn promote(&self, username: &str) {
        self.users
            .set_role(username, UserRole::Admin)
            .await
            .unwrap()
            .expect("user exists");
    }

    /// Move a stored token's expiry into the past.
    pub fn expire(&self, access_token: &str) {
        let mut rows = self.tokens.rows.lock().unwrap();
        if let Some(token) = rows.values_mut().find(|t| t.access_token == access_token) {
            token.expires_at = Utc::now() - Duration::seconds(1);
        }
    }
}

impl Repositories for InMemoryUnitOfWork {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn tokens(&self) -> &dyn TokenRepository {
        &self.tokens
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(&'a dyn Repositories) -> BoxFuture<'a, AppResult<T>> + Send,
        T: Send,
    {
        f(self).await
    }
}

#[derive(Default)]
pub struct InMemoryAlbums {
    rows: Mutex<HashMap<Uuid, Album>>,
}

#[async_trait]
impl AlbumRepository for InMemoryAlbums {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Album>> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Album>> {
        let mut albums: Vec<_> = self.rows.lock().unwrap().values().cloned().collect();
        albums.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(albums)
    }

    async fn create(&self, new_album: NewAlbum) -> AppResult<Album> {
        let now = Utc::now();
        let album = Album {
            id: Uuid::new_v4(),
            title: new_album.title,
            singer_id: new_album.singer_id,
            release_year: new_album.release_year,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().insert(album.id, album.clone());
        Ok(album)
    }
}

#[derive(Default)]
pub struct InMemorySongs {
    rows: Mutex<HashMap<Uuid, Song>>,
}

#[async_trait]
impl SongRepository for InMemorySongs {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Song>> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Song>> {
        let mut songs: Vec<_> = self.rows.lock().unwrap().values().cloned().collect();
        songs.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(songs)
    }

    async fn create(&self, new_song: NewSong) -> AppResult<Song> {
        let now = Utc::now();
        let song = Song {
            id: Uuid::new_v4(),
            title: new_song.title,
            album_id: new_song.album_id,
            singer_id: new_song.singer_id,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().insert(song.id, song.clone());
        Ok(song)
    }
}

#[derive(Default)]
pub struct InMemorySingers {
    rows: Mutex<HashMap<Uuid, Singer>>,
}

#[async_trait]
impl SingerRepository for InMemorySingers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Singer>> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Singer>> {
        let mut singers: Vec<_> = self.rows.lock().unwrap().values().cloned().collect();
        singers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(singers)
    }

    async fn create(&self, new_singer: NewSinger) -> AppResult<Singer> {
        let now = Utc::now();
        let singer = Singer {
            id: Uuid::new_v4(),
            name: new_singer.name,
            nickname: new_singer.nickname,
            birthday: new_singer.birthday,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().insert(singer.id, singer.clone());
        Ok(singer)
    }
}

#[derive(Default)]
pub struct InMemoryTags {
    rows: Mutex<HashMap<Uuid, Tag>>,
}

#[async_trait]
impl TagRepository for InMemoryTags {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Tag>> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Tag>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.values().find(|t| t.name == name).cloned())
    }

    async fn get_or_create(&self, name: &str) -> AppResult<Tag> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(existing) = rows.values().find(|t| t.name == name) {
            return Ok(existing.clone());
        }

        let tag = Tag {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        rows.insert(tag.id, tag.clone());
        Ok(tag)
    }
}
