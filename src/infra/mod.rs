//! Infrastructure layer - External systems integration
//!
//! - Database connection and migrations
//! - Repositories for users, tokens and the song catalog
//! - Unit of Work for transaction management

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    AlbumRepository, AlbumStore, Executor, SingerRepository, SingerStore, SongRepository,
    SongStore, TagRepository, TagStore, TokenRepository, TokenStore, UserRepository, UserStore,
};
pub use unit_of_work::{Persistence, Repositories, TransactionContext, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockAlbumRepository, MockSingerRepository, MockSongRepository, MockTagRepository,
    MockTokenRepository, MockUserRepository,
};
