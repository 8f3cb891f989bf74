//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod album_repository;
mod base;
pub(crate) mod entities;
mod singer_repository;
mod song_repository;
mod tag_repository;
mod token_repository;
mod user_repository;

pub use album_repository::{AlbumRepository, AlbumStore};
pub use base::Executor;
pub use singer_repository::{SingerRepository, SingerStore};
pub use song_repository::{SongRepository, SongStore};
pub use tag_repository::{TagRepository, TagStore};
pub use token_repository::{TokenRepository, TokenStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use album_repository::MockAlbumRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use singer_repository::MockSingerRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use song_repository::MockSongRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use tag_repository::MockTagRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use token_repository::MockTokenRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
