//! Domain layer - Core business entities and logic
//!
//! Users, hashed secrets, issued tokens and the song catalog, independent of
//! how they are stored or transported.

pub mod catalog;
pub mod password;
pub mod token;
pub mod user;

pub use catalog::{Album, NewAlbum, NewSinger, NewSong, Singer, Song, Tag};
pub use password::Password;
pub use token::{IssuedToken, NewToken, Session, Token, TokenRotation, TokenState};
pub use user::{NewUser, User, UserRole};
