//! HTTP request handlers.

pub mod auth_handler;
pub mod catalog_handler;

pub use auth_handler::auth_routes;
pub use catalog_handler::{album_routes, singer_routes, song_routes, tag_routes};
