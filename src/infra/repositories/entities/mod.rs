//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod album;
pub mod singer;
pub mod song;
pub mod tag;
pub mod token;
pub mod user;
