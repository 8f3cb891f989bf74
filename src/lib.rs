//! Karaoke API - accounts, token issuance and the karaoke song catalog
//!
//! Users register and log in with a username and password and receive an
//! access token paired with a refresh token. Tokens are stored, expire after
//! a fixed lifetime, rotate on refresh and can be revoked. Singers, albums,
//! songs and tags make up the catalog; only admins may add to it.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Users, tokens, password hashing and catalog entities
//! - **services**: Credential checks, token lifecycle and the catalog
//! - **requests**: Validated requests dispatched by the mediator
//! - **infra**: Database, repositories and Unit of Work
//! - **api**: HTTP handlers, middleware, and routes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Promote an account to admin
//! cargo run -- role alice admin
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod requests;
pub mod services;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{
    Album, IssuedToken, Password, Session, Singer, Song, Tag, Token, User, UserRole,
};
pub use errors::{AppError, AppResult};
pub use requests::{Mediator, TokenResponse};
