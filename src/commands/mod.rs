//! Commands module - CLI command implementations.

pub mod migrate;
pub mod role;
pub mod serve;
