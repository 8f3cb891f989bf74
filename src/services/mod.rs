//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion; the auth service reaches its stores through the
//! Unit of Work.

use std::sync::Arc;

mod auth_service;
mod catalog_service;
mod token_issuer;

pub use auth_service::{AuthService, Authenticator};
pub use catalog_service::{CatalogManager, CatalogService};
pub use token_issuer::{Claims, Credentials, TokenIssuer};

#[cfg(any(test, feature = "test-utils"))]
pub use auth_service::MockAuthService;
#[cfg(any(test, feature = "test-utils"))]
pub use catalog_service::MockCatalogService;

/// Every service a request handler may call.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<dyn AuthService>,
    pub catalog: Arc<dyn CatalogService>,
}

impl Services {
    pub fn new(auth: Arc<dyn AuthService>, catalog: Arc<dyn CatalogService>) -> Self {
        Self { auth, catalog }
    }
}
