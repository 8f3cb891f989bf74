//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{AlbumStore, Database, Persistence, SingerStore, SongStore, TagStore};
use crate::requests::Mediator;
use crate::services::{AuthService, Authenticator, CatalogManager, CatalogService, Services};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Authentication service, used directly by the bearer middleware
    pub auth_service: Arc<dyn AuthService>,
    /// Catalog service, used directly by the read endpoints
    pub catalog_service: Arc<dyn CatalogService>,
    /// Request dispatcher for the endpoints
    pub mediator: Mediator,
    /// Database handle for health checks, absent when the service is injected
    pub database: Option<Arc<Database>>,
}

impl AppState {
    /// Wire the SeaORM-backed services onto an open database.
    pub fn from_config(database: Arc<Database>, config: &Config) -> Self {
        let connection = database.get_connection();
        let uow = Arc::new(Persistence::new(connection.clone()));
        let auth_service: Arc<dyn AuthService> = Arc::new(Authenticator::new(uow, config));
        let catalog_service: Arc<dyn CatalogService> = Arc::new(CatalogManager::new(
            Arc::new(AlbumStore::new(connection.clone())),
            Arc::new(SongStore::new(connection.clone())),
            Arc::new(SingerStore::new(connection.clone())),
            Arc::new(TagStore::new(connection)),
        ));

        Self::new(auth_service, catalog_service).with_database(database)
    }

    /// Create application state around injected services.
    pub fn new(auth_service: Arc<dyn AuthService>, catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            mediator: Mediator::new(Services::new(
                Arc::clone(&auth_service),
                Arc::clone(&catalog_service),
            )),
            auth_service,
            catalog_service,
            database: None,
        }
    }

    pub fn with_database(mut self, database: Arc<Database>) -> Self {
        self.database = Some(database);
        self
    }
}
