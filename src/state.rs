use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AdminService, AuthService, CatalogService, ImageService, LibraryService, SeaOrmAdminService,
    SeaOrmAuthService, SeaOrmCatalogService, SeaOrmLibraryService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub image_service: Arc<ImageService>,

    pub auth_service: Arc<dyn AuthService>,

    pub catalog_service: Arc<dyn CatalogService>,

    pub library_service: Arc<dyn LibraryService>,

    pub admin_service: Arc<dyn AdminService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    /// Wires the services around an already opened store.
    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let image_service = Arc::new(ImageService::new(config.catalog.storage_url.clone()));

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn AuthService + Send + Sync + 'static>;

        let catalog_service = Arc::new(SeaOrmCatalogService::new(
            store.clone(),
            image_service.clone(),
            config.catalog.clone(),
        )) as Arc<dyn CatalogService + Send + Sync + 'static>;

        let library_service = Arc::new(SeaOrmLibraryService::new(
            store.clone(),
            image_service.clone(),
            config.catalog.clone(),
        )) as Arc<dyn LibraryService + Send + Sync + 'static>;

        let admin_service = Arc::new(SeaOrmAdminService::new(
            store.clone(),
            config.catalog.clone(),
        )) as Arc<dyn AdminService + Send + Sync + 'static>;

        Self {
            config: Arc::new(config),
            store,
            image_service,
            auth_service,
            catalog_service,
            library_service,
            admin_service,
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}
