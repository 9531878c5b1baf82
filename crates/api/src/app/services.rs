use std::sync::Arc;

use catalog_infra::{CatalogConfig, InMemoryProductStore, PostgresProductStore, StoreConfig};
use catalog_products::{ProductCatalog, ProductStore, StoreError};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: ProductCatalog<Arc<dyn ProductStore>>,
    /// Page size used when a list request omits `limit`.
    pub default_page_limit: u32,
}

impl AppServices {
    pub fn new(store: Arc<dyn ProductStore>, default_page_limit: u32) -> Self {
        Self {
            catalog: ProductCatalog::new(store),
            default_page_limit,
        }
    }

    /// Services backed by a fresh in-memory store (dev/tests).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryProductStore::new()), 10)
    }
}

/// Select and connect the product store described by `config`.
pub async fn build_services(config: &CatalogConfig) -> Result<AppServices, StoreError> {
    let store: Arc<dyn ProductStore> = match &config.store {
        StoreConfig::Postgres(db) => Arc::new(PostgresProductStore::connect(db).await?),
        StoreConfig::InMemory => {
            tracing::warn!("USE_PERSISTENT_STORES is not set; products are kept in memory only");
            Arc::new(InMemoryProductStore::new())
        }
    };

    Ok(AppServices::new(store, config.default_page_limit))
}
