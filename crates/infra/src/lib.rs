//! Infrastructure layer: store adapters and configuration.

pub mod config;
pub mod store;


pub use config::{CatalogConfig, ConfigError, DatabaseConfig, StoreConfig};
pub use store::{InMemoryProductStore, PostgresProductStore};
