//! Configuration loading and representation.
//!
//! Everything comes from environment variables:
//!
//! | variable | default |
//! |----------|---------|
//! | `CATALOG_BIND_ADDR` | `0.0.0.0:8080` |
//! | `USE_PERSISTENT_STORES` | `false` |
//! | `DATABASE_URL` | required when persistent |
//! | `DATABASE_MAX_CONNECTIONS` | `5` |
//! | `DEFAULT_PAGE_LIMIT` | `10` |

use std::net::SocketAddr;

use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_PAGE_LIMIT: u32 = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Connection settings for the Postgres store.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl core::fmt::Debug for DatabaseConfig {
    // The URL usually embeds credentials.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"[redacted]")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

/// Which `ProductStore` backs the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    InMemory,
    Postgres(DatabaseConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub bind_addr: SocketAddr,
    /// Page size used when a list request omits `limit`.
    pub default_page_limit: u32,
    pub store: StoreConfig,
}

impl CatalogConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("CATALOG_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| invalid("CATALOG_BIND_ADDR", e))?;

        let default_page_limit =
            parse_or("DEFAULT_PAGE_LIMIT", &lookup, DEFAULT_PAGE_LIMIT)?;
        if default_page_limit == 0 {
            return Err(ConfigError::Invalid {
                key: "DEFAULT_PAGE_LIMIT",
                message: "must be at least 1".to_string(),
            });
        }

        let use_persistent = parse_or("USE_PERSISTENT_STORES", &lookup, false)?;
        let store = if use_persistent {
            let url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
            let max_connections =
                parse_or("DATABASE_MAX_CONNECTIONS", &lookup, DEFAULT_MAX_CONNECTIONS)?;
            StoreConfig::Postgres(DatabaseConfig {
                url,
                max_connections,
            })
        } else {
            StoreConfig::InMemory
        };

        Ok(Self {
            bind_addr,
            default_page_limit,
            store,
        })
    }
}

fn parse_or<T, F>(key: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().map_err(|e| invalid(key, e)),
        None => Ok(default),
    }
}

fn invalid(key: &'static str, err: impl core::fmt::Display) -> ConfigError {
    ConfigError::Invalid {
        key,
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<CatalogConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CatalogConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_in_memory() {
        let config = load(&[]).unwrap();
        assert_eq!(config.store, StoreConfig::InMemory);
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.default_page_limit, 10);
    }

    #[test]
    fn persistent_requires_database_url() {
        let err = load(&[("USE_PERSISTENT_STORES", "true")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn persistent_store_reads_pool_settings() {
        let config = load(&[
            ("USE_PERSISTENT_STORES", "true"),
            ("DATABASE_URL", "postgres://u:p@localhost/catalog"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
        ])
        .unwrap();

        match config.store {
            StoreConfig::Postgres(db) => {
                assert_eq!(db.url, "postgres://u:p@localhost/catalog");
                assert_eq!(db.max_connections, 12);
            }
            other => panic!("expected Postgres store, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_values() {
        let err = load(&[("CATALOG_BIND_ADDR", "not-an-addr")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "CATALOG_BIND_ADDR", .. }));

        let err = load(&[("USE_PERSISTENT_STORES", "yes please")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "USE_PERSISTENT_STORES", .. }));

        let err = load(&[("DEFAULT_PAGE_LIMIT", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "DEFAULT_PAGE_LIMIT", .. }));
    }

    #[test]
    fn debug_output_hides_database_url() {
        let db = DatabaseConfig {
            url: "postgres://user:secret@db/catalog".to_string(),
            max_connections: 5,
        };
        let rendered = format!("{db:?}");
        assert!(!rendered.contains("secret"));
    }
}
