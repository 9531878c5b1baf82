//! Postgres-backed product store.
//!
//! Expected table (created and migrated outside this service):
//!
//! ```sql
//! CREATE TABLE products (
//!     id           BIGSERIAL PRIMARY KEY,
//!     name         TEXT NOT NULL,
//!     price        DOUBLE PRECISION NOT NULL,
//!     description  TEXT,
//!     is_available BOOLEAN NOT NULL DEFAULT TRUE,
//!     created_at   TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at   TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique / not-null / check / foreign key) | `23505` / `23502` / `23514` / `23503` | `Constraint` |
//! | Database (other) | Any other | `Backend` |
//! | PoolClosed, PoolTimedOut, Io, Tls | N/A | `Unavailable` |
//! | Other | N/A | `Backend` |

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::instrument;

use catalog_core::ProductId;
use catalog_products::{
    NewProduct, Product, ProductChanges, ProductFilter, ProductStore, StoreError, Window,
};

use crate::config::DatabaseConfig;

/// Postgres-backed product store.
///
/// The pool is created once and shared; `PostgresProductStore` is cheap to
/// clone and `Send + Sync`.
#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: Arc<PgPool>,
}

impl PostgresProductStore {
    /// Create a new PostgresProductStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open the connection pool described by `config`.
    #[instrument(skip(config), fields(max_connections = config.max_connections), err)]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        tracing::info!("database connected");
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl ProductStore for PostgresProductStore {
    #[instrument(skip(self, input), err)]
    async fn insert(&self, input: NewProduct) -> Result<Product, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (name, price, description)
            VALUES ($1, $2, $3)
            RETURNING id, name, price, description, is_available, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(input.price)
        .bind(&input.description)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_product", e))?;

        Ok(row.into())
    }

    #[instrument(skip(self), err)]
    async fn count(&self, filter: &ProductFilter) -> Result<u64, StoreError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products");
        push_filter(&mut builder, filter);

        let total = builder
            .build_query_scalar::<i64>()
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("count_products", e))?;

        Ok(u64::try_from(total).unwrap_or(0))
    }

    #[instrument(skip(self), err)]
    async fn find_many(
        &self,
        filter: &ProductFilter,
        window: Option<Window>,
    ) -> Result<Vec<Product>, StoreError> {
        let mut builder = select_products(filter);
        if let Some(window) = window {
            push_window(&mut builder, window);
        }

        let rows = builder
            .build_query_as::<ProductRow>()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_products", e))?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    #[instrument(skip(self), err)]
    async fn find_first(&self, filter: &ProductFilter) -> Result<Option<Product>, StoreError> {
        let mut builder = select_products(filter);
        builder.push(" LIMIT 1");

        let row = builder
            .build_query_as::<ProductRow>()
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_first_product", e))?;

        Ok(row.map(Product::from))
    }

    #[instrument(skip(self, changes), fields(product_id = %id), err)]
    async fn update_by_id(
        &self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<Product, StoreError> {
        let mut builder = update_product(id, changes);

        let row = builder
            .build_query_as::<ProductRow>()
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("update_product", e))?;

        row.map(Product::from).ok_or(StoreError::RecordNotFound(id))
    }
}

const SELECT_PRODUCTS: &str =
    "SELECT id, name, price, description, is_available, created_at, updated_at FROM products";

fn select_products(filter: &ProductFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(SELECT_PRODUCTS);
    push_filter(&mut builder, filter);
    builder.push(" ORDER BY id ASC");
    builder
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    builder.push(" WHERE TRUE");

    if let Some(available) = filter.available {
        builder.push(" AND is_available = ").push_bind(available);
    }

    if let Some(ids) = &filter.ids {
        let ids: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        builder.push(" AND id = ANY(").push_bind(ids).push(")");
    }
}

fn push_window(builder: &mut QueryBuilder<'_, Postgres>, window: Window) {
    builder
        .push(" LIMIT ")
        .push_bind(i64::try_from(window.limit).unwrap_or(i64::MAX))
        .push(" OFFSET ")
        .push_bind(i64::try_from(window.offset).unwrap_or(i64::MAX));
}

fn update_product(id: ProductId, changes: ProductChanges) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("UPDATE products SET updated_at = NOW()");

    if let Some(name) = changes.name {
        builder.push(", name = ").push_bind(name);
    }
    if let Some(price) = changes.price {
        builder.push(", price = ").push_bind(price);
    }
    if let Some(description) = changes.description {
        builder.push(", description = ").push_bind(description);
    }
    if let Some(is_available) = changes.is_available {
        builder.push(", is_available = ").push_bind(is_available);
    }

    builder
        .push(" WHERE id = ")
        .push_bind(id.get())
        .push(" RETURNING id, name, price, description, is_available, created_at, updated_at");
    builder
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());

            match db_err.code().as_deref() {
                // unique, not-null, check, foreign key
                Some("23505" | "23502" | "23514" | "23503") => StoreError::Constraint(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("connection pool unavailable in {}: {}", operation, err))
        }
        sqlx::Error::Io(e) => {
            StoreError::Unavailable(format!("io error in {}: {}", operation, e))
        }
        sqlx::Error::Tls(e) => {
            StoreError::Unavailable(format!("tls error in {}: {}", operation, e))
        }
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}

// SQLx row types

#[derive(Debug)]
struct ProductRow {
    id: i64,
    name: String,
    price: f64,
    description: Option<String>,
    is_available: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for ProductRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(ProductRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            price: row.try_get("price")?,
            description: row.try_get("description")?,
            is_available: row.try_get("is_available")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: ProductId::new(row.id),
            name: row.name,
            price: row.price,
            description: row.description,
            is_available: row.is_available,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
