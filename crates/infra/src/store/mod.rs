//! `ProductStore` adapters.
//!
//! - `InMemoryProductStore`: dev/test store with the same ordering and
//!   filtering rules as the relational one.
//! - `PostgresProductStore`: sqlx-backed store over the `products` table.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryProductStore;
pub use postgres::PostgresProductStore;
