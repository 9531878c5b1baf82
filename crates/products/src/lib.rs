//! Product catalog domain module.
//!
//! This crate contains the catalog's data model, the store boundary it talks
//! through and the `ProductCatalog` service itself. It performs no IO on its
//! own; every query goes through a [`ProductStore`] implementation supplied by
//! the infrastructure layer.

pub mod catalog;
pub mod error;
pub mod pagination;
pub mod product;
pub mod store;

pub use catalog::ProductCatalog;
pub use error::{CatalogError, CatalogResult, StoreError};
pub use pagination::{Page, PageMetadata, PageRequest};
pub use product::{NewProduct, Product, ProductChanges, ProductPatch, ProductStatus};
pub use store::{ProductFilter, ProductStore, Window};

pub use catalog_core::ProductId;
