//! Store boundary used by the catalog.
//!
//! The catalog needs five primitives from a relational store: insert with
//! returning, count with filter, find-many with skip/take/filter, find-first
//! with filter and update-by-id with returning. Adapters live in
//! `catalog-infra`.

use std::collections::BTreeSet;
use std::sync::Arc;

use catalog_core::ProductId;

use crate::error::StoreError;
use crate::product::{NewProduct, Product, ProductChanges};

/// Row filter understood by every store adapter.
///
/// Empty filters match every row. An id set that is present but empty
/// matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub available: Option<bool>,
    pub ids: Option<BTreeSet<ProductId>>,
}

impl ProductFilter {
    /// Every row, soft-deleted ones included.
    pub fn all() -> Self {
        Self::default()
    }

    /// Only rows that have not been soft-deleted.
    pub fn available() -> Self {
        Self {
            available: Some(true),
            ids: None,
        }
    }

    /// Rows whose id is in `ids`, regardless of availability.
    pub fn ids(ids: impl IntoIterator<Item = ProductId>) -> Self {
        Self {
            available: None,
            ids: Some(ids.into_iter().collect()),
        }
    }

    pub fn with_id(mut self, id: ProductId) -> Self {
        self.ids = Some(BTreeSet::from([id]));
        self
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(available) = self.available {
            if product.is_available != available {
                return false;
            }
        }
        match &self.ids {
            Some(ids) => ids.contains(&product.id),
            None => true,
        }
    }
}

/// Skip/take window for find-many.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: u64,
}

/// Relational store client for the `products` table.
///
/// Rows come back in the store's default order, which every adapter in this
/// workspace defines as ascending id.
#[async_trait::async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert(&self, input: NewProduct) -> Result<Product, StoreError>;

    async fn count(&self, filter: &ProductFilter) -> Result<u64, StoreError>;

    async fn find_many(
        &self,
        filter: &ProductFilter,
        window: Option<Window>,
    ) -> Result<Vec<Product>, StoreError>;

    async fn find_first(&self, filter: &ProductFilter) -> Result<Option<Product>, StoreError>;

    /// Update the row with `id`. Fails with [`StoreError::RecordNotFound`]
    /// when no such row exists.
    async fn update_by_id(
        &self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<Product, StoreError>;
}

#[async_trait::async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn insert(&self, input: NewProduct) -> Result<Product, StoreError> {
        (**self).insert(input).await
    }

    async fn count(&self, filter: &ProductFilter) -> Result<u64, StoreError> {
        (**self).count(filter).await
    }

    async fn find_many(
        &self,
        filter: &ProductFilter,
        window: Option<Window>,
    ) -> Result<Vec<Product>, StoreError> {
        (**self).find_many(filter, window).await
    }

    async fn find_first(&self, filter: &ProductFilter) -> Result<Option<Product>, StoreError> {
        (**self).find_first(filter).await
    }

    async fn update_by_id(
        &self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<Product, StoreError> {
        (**self).update_by_id(id, changes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: i64, is_available: bool) -> Product {
        let mut p = Product::from_new(ProductId::new(id), NewProduct::new("p", 1.0), Utc::now());
        p.is_available = is_available;
        p
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = ProductFilter::all();
        assert!(filter.matches(&product(1, true)));
        assert!(filter.matches(&product(2, false)));
    }

    #[test]
    fn available_filter_hides_soft_deleted_rows() {
        let filter = ProductFilter::available();
        assert!(filter.matches(&product(1, true)));
        assert!(!filter.matches(&product(1, false)));
    }

    #[test]
    fn id_filter_ignores_availability() {
        let filter = ProductFilter::ids([ProductId::new(1), ProductId::new(2)]);
        assert!(filter.matches(&product(1, false)));
        assert!(filter.matches(&product(2, true)));
        assert!(!filter.matches(&product(3, true)));
    }

    #[test]
    fn combined_filter_requires_both() {
        let filter = ProductFilter::available().with_id(ProductId::new(1));
        assert!(filter.matches(&product(1, true)));
        assert!(!filter.matches(&product(1, false)));
        assert!(!filter.matches(&product(2, true)));
    }

    #[test]
    fn empty_id_set_matches_nothing() {
        let filter = ProductFilter::ids(Vec::new());
        assert!(!filter.matches(&product(1, true)));
    }

    #[test]
    fn id_filter_collapses_duplicates() {
        let filter = ProductFilter::ids([ProductId::new(1), ProductId::new(1), ProductId::new(2)]);
        assert_eq!(filter.ids.map(|ids| ids.len()), Some(2));
    }
}
