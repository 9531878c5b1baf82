//! The product catalog service.

use std::collections::BTreeSet;

use tracing::instrument;

use catalog_core::ProductId;

use crate::error::{CatalogError, CatalogResult};
use crate::pagination::{Page, PageMetadata, PageRequest};
use crate::product::{NewProduct, Product, ProductChanges, ProductPatch};
use crate::store::{ProductFilter, ProductStore};

/// Create/list/get/update/soft-delete/validate over the `products` table.
///
/// Holds nothing but the store handle; every call is an independent unit of
/// work. Concurrent writes to the same row race at the store (last write
/// wins).
#[derive(Debug, Clone)]
pub struct ProductCatalog<S> {
    store: S,
}

impl<S> ProductCatalog<S>
where
    S: ProductStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Insert a new product. The store assigns the id.
    #[instrument(skip(self, input), fields(name = %input.name), err)]
    pub async fn create(&self, input: NewProduct) -> CatalogResult<Product> {
        let product = self.store.insert(input).await?;
        tracing::info!(product_id = %product.id, "product created");
        Ok(product)
    }

    /// One page of available products, in store order.
    #[instrument(skip(self), fields(page = request.page(), limit = request.limit()), err)]
    pub async fn list(&self, request: PageRequest) -> CatalogResult<Page<Product>> {
        let filter = ProductFilter::available();

        let total_rows = self.store.count(&filter).await?;
        let data = self
            .store
            .find_many(&filter, Some(request.window()))
            .await?;

        Ok(Page {
            data,
            metadata: PageMetadata::new(request, total_rows),
        })
    }

    /// The available product with `id`.
    #[instrument(skip(self), fields(product_id = %id), err)]
    pub async fn get(&self, id: ProductId) -> CatalogResult<Product> {
        self.store
            .find_first(&ProductFilter::available().with_id(id))
            .await?
            .ok_or(CatalogError::NotFound { id })
    }

    /// Apply `patch` to an available product. Any id inside the patch is ignored.
    #[instrument(skip(self, patch), fields(product_id = %id), err)]
    pub async fn update(&self, id: ProductId, patch: ProductPatch) -> CatalogResult<Product> {
        self.get(id).await?;

        let product = self.store.update_by_id(id, patch.into_changes()).await?;
        Ok(product)
    }

    /// Soft delete: the row stays in the store but disappears from reads.
    #[instrument(skip(self), fields(product_id = %id), err)]
    pub async fn remove(&self, id: ProductId) -> CatalogResult<Product> {
        self.get(id).await?;

        let product = self
            .store
            .update_by_id(id, ProductChanges::mark_unavailable())
            .await?;
        tracing::info!(product_id = %id, "product archived");
        Ok(product)
    }

    /// Confirm that every id in `ids` has a row.
    ///
    /// Duplicates are collapsed first. Availability is not checked, so
    /// soft-deleted products still validate.
    #[instrument(skip(self, ids), fields(requested = ids.len()), err)]
    pub async fn validate_existence(&self, ids: &[ProductId]) -> CatalogResult<Vec<Product>> {
        let unique: BTreeSet<ProductId> = ids.iter().copied().collect();
        let expected = unique.len();

        let products = self
            .store
            .find_many(&ProductFilter::ids(unique), None)
            .await?;

        if products.len() != expected {
            tracing::debug!(expected, found = products.len(), "product validation failed");
            return Err(CatalogError::BulkNotFound);
        }

        Ok(products)
    }
}
