use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use catalog_core::ProductId;
use catalog_products::{
    NewProduct, Product, ProductChanges, ProductFilter, ProductStore, StoreError, Window,
};

#[derive(Debug)]
struct Table {
    rows: BTreeMap<ProductId, Product>,
    next_id: i64,
}

/// In-memory product table.
///
/// Intended for tests/dev. Ids are assigned sequentially starting at 1 and
/// rows are returned in ascending id order, like the Postgres adapter.
#[derive(Debug)]
pub struct InMemoryProductStore {
    table: RwLock<Table>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Number of rows, soft-deleted ones included.
    pub fn len(&self) -> usize {
        self.read().map(|t| t.rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Table>, StoreError> {
        self.table
            .read()
            .map_err(|_| StoreError::Backend("in-memory table lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Table>, StoreError> {
        self.table
            .write()
            .map_err(|_| StoreError::Backend("in-memory table lock poisoned".to_string()))
    }
}

impl Default for InMemoryProductStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ProductStore for InMemoryProductStore {
    async fn insert(&self, input: NewProduct) -> Result<Product, StoreError> {
        let mut table = self.write()?;

        let id = ProductId::new(table.next_id);
        table.next_id += 1;

        let product = Product::from_new(id, input, Utc::now());
        table.rows.insert(id, product.clone());
        Ok(product)
    }

    async fn count(&self, filter: &ProductFilter) -> Result<u64, StoreError> {
        let table = self.read()?;
        Ok(table.rows.values().filter(|p| filter.matches(p)).count() as u64)
    }

    async fn find_many(
        &self,
        filter: &ProductFilter,
        window: Option<Window>,
    ) -> Result<Vec<Product>, StoreError> {
        let table = self.read()?;
        let matching = table.rows.values().filter(|p| filter.matches(p));

        let rows = match window {
            Some(w) => matching
                .skip(usize::try_from(w.offset).unwrap_or(usize::MAX))
                .take(usize::try_from(w.limit).unwrap_or(usize::MAX))
                .cloned()
                .collect(),
            None => matching.cloned().collect(),
        };
        Ok(rows)
    }

    async fn find_first(&self, filter: &ProductFilter) -> Result<Option<Product>, StoreError> {
        let table = self.read()?;
        Ok(table.rows.values().find(|p| filter.matches(p)).cloned())
    }

    async fn update_by_id(
        &self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<Product, StoreError> {
        let mut table = self.write()?;
        let row = table
            .rows
            .get_mut(&id)
            .ok_or(StoreError::RecordNotFound(id))?;

        row.apply(&changes, Utc::now());
        Ok(row.clone())
    }
}
