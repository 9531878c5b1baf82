use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalog_core::ProductId;

/// Lifecycle view of a product, derived from its availability flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Active,
    Archived,
}

/// A catalog row as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    /// `false` means the product was soft-deleted.
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Build the row a store persists for `input` under a freshly assigned id.
    pub fn from_new(id: ProductId, input: NewProduct, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            price: input.price,
            description: input.description,
            is_available: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn status(&self) -> ProductStatus {
        if self.is_available {
            ProductStatus::Active
        } else {
            ProductStatus::Archived
        }
    }

    /// Apply a partial update in place. Fields left as `None` keep their value.
    pub fn apply(&mut self, changes: &ProductChanges, now: DateTime<Utc>) {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(description) = &changes.description {
            self.description = Some(description.clone());
        }
        if let Some(is_available) = changes.is_available {
            self.is_available = is_available;
        }
        self.updated_at = now;
    }
}

/// Caller-supplied fields for a new product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update as received from a caller.
///
/// Callers may echo the product id back in the payload; it is accepted but
/// never written (ids are immutable).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductPatch {
    pub id: Option<ProductId>,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
}

impl ProductPatch {
    /// Drop the id and keep only the writable fields.
    pub fn into_changes(self) -> ProductChanges {
        let ProductPatch {
            id: _,
            name,
            price,
            description,
        } = self;

        ProductChanges {
            name,
            price,
            description,
            is_available: None,
        }
    }
}

/// Column changes handed to a store's update-by-id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub is_available: Option<bool>,
}

impl ProductChanges {
    /// Changes performing a soft delete.
    pub fn mark_unavailable() -> Self {
        Self {
            is_available: Some(false),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.is_available.is_none()
    }
}
