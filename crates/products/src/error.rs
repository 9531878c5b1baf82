use thiserror::Error;

use catalog_core::{ErrorClass, ProductId};

/// Result type returned by every catalog operation.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Store operation error.
///
/// These are **infrastructure errors** raised by a store adapter. The catalog
/// does not interpret them; they propagate to the caller unchanged.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Update-by-id targeted a row that does not exist.
    #[error("record not found: {0}")]
    RecordNotFound(ProductId),

    /// The store rejected the write (unique, not-null or check constraint).
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// The store could not be reached (pool closed, connection refused, ...).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Anything else the backend reported, including row decoding failures.
    #[error("store error: {0}")]
    Backend(String),
}

/// Catalog operation error.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No available product has this id.
    #[error("Product #{id} not found")]
    NotFound { id: ProductId },

    /// At least one id in a validation batch has no matching row.
    #[error("One or more products were not found")]
    BulkNotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CatalogError {
    /// Boundary classification.
    ///
    /// Lookup failures are reported as bad requests, matching the contract
    /// existing callers of this service rely on.
    pub fn class(&self) -> ErrorClass {
        match self {
            CatalogError::NotFound { .. } | CatalogError::BulkNotFound => ErrorClass::BadRequest,
            CatalogError::Store(_) => ErrorClass::Internal,
        }
    }
}
