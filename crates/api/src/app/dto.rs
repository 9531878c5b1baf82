use serde::Deserialize;

use catalog_core::ProductId;

// -------------------------
// Request DTOs
// -------------------------

/// `GET /products` query string. Missing values fall back to page 1 and the
/// configured default limit.
#[derive(Debug, Default, Deserialize)]
pub struct ListProductsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ValidateProductsRequest {
    pub ids: Vec<ProductId>,
}
