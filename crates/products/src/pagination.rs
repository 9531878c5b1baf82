//! Page-number pagination over the catalog.

use serde::{Deserialize, Serialize};

use catalog_core::{DomainError, DomainResult};

use crate::store::Window;

/// A validated page request (1-based page, positive limit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> DomainResult<Self> {
        if page < 1 {
            return Err(DomainError::validation("page must be at least 1"));
        }
        if limit < 1 {
            return Err(DomainError::validation("limit must be at least 1"));
        }
        Ok(Self { page, limit })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows skipped before this page starts.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    pub fn window(&self) -> Window {
        Window {
            offset: self.offset(),
            limit: u64::from(self.limit),
        }
    }
}

/// Position of a page within the full result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub page: u32,
    pub total_rows: u64,
    pub total_pages: u64,
}

impl PageMetadata {
    pub fn new(request: PageRequest, total_rows: u64) -> Self {
        Self {
            page: request.page,
            total_rows,
            total_pages: total_rows.div_ceil(u64::from(request.limit)),
        }
    }
}

/// One page of results plus its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub metadata: PageMetadata,
}
