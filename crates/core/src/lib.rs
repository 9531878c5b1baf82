//! `catalog-core`: shared building blocks for the product catalog.
//!
//! This crate contains **pure** primitives (no infrastructure concerns).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult, ErrorClass};
pub use id::ProductId;
