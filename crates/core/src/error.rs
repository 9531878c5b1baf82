//! Domain error model.

use serde::Serialize;
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Coarse classification carried by every error that crosses a service boundary.
///
/// Transports map this onto their own status vocabulary (HTTP status codes,
/// RPC status, ...). The catalog itself never looks at transport details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// The caller asked for something that cannot be served as requested.
    BadRequest,
    /// The requested resource does not exist.
    NotFound,
    /// A failure on our side (store unavailable, constraint surprise, ...).
    Internal,
}

impl ErrorClass {
    /// HTTP status code equivalent of this classification.
    pub fn http_status(self) -> u16 {
        match self {
            ErrorClass::BadRequest => 400,
            ErrorClass::NotFound => 404,
            ErrorClass::Internal => 500,
        }
    }
}

/// Domain-level error.
///
/// Keep this focused on deterministic failures of input values (validation,
/// malformed identifiers). Store and lookup failures belong to the catalog.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Domain errors are always the caller's fault.
    pub fn class(&self) -> ErrorClass {
        ErrorClass::BadRequest
    }
}
