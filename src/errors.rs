// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for catalog operations

use thiserror::Error;

use crate::domain::ValidationError;

/// Errors that can occur in catalog operations
///
/// Read paths have no visibility variant: a hidden record surfaces as an
/// empty result or as [`CatalogError::NotFound`].
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Unknown domain, offering or detail
    #[error("no such resource: {kind} {id}")]
    NotFound { kind: &'static str, id: String },

    /// Malformed input rejected before reaching the store
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Unique-constraint or state conflict reported on a write
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Caller can see the record but may not change it
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Backend failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CatalogError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        CatalogError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CatalogError::Validation(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, CatalogError::Conflict(_))
    }
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Serialization(err.to_string())
    }
}
