//! Book store error types.
//!
//! This module defines the error types that can occur during book store
//! operations. Absence of a document by id is a normal empty result, not an
//! error.

use thiserror::Error;

/// Errors that can occur during book store operations.
#[derive(Debug, Clone, Error)]
pub enum BookStoreError {
    /// Malformed document or request rejected before reaching the engine.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Failed to establish connection to the search engine.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Search query execution failed.
    #[error("Query error: {0}")]
    QueryError(String),

    /// Failed to index a document.
    #[error("Index error: {0}")]
    IndexError(String),

    /// Bulk indexing operation had failures.
    #[error("Bulk index error: {0}")]
    BulkIndexError(String),

    /// Failed to delete a document.
    #[error("Delete error: {0}")]
    DeleteError(String),

    /// Failed to create the index.
    #[error("Index creation error: {0}")]
    IndexCreationError(String),

    /// Failed to parse a response from the search engine.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Batch size exceeds configured maximum.
    #[error("Batch size {provided} exceeds maximum {max}")]
    BatchSizeExceeded { provided: usize, max: usize },

    /// Unknown error.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl BookStoreError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Create an index error.
    pub fn index(msg: impl Into<String>) -> Self {
        Self::IndexError(msg.into())
    }

    /// Create a bulk index error.
    pub fn bulk_index(msg: impl Into<String>) -> Self {
        Self::BulkIndexError(msg.into())
    }

    /// Create a delete error.
    pub fn delete(msg: impl Into<String>) -> Self {
        Self::DeleteError(msg.into())
    }

    /// Create an index creation error.
    pub fn index_creation(msg: impl Into<String>) -> Self {
        Self::IndexCreationError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a batch size exceeded error.
    pub fn batch_size_exceeded(provided: usize, max: usize) -> Self {
        Self::BatchSizeExceeded { provided, max }
    }

    /// Create an unknown error.
    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }
}
