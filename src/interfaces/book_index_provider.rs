//! Book index provider trait definition.
//!
//! This module defines the abstract interface for book index operations,
//! allowing for different backend implementations (OpenSearch,
//! Elasticsearch, in-memory, etc.).

use async_trait::async_trait;

use crate::book::Book;
use crate::errors::BookStoreError;
use crate::query::{Page, PageRequest, Query};

/// Abstracts the underlying search index implementation.
///
/// Implementations are injected into `BookStore` to enable dependency
/// injection and easy testing with mock implementations.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, BookStoreError>` for consistent error
/// handling across different backend implementations. Absence of a document
/// is reported as `Ok(None)` or a successful no-op, never as an error.
#[async_trait]
pub trait BookIndexProvider: Send + Sync {
    /// Index a single book document.
    ///
    /// If a document with the same id already exists, it is replaced.
    async fn index_document(&self, book: &Book) -> Result<(), BookStoreError>;

    /// Index multiple book documents in a single bulk operation.
    ///
    /// This is more efficient than calling `index_document` multiple times.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If all documents were indexed successfully
    /// * `Err(BookStoreError::BulkIndexError)` - If any document failed to index
    async fn bulk_index(&self, books: &[Book]) -> Result<(), BookStoreError>;

    /// Fetch a single document by id.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(book))` - If the document exists
    /// * `Ok(None)` - If no document has the given id
    async fn get_document(&self, id: &str) -> Result<Option<Book>, BookStoreError>;

    /// Total number of documents in the index.
    async fn count(&self) -> Result<u64, BookStoreError>;

    /// Delete a document by id.
    ///
    /// If the document doesn't exist, the operation is considered successful.
    async fn delete_document(&self, id: &str) -> Result<(), BookStoreError>;

    /// Delete multiple documents by id.
    ///
    /// Ids that don't exist are considered successful deletions.
    async fn bulk_delete(&self, ids: &[String]) -> Result<(), BookStoreError>;

    /// Delete every document in the index.
    async fn delete_all(&self) -> Result<(), BookStoreError>;

    /// Execute a structured query and return one page of matches.
    async fn search(
        &self,
        query: &Query,
        page: &PageRequest,
    ) -> Result<Page<Book>, BookStoreError>;

    /// Ensure the index exists with proper mappings.
    ///
    /// If the index doesn't exist, it is created with the appropriate
    /// settings and mappings for book documents. This should be called
    /// during application startup.
    async fn ensure_index_exists(&self) -> Result<(), BookStoreError>;

    /// Make all writes up to this point visible to subsequent searches.
    async fn refresh(&self) -> Result<(), BookStoreError>;

    /// Check if the search engine is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the search engine is healthy
    /// * `Ok(false)` - If the search engine is unhealthy
    /// * `Err(BookStoreError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, BookStoreError>;
}
