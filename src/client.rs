//! Book store implementation.
//!
//! This module provides the main repository facade for the book index.
//! Application code uses this to save, fetch, delete, count, and search
//! book documents.

use chrono::Utc;
use tracing::debug;

use crate::book::Book;
use crate::config::BookStoreConfig;
use crate::errors::BookStoreError;
use crate::interfaces::BookIndexProvider;
use crate::query::{Page, PageRequest, Query};

/// The main repository client for the book index.
///
/// Validates requests, stamps store-assigned fields, builds the queries for
/// the derived finder methods, and delegates execution to the injected
/// [`BookIndexProvider`]. Each operation is a single round-trip to the
/// backend; there is no in-process cache, retry, or recovery logic.
pub struct BookStore {
    provider: Box<dyn BookIndexProvider>,
    config: BookStoreConfig,
}

impl BookStore {
    /// Create a new BookStore with default configuration.
    pub fn new(provider: Box<dyn BookIndexProvider>) -> Self {
        Self {
            provider,
            config: BookStoreConfig::default(),
        }
    }

    /// Create a new BookStore with custom configuration.
    pub fn with_config(provider: Box<dyn BookIndexProvider>, config: BookStoreConfig) -> Self {
        Self { provider, config }
    }

    /// Check if batch size exceeds the configured limit.
    fn validate_batch_size(&self, size: usize) -> Result<(), BookStoreError> {
        if let Some(max) = self.config.max_batch_size {
            if size > max {
                return Err(BookStoreError::batch_size_exceeded(size, max));
            }
        }
        Ok(())
    }

    /// Validate a book and stamp store-assigned fields before indexing.
    ///
    /// A zero version is replaced with the current epoch-millis timestamp.
    fn prepare_for_save(book: &mut Book) -> Result<(), BookStoreError> {
        if book.id.is_empty() {
            return Err(BookStoreError::validation("id is required"));
        }
        if book.version == 0 {
            book.version = Utc::now().timestamp_millis();
        }
        Ok(())
    }

    /// Refresh the index after a write when configured to do so.
    async fn refresh_after_write(&self) -> Result<(), BookStoreError> {
        if self.config.refresh_on_write {
            self.provider.refresh().await?;
        }
        Ok(())
    }

    /// Upsert a single book by id and return the stored entity.
    ///
    /// The returned book carries any store-assigned fields (a stamped
    /// version). A book with an empty id is rejected with a validation
    /// error before any request is sent.
    pub async fn save(&self, mut book: Book) -> Result<Book, BookStoreError> {
        Self::prepare_for_save(&mut book)?;

        self.provider.index_document(&book).await?;
        self.refresh_after_write().await?;

        debug!(id = %book.id, "Book saved");
        Ok(book)
    }

    /// Upsert multiple books in a single bulk request.
    ///
    /// An empty input is a no-op. The batch size is limited by the
    /// configured max_batch_size (default: 1000). Every book must have a
    /// non-empty id; the whole batch is rejected before any request is sent
    /// if one doesn't.
    pub async fn save_all(&self, mut books: Vec<Book>) -> Result<Vec<Book>, BookStoreError> {
        if books.is_empty() {
            return Ok(books);
        }

        self.validate_batch_size(books.len())?;

        for book in &mut books {
            Self::prepare_for_save(book)?;
        }

        self.provider.bulk_index(&books).await?;
        self.refresh_after_write().await?;

        debug!(count = books.len(), "Books saved in bulk");
        Ok(books)
    }

    /// Fetch a book by id.
    ///
    /// Absence of the document is `Ok(None)`, not an error.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Book>, BookStoreError> {
        if id.is_empty() {
            return Ok(None);
        }
        self.provider.get_document(id).await
    }

    /// Return one page of all books, ordered by the request's optional sort.
    pub async fn find_all(&self, page: &PageRequest) -> Result<Page<Book>, BookStoreError> {
        self.provider.search(&Query::match_all(), page).await
    }

    /// Total number of books in the index.
    pub async fn count(&self) -> Result<u64, BookStoreError> {
        self.provider.count().await
    }

    /// Whether a book with the given id exists.
    pub async fn exists_by_id(&self, id: &str) -> Result<bool, BookStoreError> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    /// Delete a book by id.
    ///
    /// Deleting an absent id is not an error. An empty id is rejected with
    /// a validation error.
    pub async fn delete_by_id(&self, id: &str) -> Result<(), BookStoreError> {
        if id.is_empty() {
            return Err(BookStoreError::validation("id is required"));
        }

        self.provider.delete_document(id).await?;
        self.refresh_after_write().await?;

        debug!(id = %id, "Book deleted");
        Ok(())
    }

    /// Delete a book by entity.
    pub async fn delete(&self, book: &Book) -> Result<(), BookStoreError> {
        self.delete_by_id(&book.id).await
    }

    /// Delete multiple books by entity.
    ///
    /// An empty input is a no-op. Ids that don't exist are ignored; the
    /// batch size limit applies.
    pub async fn delete_many(&self, books: &[Book]) -> Result<(), BookStoreError> {
        if books.is_empty() {
            return Ok(());
        }

        self.validate_batch_size(books.len())?;

        let ids: Vec<String> = books
            .iter()
            .map(|book| {
                if book.id.is_empty() {
                    Err(BookStoreError::validation("All books must have an id"))
                } else {
                    Ok(book.id.clone())
                }
            })
            .collect::<Result<_, _>>()?;

        self.provider.bulk_delete(&ids).await?;
        self.refresh_after_write().await?;

        debug!(count = ids.len(), "Books deleted in bulk");
        Ok(())
    }

    /// Delete every book in the index.
    pub async fn delete_all(&self) -> Result<(), BookStoreError> {
        self.provider.delete_all().await?;
        self.refresh_after_write().await?;

        debug!("All books deleted");
        Ok(())
    }

    /// Books whose name exactly matches `name`.
    ///
    /// Documents with a different or absent name are excluded.
    pub async fn find_by_name(
        &self,
        name: &str,
        page: &PageRequest,
    ) -> Result<Page<Book>, BookStoreError> {
        self.provider.search(&Query::term("name", name), page).await
    }

    /// Books matching both the exact name and the exact price.
    pub async fn find_by_name_and_price(
        &self,
        name: &str,
        price: i64,
        page: &PageRequest,
    ) -> Result<Page<Book>, BookStoreError> {
        let query = Query::bool_query()
            .must(Query::term("name", name))
            .must(Query::term("price", price))
            .build();
        self.provider.search(&query, page).await
    }

    /// Books matching the exact name, the exact price, or both.
    pub async fn find_by_name_or_price(
        &self,
        name: &str,
        price: i64,
        page: &PageRequest,
    ) -> Result<Page<Book>, BookStoreError> {
        let query = Query::bool_query()
            .should(Query::term("name", name))
            .should(Query::term("price", price))
            .build();
        self.provider.search(&query, page).await
    }

    /// Execute an arbitrary structured query.
    pub async fn search(
        &self,
        query: &Query,
        page: &PageRequest,
    ) -> Result<Page<Book>, BookStoreError> {
        self.provider.search(query, page).await
    }

    /// Ensure the backing index exists with proper mappings.
    pub async fn ensure_index_exists(&self) -> Result<(), BookStoreError> {
        self.provider.ensure_index_exists().await
    }

    /// Make all writes up to this point visible to subsequent searches.
    pub async fn refresh(&self) -> Result<(), BookStoreError> {
        self.provider.refresh().await
    }

    /// Check if the backing engine is healthy and reachable.
    pub async fn health_check(&self) -> Result<bool, BookStoreError> {
        self.provider.health_check().await
    }
}
