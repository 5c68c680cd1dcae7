//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `BookIndexProvider`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    cluster::ClusterHealthParts,
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts, IndicesRefreshParts},
    BulkParts, CountParts, DeleteByQueryParts, DeleteParts, GetParts, IndexParts, OpenSearch,
    SearchParts,
};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::book::Book;
use crate::errors::BookStoreError;
use crate::interfaces::BookIndexProvider;
use crate::opensearch::index_config::{get_index_settings, IndexConfig};
use crate::opensearch::queries::build_search_body;
use crate::query::{Page, PageRequest, Query};

/// OpenSearch implementation of the book index.
///
/// # Example
///
/// ```ignore
/// use book_index_repository::opensearch::{IndexConfig, OpenSearchBookIndex};
/// use book_index_repository::{Book, BookStore};
///
/// let config = IndexConfig::new("books");
/// let provider = OpenSearchBookIndex::new("http://localhost:9200", config)?;
/// provider.ensure_index_exists().await?;
///
/// let store = BookStore::new(Box::new(provider));
/// store.save(Book::new("123455", "Spring Data", 0)).await?;
/// ```
#[derive(Debug)]
pub struct OpenSearchBookIndex {
    client: OpenSearch,
    index_config: IndexConfig,
}

impl OpenSearchBookIndex {
    /// Create a new OpenSearch-backed book index.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `index_config` - The index configuration containing the index name
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchBookIndex)` - A new provider instance
    /// * `Err(BookStoreError)` - If connection setup fails
    pub fn new(url: &str, index_config: IndexConfig) -> Result<Self, BookStoreError> {
        let parsed_url = Url::parse(url).map_err(|e| BookStoreError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| BookStoreError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            index = %index_config.name,
            "Created OpenSearch book index client"
        );

        Ok(Self {
            client,
            index_config,
        })
    }

    /// Parse a single search hit into a `Book`.
    ///
    /// Returns `None` if the hit's `_source` doesn't deserialize; such hits
    /// are skipped rather than failing the whole page.
    fn parse_hit(hit: &Value) -> Option<Book> {
        serde_json::from_value(hit.get("_source")?.clone()).ok()
    }
}

#[async_trait]
impl BookIndexProvider for OpenSearchBookIndex {
    /// Index a single book document, replacing any existing document with
    /// the same id (upsert).
    async fn index_document(&self, book: &Book) -> Result<(), BookStoreError> {
        let response = self
            .client
            .index(IndexParts::IndexId(&self.index_config.name, &book.id))
            .body(book)
            .send()
            .await
            .map_err(|e| BookStoreError::index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Index request failed");
            return Err(BookStoreError::index(format!(
                "Index failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(id = %book.id, "Document indexed");
        Ok(())
    }

    /// Index multiple documents with a single bulk request.
    ///
    /// Any per-item failure reported by the engine fails the whole call
    /// with a `BulkIndexError` naming the failed ids.
    async fn bulk_index(&self, books: &[Book]) -> Result<(), BookStoreError> {
        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(books.len() * 2);
        for book in books {
            body.push(json!({ "index": { "_id": book.id } }).into());
            let doc = serde_json::to_value(book)
                .map_err(|e| BookStoreError::bulk_index(e.to_string()))?;
            body.push(doc.into());
        }

        let response = self
            .client
            .bulk(BulkParts::Index(&self.index_config.name))
            .body(body)
            .send()
            .await
            .map_err(|e| BookStoreError::bulk_index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(BookStoreError::bulk_index(format!(
                "Bulk index failed with status {}: {}",
                status, error_body
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| BookStoreError::parse(e.to_string()))?;

        if response_body["errors"].as_bool().unwrap_or(false) {
            let failed_ids: Vec<String> = response_body["items"]
                .as_array()
                .into_iter()
                .flatten()
                .filter(|item| item["index"]["error"].is_object())
                .filter_map(|item| item["index"]["_id"].as_str().map(String::from))
                .collect();
            error!(failed = ?failed_ids, "Bulk index had item failures");
            return Err(BookStoreError::bulk_index(format!(
                "Bulk index had failures for ids: {:?}",
                failed_ids
            )));
        }

        debug!(count = books.len(), "Documents bulk indexed");
        Ok(())
    }

    /// Fetch a document by id; an absent document is `Ok(None)`.
    async fn get_document(&self, id: &str) -> Result<Option<Book>, BookStoreError> {
        let response = self
            .client
            .get(GetParts::IndexId(&self.index_config.name, id))
            .send()
            .await
            .map_err(|e| BookStoreError::query(e.to_string()))?;

        let status = response.status_code();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Get request failed");
            return Err(BookStoreError::query(format!(
                "Get failed with status {}: {}",
                status, error_body
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| BookStoreError::parse(e.to_string()))?;

        let book = serde_json::from_value(response_body["_source"].clone())
            .map_err(|e| BookStoreError::parse(e.to_string()))?;

        Ok(Some(book))
    }

    async fn count(&self) -> Result<u64, BookStoreError> {
        let response = self
            .client
            .count(CountParts::Index(&[self.index_config.name.as_str()]))
            .send()
            .await
            .map_err(|e| BookStoreError::query(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Count request failed");
            return Err(BookStoreError::query(format!(
                "Count failed with status {}: {}",
                status, error_body
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| BookStoreError::parse(e.to_string()))?;

        response_body["count"]
            .as_u64()
            .ok_or_else(|| BookStoreError::parse("Missing count in response"))
    }

    /// Delete a document by id. A missing document is not an error.
    async fn delete_document(&self, id: &str) -> Result<(), BookStoreError> {
        let response = self
            .client
            .delete(DeleteParts::IndexId(&self.index_config.name, id))
            .send()
            .await
            .map_err(|e| BookStoreError::delete(e.to_string()))?;

        let status = response.status_code();

        // 404 is acceptable - document may not exist
        if !status.is_success() && status.as_u16() != 404 {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Delete request failed");
            return Err(BookStoreError::delete(format!(
                "Delete failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(id = %id, "Document deleted");
        Ok(())
    }

    async fn bulk_delete(&self, ids: &[String]) -> Result<(), BookStoreError> {
        for id in ids {
            self.delete_document(id).await?;
        }
        Ok(())
    }

    /// Delete every document in the index via delete-by-query.
    async fn delete_all(&self) -> Result<(), BookStoreError> {
        let response = self
            .client
            .delete_by_query(DeleteByQueryParts::Index(&[self.index_config.name.as_str()]))
            .body(json!({ "query": { "match_all": {} } }))
            .send()
            .await
            .map_err(|e| BookStoreError::delete(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Delete-by-query failed");
            return Err(BookStoreError::delete(format!(
                "Delete all failed with status {}: {}",
                status, error_body
            )));
        }

        debug!("All documents deleted");
        Ok(())
    }

    async fn search(
        &self,
        query: &Query,
        page: &PageRequest,
    ) -> Result<Page<Book>, BookStoreError> {
        let body = build_search_body(query, page);

        let response = self
            .client
            .search(SearchParts::Index(&[self.index_config.name.as_str()]))
            .body(body)
            .send()
            .await
            .map_err(|e| BookStoreError::query(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Search request failed");
            return Err(BookStoreError::query(format!(
                "Search failed with status {}: {}",
                status, error_body
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| BookStoreError::parse(e.to_string()))?;

        let total = response_body["hits"]["total"]["value"]
            .as_u64()
            .unwrap_or(0);

        let items: Vec<Book> = response_body["hits"]["hits"]
            .as_array()
            .into_iter()
            .flatten()
            .filter_map(|hit| {
                let book = Self::parse_hit(hit);
                if book.is_none() {
                    warn!(hit = %hit, "Skipping unparseable search hit");
                }
                book
            })
            .collect();

        debug!(total = total, returned = items.len(), "Search executed");
        Ok(Page::new(items, total, page))
    }

    /// Create the index with the book mappings if it doesn't exist yet.
    async fn ensure_index_exists(&self) -> Result<(), BookStoreError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[self.index_config.name.as_str()]))
            .send()
            .await
            .map_err(|e| BookStoreError::connection(e.to_string()))?;

        if response.status_code().is_success() {
            debug!(index = %self.index_config.name, "Index already exists");
            return Ok(());
        }

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&self.index_config.name))
            .body(get_index_settings())
            .send()
            .await
            .map_err(|e| BookStoreError::index_creation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Index creation failed");
            return Err(BookStoreError::index_creation(format!(
                "Index creation failed with status {}: {}",
                status, error_body
            )));
        }

        info!(index = %self.index_config.name, "Index created");
        Ok(())
    }

    async fn refresh(&self) -> Result<(), BookStoreError> {
        let response = self
            .client
            .indices()
            .refresh(IndicesRefreshParts::Index(&[self.index_config.name.as_str()]))
            .send()
            .await
            .map_err(|e| BookStoreError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(BookStoreError::unknown(format!(
                "Refresh failed with status {}: {}",
                status, error_body
            )));
        }

        Ok(())
    }

    /// Check cluster health; a red cluster is reported as unhealthy.
    async fn health_check(&self) -> Result<bool, BookStoreError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| BookStoreError::connection(e.to_string()))?;

        if !response.status_code().is_success() {
            return Ok(false);
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| BookStoreError::parse(e.to_string()))?;

        Ok(response_body["status"].as_str() != Some("red"))
    }
}
