//! In-memory book index used by the contract tests.
//!
//! Implements `BookIndexProvider` over a plain map and evaluates the
//! structured query model directly, so the repository contract can be
//! exercised without a running engine.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use book_index_repository::query::SortOrder;
use book_index_repository::{Book, BookIndexProvider, BookStoreError, Page, PageRequest, Query};

#[derive(Default)]
pub struct InMemoryBookIndex {
    docs: Mutex<BTreeMap<String, Book>>,
}

impl InMemoryBookIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

fn term_matches(book: &Book, field: &str, value: &Value) -> bool {
    match field {
        "id" => value.as_str() == Some(book.id.as_str()),
        "name" => book.name.is_some() && value.as_str() == book.name.as_deref(),
        "price" => book.price.is_some() && value.as_i64() == book.price,
        "version" => value.as_i64() == Some(book.version),
        other => match other.strip_prefix("buckets.") {
            Some(key) => {
                let Ok(key) = key.parse::<i32>() else {
                    return false;
                };
                match (book.buckets.get(&key), value.as_str()) {
                    (Some(values), Some(term)) => values.contains(term),
                    _ => false,
                }
            }
            None => false,
        },
    }
}

fn field_exists(book: &Book, field: &str) -> bool {
    match field {
        "id" | "version" => true,
        "name" => book.name.is_some(),
        "price" => book.price.is_some(),
        "buckets" => !book.buckets.is_empty(),
        other => match other.strip_prefix("buckets.") {
            Some(key) => key
                .parse::<i32>()
                .is_ok_and(|key| book.buckets.contains_key(&key)),
            None => false,
        },
    }
}

fn matches(book: &Book, query: &Query) -> bool {
    match query {
        Query::MatchAll => true,
        Query::Term { field, value } => term_matches(book, field, value),
        Query::Exists { field } => field_exists(book, field),
        // Bucket fields are addressed by full path, so nested scoping
        // reduces to evaluating the inner query against the same book.
        Query::Nested { query, .. } => matches(book, query),
        Query::Bool(bool_query) => {
            let must = bool_query.must.iter().all(|q| matches(book, q));
            let filter = bool_query.filter.iter().all(|q| matches(book, q));
            let must_not = !bool_query.must_not.iter().any(|q| matches(book, q));
            let should = bool_query.should.is_empty()
                || bool_query.should.iter().any(|q| matches(book, q));
            must && filter && must_not && should
        }
    }
}

fn sort_key(book: &Book, field: &str) -> String {
    match field {
        "id" => book.id.clone(),
        "name" => book.name.clone().unwrap_or_else(|| "\u{10FFFF}".to_string()),
        "price" => format!("{:020}", book.price.unwrap_or(i64::MAX)),
        "version" => format!("{:020}", book.version),
        _ => String::new(),
    }
}

#[async_trait]
impl BookIndexProvider for InMemoryBookIndex {
    async fn index_document(&self, book: &Book) -> Result<(), BookStoreError> {
        self.docs
            .lock()
            .await
            .insert(book.id.clone(), book.clone());
        Ok(())
    }

    async fn bulk_index(&self, books: &[Book]) -> Result<(), BookStoreError> {
        let mut docs = self.docs.lock().await;
        for book in books {
            docs.insert(book.id.clone(), book.clone());
        }
        Ok(())
    }

    async fn get_document(&self, id: &str) -> Result<Option<Book>, BookStoreError> {
        Ok(self.docs.lock().await.get(id).cloned())
    }

    async fn count(&self) -> Result<u64, BookStoreError> {
        Ok(self.docs.lock().await.len() as u64)
    }

    async fn delete_document(&self, id: &str) -> Result<(), BookStoreError> {
        self.docs.lock().await.remove(id);
        Ok(())
    }

    async fn bulk_delete(&self, ids: &[String]) -> Result<(), BookStoreError> {
        let mut docs = self.docs.lock().await;
        for id in ids {
            docs.remove(id);
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), BookStoreError> {
        self.docs.lock().await.clear();
        Ok(())
    }

    async fn search(
        &self,
        query: &Query,
        page: &PageRequest,
    ) -> Result<Page<Book>, BookStoreError> {
        let docs = self.docs.lock().await;
        let mut matched: Vec<Book> = docs.values().filter(|b| matches(b, query)).cloned().collect();

        if let Some(sort) = &page.sort {
            matched.sort_by_key(|book| sort_key(book, &sort.field));
            if sort.order == SortOrder::Desc {
                matched.reverse();
            }
        }

        let total = matched.len() as u64;
        let items: Vec<Book> = matched
            .into_iter()
            .skip(page.offset())
            .take(page.size)
            .collect();

        Ok(Page::new(items, total, page))
    }

    async fn ensure_index_exists(&self) -> Result<(), BookStoreError> {
        Ok(())
    }

    async fn refresh(&self) -> Result<(), BookStoreError> {
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, BookStoreError> {
        Ok(true)
    }
}
