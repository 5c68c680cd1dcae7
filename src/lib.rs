//! # Book Index Repository
//!
//! This crate provides a document-repository client for `Book` entities
//! backed by a search engine. It includes the entity and query models,
//! error types, the `BookIndexProvider` backend trait, and a concrete
//! implementation for OpenSearch.
//!
//! Application code talks to [`BookStore`], which validates requests,
//! stamps store-assigned fields, and delegates to the injected provider.

pub mod book;
pub mod client;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod query;

pub use book::Book;
pub use client::BookStore;
pub use config::BookStoreConfig;
pub use errors::BookStoreError;
pub use interfaces::BookIndexProvider;
pub use opensearch::OpenSearchBookIndex;
pub use query::{BoolQuery, Page, PageRequest, Query, Sort, SortOrder};
