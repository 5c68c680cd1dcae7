//! OpenSearch implementation of the book index provider.
//!
//! This module provides a concrete implementation of `BookIndexProvider`
//! using OpenSearch as the backend.

mod client;
mod index_config;
mod queries;

pub use client::OpenSearchBookIndex;
pub use index_config::IndexConfig;
