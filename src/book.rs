//! The `Book` document entity.
//!
//! A `Book` is a single indexed record. The backing index is authoritative;
//! there is no in-process cache or entity lifecycle beyond
//! create/update/delete against the index.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single book document in the index.
///
/// `id` must be unique across the index. `name` and `price` are nullable
/// exact-match filter fields. `version` is an epoch-millisecond timestamp
/// used by the store for versioning; a zero version is stamped on save.
/// `buckets` maps small integer keys to order-irrelevant string sets and is
/// indexed as a nested sub-document, so each key can be filtered
/// independently (e.g. a term query on `buckets.1`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Unique document identifier.
    pub id: String,
    /// Optional display name; exact-match filterable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Optional price; exact-match filterable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    /// Version timestamp in epoch milliseconds.
    #[serde(default)]
    pub version: i64,
    /// Nested bucket map: integer key to set of terms.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub buckets: BTreeMap<i32, BTreeSet<String>>,
}

impl Book {
    /// Create a book with the given id, name, and version.
    pub fn new(id: impl Into<String>, name: impl Into<String>, version: i64) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            price: None,
            version,
            buckets: BTreeMap::new(),
        }
    }

    /// Create a book with a store-generated UUIDv4 id.
    pub fn with_generated_id(name: impl Into<String>, version: i64) -> Self {
        Self::new(Uuid::new_v4().to_string(), name, version)
    }

    /// Set the price.
    pub fn with_price(mut self, price: i64) -> Self {
        self.price = Some(price);
        self
    }

    /// Add a bucket entry under the given key.
    pub fn with_bucket<I, S>(mut self, key: i32, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.buckets
            .entry(key)
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }
}
