//! OpenSearch index configuration and mappings.
//!
//! This module defines the index settings and mappings for the book index.

use serde_json::{json, Value};

/// The default name of the book index.
pub const DEFAULT_INDEX_NAME: &str = "books";

/// Configuration for the book index.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Name of the index.
    pub name: String,
}

impl IndexConfig {
    /// Create a config for the given index name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_NAME)
    }
}

/// Get the index settings and mappings for the book index.
///
/// The configuration includes:
/// - **Keyword fields**: `id` and `name` for filtering and exact lookups
///   (`name` carries a `text` subfield for full-text matching)
/// - **Numeric fields**: `price` (integer) and `version` (long)
/// - **Nested field**: `buckets`, so each integer bucket key can be term
///   filtered independently via paths like `buckets.1`
pub fn get_index_settings() -> Value {
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "mappings": {
            "properties": {
                "id": {
                    "type": "keyword"
                },
                "name": {
                    "type": "keyword",
                    "fields": {
                        "text": {
                            "type": "text"
                        }
                    }
                },
                "price": {
                    "type": "integer"
                },
                "version": {
                    "type": "long"
                },
                "buckets": {
                    "type": "nested",
                    "dynamic": true
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_settings_structure() {
        let settings = get_index_settings();

        // Check settings exist
        assert!(settings["settings"]["number_of_shards"].is_number());
        assert!(settings["settings"]["number_of_replicas"].is_number());

        // Check mappings exist
        assert!(settings["mappings"]["properties"]["id"].is_object());
        assert!(settings["mappings"]["properties"]["name"].is_object());
        assert!(settings["mappings"]["properties"]["price"].is_object());

        // Exact-match fields are keywords
        assert_eq!(settings["mappings"]["properties"]["id"]["type"], "keyword");
        assert_eq!(
            settings["mappings"]["properties"]["name"]["type"],
            "keyword"
        );

        // Buckets are nested for per-key filtering
        assert_eq!(
            settings["mappings"]["properties"]["buckets"]["type"],
            "nested"
        );
    }

    #[test]
    fn test_default_index_name() {
        assert_eq!(IndexConfig::default().name, "books");
    }
}
