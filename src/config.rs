//! Configuration types for the BookStore.

/// Configuration for the BookStore.
#[derive(Debug, Clone)]
pub struct BookStoreConfig {
    /// Maximum number of documents allowed in a single batch operation.
    /// Set to None to disable the limit (not recommended for production).
    pub max_batch_size: Option<usize>,
    /// Refresh the index after every mutating operation so writes become
    /// searchable immediately. Slows down indexing; intended for tests and
    /// tooling, not bulk ingestion.
    pub refresh_on_write: bool,
}

impl Default for BookStoreConfig {
    fn default() -> Self {
        Self {
            max_batch_size: Some(1000),
            refresh_on_write: false,
        }
    }
}

impl BookStoreConfig {
    /// Create a config with no batch size limit (use with caution).
    pub fn unlimited() -> Self {
        Self {
            max_batch_size: None,
            ..Self::default()
        }
    }

    /// Create a config with a custom batch size limit.
    pub fn with_max_batch_size(max_batch_size: usize) -> Self {
        Self {
            max_batch_size: Some(max_batch_size),
            ..Self::default()
        }
    }

    /// Enable per-write index refresh.
    pub fn refresh_on_write(mut self) -> Self {
        self.refresh_on_write = true;
        self
    }
}
