//! Error types for the book index repository.

mod book_store_error;

pub use book_store_error::BookStoreError;
