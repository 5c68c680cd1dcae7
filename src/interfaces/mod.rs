//! Interface definitions for the book index backend.
//!
//! This module defines the abstract `BookIndexProvider` trait that allows
//! for dependency injection and swappable search backend implementations.

mod book_index_provider;

pub use book_index_provider::BookIndexProvider;
