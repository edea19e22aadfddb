//! Core trait definitions for dataset sources and durable storage.
//!
//! Sources are implemented by the `rubricate-sources` crate; storage
//! backends live in [`crate::store`].

use async_trait::async_trait;

use crate::error::{LoadError, StoreError};

// ---------------------------------------------------------------------------
// Dataset source trait
// ---------------------------------------------------------------------------

/// A raw, not yet adapted document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// Path or URL the document came from; also used for format detection.
    pub name: String,
    pub content: String,
}

/// Anything that can produce the dataset document (or the criteria text).
///
/// Fetching happens once per session start and is the only asynchronous
/// boundary in the system.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Human-readable location, used in log lines and error messages.
    fn location(&self) -> &str;

    /// Fetch the whole document.
    async fn fetch(&self) -> Result<RawDocument, LoadError>;
}

// ---------------------------------------------------------------------------
// Key/value store trait
// ---------------------------------------------------------------------------

/// Durable string key/value storage scoped to one reviewer profile.
///
/// Values are JSON documents. Implementations need not be thread-safe: all
/// access is synchronous and same-thread.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// All keys currently stored, in ascending order.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}
