//! In-memory source for tests.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use rubricate_core::error::LoadError;
use rubricate_core::traits::{DatasetSource, RawDocument};

/// Serves a fixed document, or fails every fetch.
pub struct MockSource {
    name: String,
    content: Option<String>,
    call_count: AtomicU32,
}

impl MockSource {
    /// A source that always returns `content` under `name`. The name drives
    /// format detection, so use a `.csv` or `.json` suffix.
    pub fn new(name: &str, content: &str) -> Self {
        Self {
            name: name.to_string(),
            content: Some(content.to_string()),
            call_count: AtomicU32::new(0),
        }
    }

    /// A source whose every fetch fails with a read error.
    pub fn failing(name: &str) -> Self {
        Self {
            name: name.to_string(),
            content: None,
            call_count: AtomicU32::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl DatasetSource for MockSource {
    fn location(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<RawDocument, LoadError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        match &self.content {
            Some(content) => Ok(RawDocument {
                name: self.name.clone(),
                content: content.clone(),
            }),
            None => Err(LoadError::Read {
                location: self.name.clone(),
                message: "mock source configured to fail".into(),
            }),
        }
    }
}
