//! Local file source.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::instrument;

use rubricate_core::error::LoadError;
use rubricate_core::traits::{DatasetSource, RawDocument};

/// Reads a dataset (or criteria document) from disk.
pub struct LocalFileSource {
    path: PathBuf,
    location: String,
}

impl LocalFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let location = path.display().to_string();
        Self { path, location }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DatasetSource for LocalFileSource {
    fn location(&self) -> &str {
        &self.location
    }

    #[instrument(skip(self), fields(path = %self.location))]
    async fn fetch(&self) -> Result<RawDocument, LoadError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| LoadError::Read {
                location: self.location.clone(),
                message: e.to_string(),
            })?;
        tracing::debug!(bytes = content.len(), "read local document");
        Ok(RawDocument {
            name: self.location.clone(),
            content,
        })
    }
}
