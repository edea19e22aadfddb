//! Plain HTTP source for datasets served by a static file server.

use std::time::Duration;

use async_trait::async_trait;
use tracing::instrument;

use rubricate_core::error::LoadError;
use rubricate_core::traits::{DatasetSource, RawDocument};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fetches a document with a single GET request.
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: &str) -> Result<Self, LoadError> {
        Self::with_timeout(url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(url: &str, timeout: Duration) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LoadError::Network {
                location: url.to_string(),
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            url: url.to_string(),
            client,
        })
    }
}

#[async_trait]
impl DatasetSource for HttpSource {
    fn location(&self) -> &str {
        &self.url
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<RawDocument, LoadError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| LoadError::Network {
                location: self.url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Http {
                location: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let content = response.text().await.map_err(|e| LoadError::Network {
            location: self.url.clone(),
            message: e.to_string(),
        })?;
        tracing::debug!(bytes = content.len(), "fetched remote document");

        Ok(RawDocument {
            name: self.url.clone(),
            content,
        })
    }
}
