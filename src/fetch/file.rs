//! Local file document source

use async_trait::async_trait;
use std::io::ErrorKind;
use std::time::Duration;

use super::{with_timeout, DocumentSource, FetchError};
use crate::document::ScreenerDocument;

/// Reads the document from the filesystem on every fetch
pub struct FileSource {
    path: String,
    timeout: Duration,
}

impl FileSource {
    pub fn new(path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            path: path.into(),
            timeout,
        }
    }

    async fn read(&self) -> Result<ScreenerDocument, FetchError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => FetchError::NotFound(self.path.clone()),
            _ => FetchError::Network(e.to_string()),
        })?;

        ScreenerDocument::from_slice(&bytes).map_err(|e| FetchError::Parse(e.to_string()))
    }
}

#[async_trait]
impl DocumentSource for FileSource {
    async fn fetch(&self) -> Result<ScreenerDocument, FetchError> {
        tracing::debug!(path = %self.path, "Reading screener document");
        with_timeout(self.timeout, self.read()).await
    }

    fn location(&self) -> &str {
        &self.path
    }
}
