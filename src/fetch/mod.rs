//! Document Fetching
//!
//! Retrieves the screener document from a [`DocumentSource`]. Sources never
//! retry; every call is bounded by the source's timeout, and a call that
//! exceeds it is dropped so it cannot report anything afterward.
//!
//! ## Sources
//!
//! - [`HttpSource`] for `http://` and `https://` locations
//! - [`FileSource`] for local paths written by the screener job

mod file;
mod http;

pub use file::FileSource;
pub use http::HttpSource;

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::document::ScreenerDocument;

/// Default location of the screener document
pub const DEFAULT_LOCATION: &str = "data/screener_results.json";

/// Default upper bound for one fetch
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Errors that can occur while fetching a document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    #[error("HTTP {status}: {reason}")]
    HttpStatus { status: u16, reason: String },

    #[error("Data file not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse document: {0}")]
    Parse(String),
}

/// A place the screener document can be read from
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch and parse the current document
    async fn fetch(&self) -> Result<ScreenerDocument, FetchError>;

    /// Where the document is read from
    fn location(&self) -> &str;
}

/// Run `operation`, giving up with [`FetchError::Timeout`] after `limit`
pub async fn with_timeout<T, F>(limit: Duration, operation: F) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, FetchError>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout(limit.as_millis() as u64)),
    }
}

/// Whether a location names an HTTP resource
pub fn is_http(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Pick the source implementation for a location.
///
/// A relative location is resolved against `http_base` when one is given.
pub fn source_for(
    location: &str,
    http_base: Option<&str>,
    timeout: Duration,
) -> Result<Arc<dyn DocumentSource>, FetchError> {
    if is_http(location) {
        return Ok(Arc::new(HttpSource::new(location, timeout)?));
    }

    match http_base.filter(|base| !base.is_empty()) {
        Some(base) => {
            let url = format!(
                "{}/{}",
                base.trim_end_matches('/'),
                location.trim_start_matches('/')
            );
            Ok(Arc::new(HttpSource::new(url, timeout)?))
        }
        None => Ok(Arc::new(FileSource::new(location, timeout))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_with_timeout_expires() {
        let result: Result<(), FetchError> = with_timeout(Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok::<_, FetchError>(())
        })
        .await;

        assert_eq!(result, Err(FetchError::Timeout(50)));
    }

    #[tokio::test]
    async fn test_with_timeout_passes_result() {
        let result = with_timeout(Duration::from_secs(1), async { Ok::<_, FetchError>(7) }).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test]
    async fn test_source_selection() {
        let file = source_for(DEFAULT_LOCATION, None, DEFAULT_TIMEOUT).unwrap();
        assert_eq!(file.location(), DEFAULT_LOCATION);

        let remote = source_for(
            "data/screener_results.json",
            Some("https://example.com/"),
            DEFAULT_TIMEOUT,
        )
        .unwrap();
        assert_eq!(
            remote.location(),
            "https://example.com/data/screener_results.json"
        );

        let absolute = source_for("http://localhost:9000/x.json", None, DEFAULT_TIMEOUT).unwrap();
        assert_eq!(absolute.location(), "http://localhost:9000/x.json");
    }

    #[test]
    fn test_status_message() {
        let err = FetchError::HttpStatus {
            status: 503,
            reason: "Service Unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");
    }
}
