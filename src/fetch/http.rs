//! HTTP document source

use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::Client;
use std::time::Duration;

use super::{with_timeout, DocumentSource, FetchError};
use crate::document::ScreenerDocument;

/// Fetches the document over HTTP with caching disabled
pub struct HttpSource {
    client: Client,
    url: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
            timeout,
        })
    }

    async fn fetch_inner(&self) -> Result<ScreenerDocument, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        ScreenerDocument::from_slice(&body).map_err(|e| FetchError::Parse(e.to_string()))
    }

    fn classify(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout.as_millis() as u64)
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    async fn fetch(&self) -> Result<ScreenerDocument, FetchError> {
        tracing::debug!(url = %self.url, "Fetching screener document");
        with_timeout(self.timeout, self.fetch_inner()).await
    }

    fn location(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DOC_PATH: &str = "/data/screener_results.json";

    fn source(server: &MockServer, timeout: Duration) -> HttpSource {
        HttpSource::new(format!("{}{}", server.uri(), DOC_PATH), timeout).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DOC_PATH))
            .and(header("cache-control", "no-cache"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "metadata": { "total_analyzed": 10 },
                "filtered_stocks": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let doc = source(&server, Duration::from_secs(5)).fetch().await.unwrap();
        assert_eq!(doc.as_value()["metadata"]["total_analyzed"], 10);
    }

    #[tokio::test]
    async fn test_not_found_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = source(&server, Duration::from_secs(5)).fetch().await.unwrap_err();
        assert_eq!(
            err,
            FetchError::HttpStatus {
                status: 404,
                reason: "Not Found".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_server_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = source(&server, Duration::from_secs(5)).fetch().await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");
    }

    #[tokio::test]
    async fn test_unparseable_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = source(&server, Duration::from_secs(5)).fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "metadata": {}, "filtered_stocks": [] }))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let err = source(&server, Duration::from_millis(100))
            .fetch()
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::Timeout(100));
    }

    #[tokio::test]
    async fn test_refused_connection() {
        let server = MockServer::start().await;
        let url = format!("{}{}", server.uri(), DOC_PATH);
        drop(server);

        let err = HttpSource::new(url, Duration::from_secs(5))
            .unwrap()
            .fetch()
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }
}
