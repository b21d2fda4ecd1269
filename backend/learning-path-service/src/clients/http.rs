use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::models::{Resource, Source};
use crate::services::fetch::{SourceClient, SourceError};

/// One hit from a search endpoint; the source comes from the client
#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
    #[serde(default)]
    description: String,
    url: String,
    #[serde(default)]
    duration: String,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    view_count: Option<u64>,
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    tags: Vec<String>,
}

impl SearchHit {
    fn into_resource(self, source: Source) -> Resource {
        Resource {
            title: self.title,
            description: self.description,
            url: self.url,
            source,
            duration: self.duration,
            difficulty: self.difficulty,
            rating: self.rating,
            view_count: self.view_count,
            published_at: self.published_at,
            tags: self.tags,
        }
    }
}

/// JSON search endpoint: `GET {base_url}?q=..&limit=..` returning an array
pub struct HttpSourceClient {
    source: Source,
    client: HttpClient,
    base_url: String,
}

impl HttpSourceClient {
    pub fn new(
        source: Source,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Unavailable(format!("HTTP client: {}", e)))?;

        Ok(Self {
            source,
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl SourceClient for HttpSourceClient {
    fn source(&self) -> Source {
        self.source
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Resource>, SourceError> {
        let limit = max_results.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", query), ("limit", limit.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let hits: Vec<SearchHit> = response.json().await?;
        debug!(source = %self.source, query, hits = hits.len(), "Search endpoint responded");

        Ok(hits
            .into_iter()
            .take(max_results)
            .map(|hit| hit.into_resource(self.source))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single canned HTTP response, returning the endpoint url
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{}/search", addr)
    }

    #[tokio::test]
    async fn test_search_parses_hits_and_tags_source() {
        let url = serve_once(
            "HTTP/1.1 200 OK",
            r#"[{"title": "Go by Example", "url": "https://r/1", "rating": 4.2},
                {"title": "Effective Go", "url": "https://r/2"}]"#,
        )
        .await;

        let client = HttpSourceClient::new(Source::Reddit, url, Duration::from_secs(2)).unwrap();
        let found = client.search("golang", 1).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].source, Source::Reddit);
        assert_eq!(found[0].rating, Some(4.2));
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let url = serve_once("HTTP/1.1 503 Service Unavailable", "[]").await;

        let client = HttpSourceClient::new(Source::Udemy, url, Duration::from_secs(2)).unwrap();
        let err = client.search("golang", 5).await.unwrap_err();

        assert!(matches!(err, SourceError::Status(503)));
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let url = serve_once("HTTP/1.1 200 OK", r#"{"not": "an array"}"#).await;

        let client = HttpSourceClient::new(Source::YouTube, url, Duration::from_secs(2)).unwrap();
        let err = client.search("golang", 5).await.unwrap_err();

        assert!(matches!(err, SourceError::InvalidResponse(_)));
    }
}
