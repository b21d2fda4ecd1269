// ============================================
// Fetch Orchestrator (多來源抓取)
// ============================================
//
// Groups queries by source and runs one future per source on the calling
// task. Queries inside a source run in order under a single whole-source
// timeout. A failing query is skipped and the source keeps what its other
// queries returned; only the timeout drops a whole source. Results are
// merged in fixed source order and deduplicated by url (first seen wins).

mod content;

pub use content::{filter_by_content_type, ContentStats};

use async_trait::async_trait;
use futures::future::join_all;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::{FetchConfig, FetchPolicy};
use crate::error::{AppError, Result};
use crate::models::{Resource, SearchQuery, Source};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Search timed out after {0:?}")]
    Timeout(Duration),

    #[error("Upstream returned status {0}")]
    Status(u16),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SourceError::InvalidResponse(err.to_string())
        } else if let Some(status) = err.status() {
            SourceError::Status(status.as_u16())
        } else {
            SourceError::Transport(err.to_string())
        }
    }
}

/// Search capability of one content source
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SourceClient: Send + Sync {
    fn source(&self) -> Source;

    /// Up to `max_results` resources for `query`. No internal retries.
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> std::result::Result<Vec<Resource>, SourceError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    Succeeded,
    /// Some queries failed, the rest delivered
    Partial(String),
    /// Every query failed
    Failed(String),
    TimedOut,
    NoClient,
}

impl SourceStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, SourceStatus::Failed(_) | SourceStatus::TimedOut)
    }

    /// Failure or partial failure
    pub fn is_degraded(&self) -> bool {
        self.is_failure() || matches!(self, SourceStatus::Partial(_))
    }
}

/// Per-source outcome of one fetch
#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub source: Source,
    pub queries: usize,
    pub resources: usize,
    pub status: SourceStatus,
}

#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    pub resources: Vec<Resource>,
    pub reports: Vec<SourceReport>,
    pub duplicates_removed: usize,
}

impl FetchOutcome {
    pub fn failed_sources(&self) -> Vec<Source> {
        self.reports
            .iter()
            .filter(|r| r.status.is_failure())
            .map(|r| r.source)
            .collect()
    }
}

pub struct FetchOrchestrator {
    clients: BTreeMap<Source, Arc<dyn SourceClient>>,
    config: FetchConfig,
}

impl FetchOrchestrator {
    pub fn new(config: FetchConfig) -> Self {
        Self {
            clients: BTreeMap::new(),
            config,
        }
    }

    pub fn with_client(mut self, client: Arc<dyn SourceClient>) -> Self {
        self.register(client);
        self
    }

    /// Register a client; replaces any client already serving that source
    pub fn register(&mut self, client: Arc<dyn SourceClient>) {
        let source = client.source();
        if self.clients.insert(source, client).is_some() {
            debug!(source = %source, "Replaced source client");
        }
    }

    pub fn sources(&self) -> Vec<Source> {
        self.clients.keys().copied().collect()
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    pub async fn fetch_all(&self, queries: &[SearchQuery]) -> Result<Vec<Resource>> {
        Ok(self.fetch_with_report(queries).await?.resources)
    }

    pub async fn fetch_with_report(&self, queries: &[SearchQuery]) -> Result<FetchOutcome> {
        let mut grouped: BTreeMap<Source, Vec<&str>> = BTreeMap::new();
        for query in queries {
            grouped
                .entry(query.source)
                .or_default()
                .push(query.query.as_str());
        }

        // join_all keeps input order, so merge order is source order
        // regardless of which source finishes first
        let batches = join_all(
            grouped
                .into_iter()
                .map(|(source, texts)| self.fetch_source(source, texts)),
        )
        .await;

        if self.config.policy == FetchPolicy::RequireAll {
            if let Some((report, _)) = batches.iter().find(|(r, _)| r.status.is_degraded()) {
                let reason = match &report.status {
                    SourceStatus::Failed(reason) | SourceStatus::Partial(reason) => reason.clone(),
                    _ => format!("timed out after {:?}", self.config.source_timeout()),
                };
                return Err(AppError::SourceUnavailable {
                    source_id: report.source,
                    reason,
                });
            }
        }

        let mut outcome = FetchOutcome::default();
        let mut seen: HashSet<String> = HashSet::new();

        for (report, resources) in batches {
            for resource in resources {
                if seen.insert(resource.url.clone()) {
                    outcome.resources.push(resource);
                } else {
                    outcome.duplicates_removed += 1;
                }
            }
            outcome.reports.push(report);
        }

        info!(
            total = outcome.resources.len(),
            duplicates = outcome.duplicates_removed,
            failed = outcome.failed_sources().len(),
            "Fetch completed"
        );

        Ok(outcome)
    }

    /// Search a single source, truncated to `limit`. Failures yield `[]`.
    pub async fn fetch_from(&self, source: Source, query: &str, limit: usize) -> Vec<Resource> {
        let Some(client) = self.clients.get(&source) else {
            warn!(source = %source, query, "No client registered for source");
            return Vec::new();
        };

        match timeout(self.config.source_timeout(), client.search(query, limit)).await {
            Ok(Ok(found)) => found
                .into_iter()
                .take(limit)
                .map(Resource::normalized)
                .collect(),
            Ok(Err(e)) => {
                warn!(source = %source, query, error = %e, "Source search failed");
                Vec::new()
            }
            Err(_) => {
                let e = SourceError::Timeout(self.config.source_timeout());
                warn!(source = %source, query, error = %e, "Source search failed");
                Vec::new()
            }
        }
    }

    async fn fetch_source(&self, source: Source, queries: Vec<&str>) -> (SourceReport, Vec<Resource>) {
        let mut report = SourceReport {
            source,
            queries: queries.len(),
            resources: 0,
            status: SourceStatus::Succeeded,
        };

        let Some(client) = self.clients.get(&source) else {
            warn!(source = %source, queries = queries.len(), "No client registered, skipping queries");
            report.status = SourceStatus::NoClient;
            return (report, Vec::new());
        };

        let max_results = self.config.max_results_per_query;
        let run = async {
            let mut collected = Vec::new();
            let mut errors = Vec::new();
            for query in &queries {
                match client.search(query, max_results).await {
                    Ok(found) => collected.extend(
                        found
                            .into_iter()
                            .take(max_results)
                            .map(Resource::normalized),
                    ),
                    Err(e) => {
                        warn!(source = %source, query, error = %e, "Source search failed, skipping query");
                        errors.push(format!("{}: {}", query, e));
                    }
                }
            }
            (collected, errors)
        };

        match timeout(self.config.source_timeout(), run).await {
            Ok((resources, errors)) => {
                report.resources = resources.len();
                report.status = if errors.is_empty() {
                    debug!(source = %source, count = resources.len(), "Source fetch succeeded");
                    SourceStatus::Succeeded
                } else if errors.len() == queries.len() {
                    SourceStatus::Failed(errors.join("; "))
                } else {
                    info!(
                        source = %source,
                        count = resources.len(),
                        failed_queries = errors.len(),
                        "Source fetch partially succeeded"
                    );
                    SourceStatus::Partial(errors.join("; "))
                };
                (report, resources)
            }
            Err(_) => {
                let e = SourceError::Timeout(self.config.source_timeout());
                warn!(source = %source, queries = queries.len(), error = %e, "Source fetch failed");
                report.status = SourceStatus::TimedOut;
                (report, Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentType;

    fn query(source: Source, text: &str) -> SearchQuery {
        SearchQuery::new(source, text, "beginner", ContentType::Tutorial)
    }

    fn resource(source: Source, url: &str) -> Resource {
        Resource::new(format!("Title {}", url), url, source)
    }

    fn mock_returning(source: Source, urls: &'static [&'static str]) -> MockSourceClient {
        let mut mock = MockSourceClient::new();
        mock.expect_source().return_const(source);
        mock.expect_search()
            .returning(move |_, _| Ok(urls.iter().map(|u| resource(source, u)).collect()));
        mock
    }

    fn config() -> FetchConfig {
        FetchConfig {
            source_timeout_ms: 200,
            max_results_per_query: 5,
            policy: FetchPolicy::BestEffort,
        }
    }

    #[tokio::test]
    async fn test_merges_in_source_order_and_dedups() {
        let orchestrator = FetchOrchestrator::new(config())
            .with_client(Arc::new(mock_returning(Source::Reddit, &["https://r/1", "https://shared"])))
            .with_client(Arc::new(mock_returning(Source::YouTube, &["https://y/1", "https://shared"])));

        let outcome = orchestrator
            .fetch_with_report(&[query(Source::Reddit, "rust"), query(Source::YouTube, "rust")])
            .await
            .unwrap();

        let urls: Vec<&str> = outcome.resources.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["https://y/1", "https://shared", "https://r/1"]);
        assert_eq!(outcome.resources[1].source, Source::YouTube);
        assert_eq!(outcome.duplicates_removed, 1);
    }

    #[tokio::test]
    async fn test_failing_source_is_isolated() {
        let mut failing = MockSourceClient::new();
        failing.expect_source().return_const(Source::Udemy);
        failing
            .expect_search()
            .returning(|_, _| Err(SourceError::Status(503)));

        let orchestrator = FetchOrchestrator::new(config())
            .with_client(Arc::new(failing))
            .with_client(Arc::new(mock_returning(Source::YouTube, &["https://y/1"])));

        let outcome = orchestrator
            .fetch_with_report(&[query(Source::YouTube, "go"), query(Source::Udemy, "go")])
            .await
            .unwrap();

        assert_eq!(outcome.resources.len(), 1);
        assert_eq!(outcome.failed_sources(), vec![Source::Udemy]);
    }

    #[tokio::test]
    async fn test_error_mid_batch_keeps_other_queries() {
        let mut flaky = MockSourceClient::new();
        flaky.expect_source().return_const(Source::YouTube);
        flaky
            .expect_search()
            .withf(|q, _| q.trim() == "first")
            .returning(|_, _| {
                Ok(["https://y/1", "https://y/2", "https://y/3", "https://y/4"]
                    .iter()
                    .map(|u| resource(Source::YouTube, u))
                    .collect())
            });
        flaky
            .expect_search()
            .withf(|q, _| q.trim() == "second")
            .returning(|_, _| Err(SourceError::Status(429)));

        let orchestrator = FetchOrchestrator::new(config()).with_client(Arc::new(flaky));
        let outcome = orchestrator
            .fetch_with_report(&[query(Source::YouTube, "first"), query(Source::YouTube, "second")])
            .await
            .unwrap();

        assert_eq!(outcome.resources.len(), 4);
        assert_eq!(outcome.reports[0].resources, 4);
        assert!(matches!(outcome.reports[0].status, SourceStatus::Partial(_)));
        assert!(outcome.failed_sources().is_empty());
    }

    #[tokio::test]
    async fn test_partial_source_fails_require_all() {
        let mut flaky = MockSourceClient::new();
        flaky.expect_source().return_const(Source::Reddit);
        flaky
            .expect_search()
            .withf(|q, _| q.trim() == "first")
            .returning(|_, _| Ok(vec![resource(Source::Reddit, "https://r/1")]));
        flaky
            .expect_search()
            .withf(|q, _| q.trim() == "second")
            .returning(|_, _| Err(SourceError::Transport("reset".into())));

        let mut cfg = config();
        cfg.policy = FetchPolicy::RequireAll;
        let orchestrator = FetchOrchestrator::new(cfg).with_client(Arc::new(flaky));
        let err = orchestrator
            .fetch_all(&[query(Source::Reddit, "first"), query(Source::Reddit, "second")])
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::SourceUnavailable { source_id: Source::Reddit, .. }));
    }

    #[tokio::test]
    async fn test_require_all_surfaces_first_failure() {
        let mut failing = MockSourceClient::new();
        failing.expect_source().return_const(Source::Reddit);
        failing
            .expect_search()
            .returning(|_, _| Err(SourceError::Unavailable("down".into())));

        let mut cfg = config();
        cfg.policy = FetchPolicy::RequireAll;
        let orchestrator = FetchOrchestrator::new(cfg)
            .with_client(Arc::new(failing))
            .with_client(Arc::new(mock_returning(Source::YouTube, &["https://y/1"])));

        let err = orchestrator
            .fetch_all(&[query(Source::YouTube, "c"), query(Source::Reddit, "c")])
            .await
            .unwrap_err();

        match err {
            AppError::SourceUnavailable { source_id, .. } => assert_eq!(source_id, Source::Reddit),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_queries_without_client_are_skipped() {
        let orchestrator = FetchOrchestrator::new(config())
            .with_client(Arc::new(mock_returning(Source::YouTube, &["https://y/1"])));

        let outcome = orchestrator
            .fetch_with_report(&[query(Source::YouTube, "x"), query(Source::Udemy, "x")])
            .await
            .unwrap();

        assert_eq!(outcome.resources.len(), 1);
        assert_eq!(outcome.reports[1].status, SourceStatus::NoClient);
        assert!(outcome.failed_sources().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_from_truncates_and_absorbs_errors() {
        let orchestrator = FetchOrchestrator::new(config()).with_client(Arc::new(mock_returning(
            Source::Udemy,
            &["https://u/1", "https://u/2", "https://u/3"],
        )));

        assert_eq!(orchestrator.fetch_from(Source::Udemy, "sql", 2).await.len(), 2);
        assert!(orchestrator.fetch_from(Source::Reddit, "sql", 2).await.is_empty());
    }
}
