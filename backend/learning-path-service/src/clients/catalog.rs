use async_trait::async_trait;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{AppError, Result};
use crate::models::{Resource, Source};
use crate::services::fetch::{SourceClient, SourceError};

/// Load a JSON array of resources
pub fn load_catalog(path: &Path) -> Result<Vec<Resource>> {
    let raw = fs::read_to_string(path).map_err(|e| {
        AppError::Configuration(format!("cannot read catalog {}: {}", path.display(), e))
    })?;
    let resources: Vec<Resource> = serde_json::from_str(&raw).map_err(|e| {
        AppError::Configuration(format!("invalid catalog {}: {}", path.display(), e))
    })?;

    info!(path = %path.display(), count = resources.len(), "Loaded resource catalog");
    Ok(resources)
}

/// Offline client answering searches from a fixed resource list
pub struct CatalogSourceClient {
    source: Source,
    resources: Vec<Resource>,
}

impl CatalogSourceClient {
    /// Keeps only the catalog entries belonging to `source`
    pub fn new(source: Source, catalog: &[Resource]) -> Self {
        Self {
            source,
            resources: catalog
                .iter()
                .filter(|r| r.source == source)
                .cloned()
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    fn matches(resource: &Resource, words: &[String]) -> bool {
        let title = resource.title.to_lowercase();
        let description = resource.description.to_lowercase();
        let tags: Vec<String> = resource.tags.iter().map(|t| t.to_lowercase()).collect();

        words.iter().any(|w| {
            title.contains(w.as_str())
                || description.contains(w.as_str())
                || tags.iter().any(|t| t.contains(w.as_str()))
        })
    }
}

#[async_trait]
impl SourceClient for CatalogSourceClient {
    fn source(&self) -> Source {
        self.source
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> std::result::Result<Vec<Resource>, SourceError> {
        // Short words ("a", "to", "in") match nearly everything
        let words: Vec<String> = query
            .split_whitespace()
            .filter(|w| w.chars().count() >= 3)
            .map(str::to_lowercase)
            .collect();

        Ok(self
            .resources
            .iter()
            .filter(|r| Self::matches(r, &words))
            .take(max_results)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Resource> {
        vec![
            Resource::new("React Crash Course", "https://y/1", Source::YouTube),
            Resource::new("Vue in 100 seconds", "https://y/2", Source::YouTube)
                .with_tags(["frontend"]),
            Resource::new("React - The Complete Guide", "https://u/1", Source::Udemy),
            Resource::new("Intro", "https://y/3", Source::YouTube)
                .with_description("learn REACT hooks"),
        ]
    }

    #[tokio::test]
    async fn test_search_matches_words_within_source() {
        let client = CatalogSourceClient::new(Source::YouTube, &catalog());
        assert_eq!(client.len(), 3);

        let found = client.search("react beginner tutorial", 10).await.unwrap();
        let urls: Vec<&str> = found.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["https://y/1", "https://y/3"]);

        let limited = client.search("react", 1).await.unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn test_short_words_are_ignored() {
        let client = CatalogSourceClient::new(Source::YouTube, &catalog());

        let short = tokio_test::block_on(client.search("in to a", 10));
        assert!(tokio_test::assert_ok!(short).is_empty());

        let tagged = tokio_test::block_on(client.search("FRONTEND", 10));
        assert_eq!(tokio_test::assert_ok!(tagged).len(), 1);
    }

    #[test]
    fn test_load_catalog_errors_are_configuration() {
        let err = load_catalog(Path::new("/definitely/missing/catalog.json")).unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }
}
