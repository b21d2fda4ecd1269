// ============================================
// Path Enhancer (生成式增強)
// ============================================
//
// Optional generative collaborator. It may replace the deterministic query
// list or the assembled path wholesale. Output is accepted only if it
// passes validation; otherwise the deterministic result is kept. There is
// no partial merge.

use async_trait::async_trait;
use std::collections::HashSet;
use thiserror::Error;

use crate::models::{LearnerProfile, LearningPath, Resource, SearchQuery, Source};

#[derive(Debug, Error)]
pub enum EnhancerError {
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Empty result")]
    Empty,

    #[error("Invalid output: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, EnhancerError>;

#[async_trait]
pub trait PathEnhancer: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &str;

    async fn suggest_queries(
        &self,
        profile: &LearnerProfile,
        sources: &[Source],
    ) -> Result<Vec<SearchQuery>>;

    /// Build a path using only `resources`
    async fn synthesize_path(
        &self,
        profile: &LearnerProfile,
        resources: &[Resource],
    ) -> Result<LearningPath>;
}

/// Suggested queries must be non-empty, have text and target `sources`
pub fn validate_queries(queries: &[SearchQuery], sources: &[Source]) -> Result<()> {
    if queries.is_empty() {
        return Err(EnhancerError::Empty);
    }

    for query in queries {
        if query.query.trim().is_empty() {
            return Err(EnhancerError::Invalid("blank query text".to_string()));
        }
        if !sources.contains(&query.source) {
            return Err(EnhancerError::Invalid(format!(
                "query targets unavailable source {}",
                query.source
            )));
        }
    }

    Ok(())
}

/// Structural checks on a synthesized path.
///
/// Every resource must come from `fetched` (matched by url) and appear at
/// most once. Steps are numbered 1..n, step 1 has no prerequisites and every
/// step has at least one objective.
pub fn validate_path(path: &LearningPath, fetched: &[Resource]) -> Result<()> {
    if path.steps.is_empty() {
        return Err(EnhancerError::Empty);
    }

    let known: HashSet<&str> = fetched.iter().map(|r| r.url.as_str()).collect();
    if let Some(unknown) = path.resources().find(|r| !known.contains(r.url.as_str())) {
        return Err(EnhancerError::Invalid(format!(
            "resource {} was not fetched",
            unknown.url
        )));
    }

    let mut used: HashSet<&str> = HashSet::new();
    if let Some(repeated) = path.resources().find(|r| !used.insert(r.url.as_str())) {
        return Err(EnhancerError::Invalid(format!(
            "resource {} appears more than once",
            repeated.url
        )));
    }

    for (i, step) in path.steps.iter().enumerate() {
        if step.step_number as usize != i + 1 {
            return Err(EnhancerError::Invalid(format!(
                "step {} is numbered {}",
                i + 1,
                step.step_number
            )));
        }
        if step.learning_objectives.is_empty() {
            return Err(EnhancerError::Invalid(format!(
                "step {} has no objectives",
                step.step_number
            )));
        }
    }

    if !path.steps[0].prerequisites.is_empty() {
        return Err(EnhancerError::Invalid(
            "first step has prerequisites".to_string(),
        ));
    }

    Ok(())
}
