// ============================================
// Path Generator (生成管線)
// ============================================
//
// Request-level wiring of the generation stages:
//
//   profile -> queries -> fetch -> rank -> quality filter -> diversify -> assemble
//
// Every collaborator is injected. The enhancer is optional and only ever
// replaces a whole stage output.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::RankingConfig;
use crate::error::{AppError, Result};
use crate::models::{
    GeneratePathRequest, GeneratePathResponse, LearnerProfile, LearningPath, Resource,
    SearchQuery, Source,
};
use crate::services::assembly::PathAssembler;
use crate::services::enhancer::{validate_path, validate_queries, PathEnhancer};
use crate::services::fetch::{FetchOrchestrator, SourceReport};
use crate::services::query::QueryGenerator;
use crate::services::ranking::{diversify, filter_by_quality, RankingEngine};
use crate::services::store::PathStore;

/// What happened during one generation
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationReport {
    pub query_count: usize,
    pub enhanced_queries: bool,
    pub sources: Vec<SourceReport>,
    pub duplicates_removed: usize,
    pub fetched: usize,
    pub after_quality_filter: usize,
    pub after_diversify: usize,
    pub enhanced_path: bool,
    /// Fewer resources than steps; trailing steps are empty
    pub assembly_degraded: bool,
}

#[derive(Debug, Clone)]
pub struct GeneratedPath {
    pub path: LearningPath,
    pub report: GenerationReport,
}

impl GeneratedPath {
    pub fn into_response(self) -> GeneratePathResponse {
        success_response(self.path, &self.report, None)
    }
}

#[derive(Debug, Clone)]
pub struct StoredPath {
    pub path_id: String,
    pub path: LearningPath,
    pub report: GenerationReport,
}

impl StoredPath {
    pub fn into_response(self) -> GeneratePathResponse {
        success_response(self.path, &self.report, Some(self.path_id))
    }
}

fn success_response(
    path: LearningPath,
    report: &GenerationReport,
    path_id: Option<String>,
) -> GeneratePathResponse {
    let message = if report.assembly_degraded {
        format!(
            "Learning path generated with only {} resources",
            report.after_diversify
        )
    } else {
        "Learning path generated successfully".to_string()
    };

    GeneratePathResponse {
        success: true,
        learning_path: Some(path),
        message,
        path_id,
    }
}

pub struct PathGenerator {
    queries: QueryGenerator,
    orchestrator: FetchOrchestrator,
    ranking: RankingEngine,
    assembler: PathAssembler,
    ranking_config: RankingConfig,
    enhancer: Option<Arc<dyn PathEnhancer>>,
}

impl PathGenerator {
    pub fn new(orchestrator: FetchOrchestrator, ranking_config: RankingConfig) -> Self {
        Self {
            queries: QueryGenerator::new(),
            orchestrator,
            ranking: RankingEngine::from_config(&ranking_config),
            assembler: PathAssembler::new(),
            ranking_config,
            enhancer: None,
        }
    }

    pub fn with_enhancer(mut self, enhancer: Arc<dyn PathEnhancer>) -> Self {
        self.enhancer = Some(enhancer);
        self
    }

    pub async fn generate(&self, request: &GeneratePathRequest) -> Result<GeneratedPath> {
        self.generate_at(request, Utc::now()).await
    }

    /// Generate with `now` as both the recency reference and creation time
    pub async fn generate_at(
        &self,
        request: &GeneratePathRequest,
        now: DateTime<Utc>,
    ) -> Result<GeneratedPath> {
        let profile = request.effective_profile();
        if !profile.has_topic() {
            return Err(AppError::InvalidProfile("topic must not be empty".to_string()));
        }

        info!(
            topic = profile.topic(),
            level = profile.experience_level.as_str(),
            style = profile.learning_style.as_str(),
            "Generating learning path"
        );

        let mut report = GenerationReport::default();

        let target_sources = if request.platform_preferences.is_empty() {
            Source::ALL.to_vec()
        } else {
            request.platform_preferences.clone()
        };

        let (queries, enhanced) = self.build_queries(&profile, &target_sources).await;
        let queries = restrict_to_preferences(queries, &request.platform_preferences);
        if queries.is_empty() {
            return Err(AppError::InvalidProfile(
                "no search queries could be built for this profile".to_string(),
            ));
        }
        report.query_count = queries.len();
        report.enhanced_queries = enhanced;

        let outcome = self.orchestrator.fetch_with_report(&queries).await?;
        report.sources = outcome.reports;
        report.duplicates_removed = outcome.duplicates_removed;
        report.fetched = outcome.resources.len();

        if outcome.resources.is_empty() {
            warn!(topic = profile.topic(), "No resources found");
            return Err(AppError::NoResourcesFound {
                topic: profile.topic().to_string(),
            });
        }
        let fetched = outcome.resources;

        let ranked = self.ranking.rank_at(fetched.clone(), &profile, now);
        let filtered = filter_by_quality(ranked, self.ranking_config.min_rating);
        report.after_quality_filter = filtered.len();

        let selected: Vec<Resource> = diversify(filtered, self.ranking_config.max_per_source)
            .into_iter()
            .map(Resource::from)
            .collect();
        report.after_diversify = selected.len();
        report.assembly_degraded = PathAssembler::is_degraded(selected.len());

        let (path, enhanced) = self.build_path(&profile, selected, &fetched, now).await;
        report.enhanced_path = enhanced;

        info!(
            title = %path.title,
            fetched = report.fetched,
            selected = report.after_diversify,
            degraded = report.assembly_degraded,
            "Learning path generated"
        );

        Ok(GeneratedPath { path, report })
    }

    pub async fn generate_and_store(
        &self,
        request: &GeneratePathRequest,
        store: &dyn PathStore,
    ) -> Result<StoredPath> {
        let GeneratedPath { path, report } = self.generate(request).await?;
        let path_id = store.save(&path).await?;

        Ok(StoredPath {
            path_id,
            path,
            report,
        })
    }

    async fn build_queries(
        &self,
        profile: &LearnerProfile,
        sources: &[Source],
    ) -> (Vec<SearchQuery>, bool) {
        if let Some(enhancer) = &self.enhancer {
            match enhancer.suggest_queries(profile, sources).await {
                Ok(queries) => match validate_queries(&queries, sources) {
                    Ok(()) => return (queries, true),
                    Err(e) => {
                        warn!(enhancer = enhancer.name(), error = %e, "Rejected suggested queries")
                    }
                },
                Err(e) => warn!(enhancer = enhancer.name(), error = %e, "Query suggestion failed"),
            }
        }

        (self.queries.generate_queries(profile), false)
    }

    async fn build_path(
        &self,
        profile: &LearnerProfile,
        selected: Vec<Resource>,
        fetched: &[Resource],
        now: DateTime<Utc>,
    ) -> (LearningPath, bool) {
        if let Some(enhancer) = &self.enhancer {
            match enhancer.synthesize_path(profile, &selected).await {
                Ok(path) => match validate_path(&path, fetched) {
                    Ok(()) => return (path, true),
                    Err(e) => {
                        warn!(enhancer = enhancer.name(), error = %e, "Rejected synthesized path")
                    }
                },
                Err(e) => warn!(enhancer = enhancer.name(), error = %e, "Path synthesis failed"),
            }
        }

        (self.assembler.build_at(profile, selected, now), false)
    }
}

/// Keep queries for preferred platforms; all queries if that leaves none
fn restrict_to_preferences(queries: Vec<SearchQuery>, preferences: &[Source]) -> Vec<SearchQuery> {
    if preferences.is_empty() {
        return queries;
    }

    let (preferred, others): (Vec<_>, Vec<_>) = queries
        .into_iter()
        .partition(|q| preferences.contains(&q.source));

    if preferred.is_empty() {
        warn!(?preferences, "No queries for preferred platforms, using all sources");
        others
    } else {
        preferred
    }
}
