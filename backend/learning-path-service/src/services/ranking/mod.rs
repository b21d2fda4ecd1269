/// Ranking Module
///
/// Scores fetched resources against a learner profile, then filters and
/// diversifies the ranked list.
///
/// # Workflow
/// 1. Score each resource: weighted sum of rating, popularity, recency and
///    relevance factors, multiplied by a difficulty-match bonus
/// 2. Stable sort descending (ties keep input order)
/// 3. Drop low-rated resources (`filter_by_quality`)
/// 4. Cap resources per source (`diversify`)
pub mod factors;
mod filters;

pub use filters::{diversify, filter_by_quality};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

use crate::config::RankingConfig;
use crate::models::{LearnerProfile, RankedResource, Resource, ScoreFactors, Source};

/// 權重配置
#[derive(Debug, Clone, Copy)]
pub struct RankingWeights {
    pub rating: f64,
    pub popularity: f64,
    pub recency: f64,
    pub relevance: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            rating: 0.3,
            popularity: 0.2,
            recency: 0.2,
            relevance: 0.3,
        }
    }
}

/// Why a resource scored the way it did
#[derive(Debug, Clone, Serialize)]
pub struct RankingExplanation {
    pub total_score: f64,
    pub factors: ScoreFactors,
    pub rating: Option<f64>,
    pub view_count: Option<u64>,
    pub difficulty: Option<String>,
    pub source: Source,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RankingEngine {
    weights: RankingWeights,
    recency_half_life_days: f64,
}

impl Default for RankingEngine {
    fn default() -> Self {
        Self::new(RankingWeights::default(), RankingConfig::default().recency_half_life_days)
    }
}

impl RankingEngine {
    pub fn new(weights: RankingWeights, recency_half_life_days: f64) -> Self {
        Self {
            weights,
            recency_half_life_days,
        }
    }

    pub fn from_config(config: &RankingConfig) -> Self {
        Self::new(RankingWeights::default(), config.recency_half_life_days)
    }

    pub fn weights(&self) -> RankingWeights {
        self.weights
    }

    /// Rank against the current time
    pub fn rank(&self, resources: Vec<Resource>, profile: &LearnerProfile) -> Vec<RankedResource> {
        self.rank_at(resources, profile, Utc::now())
    }

    /// Rank with an explicit reference time for recency
    pub fn rank_at(
        &self,
        resources: Vec<Resource>,
        profile: &LearnerProfile,
        now: DateTime<Utc>,
    ) -> Vec<RankedResource> {
        let mut ranked: Vec<RankedResource> = resources
            .into_iter()
            .map(|resource| {
                let (score, factors) = self.score_resource(&resource, profile, now);
                RankedResource {
                    resource,
                    score,
                    factors,
                }
            })
            .collect();

        // sort_by is stable: equal scores keep fetch order
        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

        debug!(count = ranked.len(), "Ranked resources");
        ranked
    }

    /// Composite score plus its factor breakdown
    pub fn score_resource(
        &self,
        resource: &Resource,
        profile: &LearnerProfile,
        now: DateTime<Utc>,
    ) -> (f64, ScoreFactors) {
        let factors = ScoreFactors {
            rating: factors::rating_factor(resource),
            popularity: factors::popularity_factor(resource),
            recency: factors::recency_factor(resource, now, self.recency_half_life_days),
            relevance: factors::relevance_factor(
                resource,
                profile.topic(),
                profile.experience_level,
            ),
            difficulty_bonus: factors::difficulty_bonus(resource, profile.experience_level),
        };

        let w = &self.weights;
        let base = factors.rating * w.rating
            + factors.popularity * w.popularity
            + factors.recency * w.recency
            + factors.relevance * w.relevance;

        (base * factors.difficulty_bonus, factors)
    }

    pub fn explain(&self, resource: &Resource, profile: &LearnerProfile) -> RankingExplanation {
        self.explain_at(resource, profile, Utc::now())
    }

    pub fn explain_at(
        &self,
        resource: &Resource,
        profile: &LearnerProfile,
        now: DateTime<Utc>,
    ) -> RankingExplanation {
        let (score, factors) = self.score_resource(resource, profile, now);

        let mut reasons = Vec::new();
        if resource.rating.is_some_and(|r| r >= 4.0) {
            reasons.push("High user rating".to_string());
        }
        if resource.view_count.is_some_and(|v| v > 100_000) {
            reasons.push("Popular content".to_string());
        }
        if crate::utils::contains_ignore_case(&resource.title, &profile.topic().to_lowercase()) {
            reasons.push("Title matches your topic".to_string());
        }

        RankingExplanation {
            total_score: (score * 1000.0).round() / 1000.0,
            factors,
            rating: resource.rating,
            view_count: resource.view_count,
            difficulty: resource.difficulty.clone(),
            source: resource.source,
            reasons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExperienceLevel, LearningStyle};

    fn profile() -> LearnerProfile {
        LearnerProfile::new(
            "python",
            ExperienceLevel::Beginner,
            LearningStyle::HandsOn,
            "career change",
        )
    }

    fn plain(url: &str) -> Resource {
        Resource::new(format!("Item {}", url), url, Source::Udemy)
    }

    #[test]
    fn test_rank_sorts_descending() {
        let engine = RankingEngine::default();
        let resources = vec![
            plain("low").with_rating(2.0),
            plain("high").with_rating(5.0),
            plain("mid").with_rating(3.5),
        ];

        let ranked = engine.rank(resources, &profile());
        let urls: Vec<&str> = ranked.iter().map(|r| r.resource.url.as_str()).collect();
        assert_eq!(urls, vec!["high", "mid", "low"]);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let engine = RankingEngine::default();
        let resources: Vec<Resource> = ["a", "b", "c", "d"].iter().map(|u| plain(u)).collect();

        let ranked = engine.rank(resources, &profile());
        let urls: Vec<&str> = ranked.iter().map(|r| r.resource.url.as_str()).collect();
        assert_eq!(urls, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_score_composition() {
        let engine = RankingEngine::default();
        let now = Utc::now();
        let resource = Resource::new("Python for Beginners", "https://y/1", Source::YouTube)
            .with_rating(5.0)
            .with_difficulty("beginner");

        let (score, factors) = engine.score_resource(&resource, &profile(), now);
        // rating 1.0, popularity 0, recency 0.5, relevance 0.5 + 0.1
        let expected = (0.3 * 1.0 + 0.2 * 0.5 + 0.3 * 0.6) * 1.2;
        assert!((score - expected).abs() < 1e-9);
        assert_eq!(factors.difficulty_bonus, 1.2);
    }

    #[test]
    fn test_empty_input() {
        assert!(RankingEngine::default().rank(Vec::new(), &profile()).is_empty());
    }

    #[test]
    fn test_explain() {
        let engine = RankingEngine::default();
        let resource = Resource::new("Python Crash Course", "https://y/2", Source::YouTube)
            .with_rating(4.6)
            .with_view_count(2_000_000);

        let explanation = engine.explain(&resource, &profile());
        assert_eq!(
            explanation.reasons,
            vec!["High user rating", "Popular content", "Title matches your topic"]
        );
        assert_eq!(explanation.total_score, (explanation.total_score * 1000.0).round() / 1000.0);
    }
}
