use serde::Deserialize;
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::models::Source;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key}={value} is invalid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub fetch: FetchConfig,
    pub ranking: RankingConfig,
    pub sources: SourcesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub service_name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service_name: "learning-path-service".to_string(),
        }
    }
}

/// What the orchestrator does when a source fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchPolicy {
    /// Failed sources contribute nothing; the batch continues
    #[default]
    BestEffort,
    /// Any failed source fails the whole fetch
    RequireAll,
}

impl FromStr for FetchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "best_effort" => Ok(FetchPolicy::BestEffort),
            "require_all" => Ok(FetchPolicy::RequireAll),
            other => Err(format!("expected best_effort or require_all, got '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Budget for all queries of one source
    pub source_timeout_ms: u64,
    pub max_results_per_query: usize,
    pub policy: FetchPolicy,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            source_timeout_ms: 5_000,
            max_results_per_query: 5,
            policy: FetchPolicy::BestEffort,
        }
    }
}

impl FetchConfig {
    pub fn source_timeout(&self) -> Duration {
        Duration::from_millis(self.source_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankingConfig {
    pub min_rating: f64,
    pub max_per_source: usize,
    pub recency_half_life_days: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            min_rating: 3.0,
            max_per_source: 5,
            recency_half_life_days: 365.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcesConfig {
    /// JSON resource catalog served by the offline clients
    pub catalog_path: Option<PathBuf>,
    pub youtube_search_url: Option<String>,
    pub udemy_search_url: Option<String>,
    pub reddit_search_url: Option<String>,
}

impl SourcesConfig {
    pub fn search_url(&self, source: Source) -> Option<&str> {
        match source {
            Source::YouTube => self.youtube_search_url.as_deref(),
            Source::Udemy => self.udemy_search_url.as_deref(),
            Source::Reddit => self.reddit_search_url.as_deref(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; missing keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let config = Config {
            service: ServiceConfig {
                service_name: lookup("SERVICE_NAME")
                    .unwrap_or(defaults.service.service_name),
            },
            fetch: FetchConfig {
                source_timeout_ms: parse_or(
                    &lookup,
                    "SOURCE_TIMEOUT_MS",
                    defaults.fetch.source_timeout_ms,
                )?,
                max_results_per_query: parse_or(
                    &lookup,
                    "MAX_RESULTS_PER_QUERY",
                    defaults.fetch.max_results_per_query,
                )?,
                policy: parse_or(&lookup, "FETCH_POLICY", defaults.fetch.policy)?,
            },
            ranking: RankingConfig {
                min_rating: parse_or(&lookup, "MIN_RATING", defaults.ranking.min_rating)?,
                max_per_source: parse_or(
                    &lookup,
                    "MAX_PER_SOURCE",
                    defaults.ranking.max_per_source,
                )?,
                recency_half_life_days: parse_or(
                    &lookup,
                    "RECENCY_HALF_LIFE_DAYS",
                    defaults.ranking.recency_half_life_days,
                )?,
            },
            sources: SourcesConfig {
                catalog_path: lookup("CATALOG_PATH").map(PathBuf::from),
                youtube_search_url: lookup("YOUTUBE_SEARCH_URL"),
                udemy_search_url: lookup("UDEMY_SEARCH_URL"),
                reddit_search_url: lookup("REDDIT_SEARCH_URL"),
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.source_timeout_ms == 0 {
            return Err(invalid("SOURCE_TIMEOUT_MS", "0", "must be > 0"));
        }
        if self.fetch.max_results_per_query == 0 {
            return Err(invalid("MAX_RESULTS_PER_QUERY", "0", "must be > 0"));
        }
        if !(0.0..=5.0).contains(&self.ranking.min_rating) {
            return Err(invalid(
                "MIN_RATING",
                &self.ranking.min_rating.to_string(),
                "must be in [0, 5]",
            ));
        }
        if !(self.ranking.recency_half_life_days > 0.0) {
            return Err(invalid(
                "RECENCY_HALF_LIFE_DAYS",
                &self.ranking.recency_half_life_days.to_string(),
                "must be > 0",
            ));
        }
        Ok(())
    }
}

fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(key, &raw, &e.to_string())),
        None => Ok(default),
    }
}

fn invalid(key: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
