use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ExperienceLevel;

/// Content provider. Declaration order is the fixed iteration order used
/// for fetching and deduplication.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Source {
    #[serde(rename = "youtube")]
    YouTube,
    #[serde(rename = "udemy")]
    Udemy,
    #[serde(rename = "reddit")]
    Reddit,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::YouTube, Source::Udemy, Source::Reddit];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::YouTube => "youtube",
            Source::Udemy => "udemy",
            Source::Reddit => "reddit",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown source: {0}")]
pub struct UnknownSource(pub String);

impl FromStr for Source {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "youtube" => Ok(Source::YouTube),
            "udemy" => Ok(Source::Udemy),
            "reddit" => Ok(Source::Reddit),
            other => Err(UnknownSource(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Tutorial,
    Course,
    Project,
    Discussion,
    Recommendations,
    Advice,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Tutorial => "tutorial",
            ContentType::Course => "course",
            ContentType::Project => "project",
            ContentType::Discussion => "discussion",
            ContentType::Recommendations => "recommendations",
            ContentType::Advice => "advice",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchQuery {
    pub source: Source,
    pub query: String,
    pub difficulty: String,
    pub content_type: ContentType,
}

impl SearchQuery {
    pub fn new(
        source: Source,
        query: impl Into<String>,
        difficulty: impl Into<String>,
        content_type: ContentType,
    ) -> Self {
        Self {
            source,
            query: query.into(),
            difficulty: difficulty.into(),
            content_type,
        }
    }
}

/// One retrievable content item. `url` is the natural key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
    pub source: Source,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub view_count: Option<u64>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Resource {
    pub fn new(title: impl Into<String>, url: impl Into<String>, source: Source) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            url: url.into(),
            source,
            duration: String::new(),
            difficulty: None,
            rating: None,
            view_count: None,
            published_at: None,
            tags: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = duration.into();
        self
    }

    pub fn with_difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = Some(difficulty.into());
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_view_count(mut self, views: u64) -> Self {
        self.view_count = Some(views);
        self
    }

    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Boundary normalization: ratings are clamped to [0, 5] and
    /// non-finite ratings are treated as absent.
    pub fn normalized(mut self) -> Self {
        self.rating = self
            .rating
            .filter(|r| r.is_finite())
            .map(|r| r.clamp(0.0, 5.0));
        self
    }

    pub fn difficulty_level(&self) -> Option<ExperienceLevel> {
        self.difficulty.as_deref().and_then(ExperienceLevel::from_tag)
    }
}

/// Per-factor breakdown of a composite score
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ScoreFactors {
    pub rating: f64,
    pub popularity: f64,
    pub recency: f64,
    pub relevance: f64,
    pub difficulty_bonus: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedResource {
    pub resource: Resource,
    pub score: f64,
    pub factors: ScoreFactors,
}

impl From<RankedResource> for Resource {
    fn from(ranked: RankedResource) -> Self {
        ranked.resource
    }
}

/// Access to the underlying resource for stages that run on both raw and
/// ranked lists.
pub trait AsResource {
    fn resource(&self) -> &Resource;
}

impl AsResource for Resource {
    fn resource(&self) -> &Resource {
        self
    }
}

impl AsResource for RankedResource {
    fn resource(&self) -> &Resource {
        &self.resource
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_parsing() {
        assert_eq!("YouTube".parse::<Source>().unwrap(), Source::YouTube);
        assert_eq!(" reddit ".parse::<Source>().unwrap(), Source::Reddit);
        assert!("coursera".parse::<Source>().is_err());
    }

    #[test]
    fn test_source_order_is_fixed() {
        let mut shuffled = vec![Source::Reddit, Source::YouTube, Source::Udemy];
        shuffled.sort();
        assert_eq!(shuffled, Source::ALL.to_vec());
    }

    #[test]
    fn test_rating_normalization() {
        let r = Resource::new("t", "https://x/1", Source::Udemy).with_rating(7.5).normalized();
        assert_eq!(r.rating, Some(5.0));

        let r = Resource::new("t", "https://x/2", Source::Udemy).with_rating(f64::NAN).normalized();
        assert_eq!(r.rating, None);

        let r = Resource::new("t", "https://x/3", Source::Udemy).with_rating(0.0).normalized();
        assert_eq!(r.rating, Some(0.0));
    }

    #[test]
    fn test_resource_deserializes_with_defaults() {
        let r: Resource = serde_json::from_str(
            r#"{"title": "Intro", "url": "https://x/1", "source": "youtube"}"#,
        )
        .unwrap();
        assert_eq!(r.source, Source::YouTube);
        assert!(r.tags.is_empty());
        assert!(r.published_at.is_none());
    }
}
