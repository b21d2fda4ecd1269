use chrono::{DateTime, Utc};

use crate::models::{ExperienceLevel, Resource};
use crate::utils::{contains_ignore_case, exponential_decay};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// rating / 5, absent rating scores 0
pub fn rating_factor(resource: &Resource) -> f64 {
    resource
        .rating
        .map(|r| (r / 5.0).clamp(0.0, 1.0))
        .unwrap_or(0.0)
}

/// log10(views + 1) / 6, one million views saturates
pub fn popularity_factor(resource: &Resource) -> f64 {
    resource
        .view_count
        .map(|views| ((views as f64 + 1.0).log10() / 6.0).clamp(0.0, 1.0))
        .unwrap_or(0.0)
}

/// Exponential decay of age; unknown publish date scores 0.5
pub fn recency_factor(resource: &Resource, now: DateTime<Utc>, half_life_days: f64) -> f64 {
    match resource.published_at {
        Some(published) => {
            let age_days = (now - published).num_seconds() as f64 / SECONDS_PER_DAY;
            exponential_decay(age_days, half_life_days)
        }
        None => 0.5,
    }
}

fn level_keywords(level: ExperienceLevel) -> &'static [&'static str] {
    match level {
        ExperienceLevel::Beginner => &["beginner", "intro", "basic", "fundamentals", "getting started"],
        ExperienceLevel::Intermediate => &["intermediate", "practical", "hands-on", "project"],
        ExperienceLevel::Advanced => &["advanced", "expert", "deep", "complex", "professional"],
    }
}

/// Topic and level keyword matching, capped at 1.0
pub fn relevance_factor(resource: &Resource, topic: &str, level: ExperienceLevel) -> f64 {
    let topic = topic.trim().to_lowercase();
    let mut relevance = 0.0;

    if contains_ignore_case(&resource.title, &topic) {
        relevance += 0.5;
    }
    if contains_ignore_case(&resource.description, &topic) {
        relevance += 0.3;
    }
    if resource.tags.iter().any(|t| contains_ignore_case(t, &topic)) {
        relevance += 0.1;
    }

    let text = format!("{} {}", resource.title, resource.description).to_lowercase();
    if level_keywords(level).iter().any(|k| text.contains(k)) {
        relevance += 0.1;
    }

    f64::min(relevance, 1.0)
}

fn difficulty_preference(learner: ExperienceLevel, content: ExperienceLevel) -> f64 {
    use ExperienceLevel::*;
    match (learner, content) {
        (Beginner, Beginner) => 1.0,
        (Beginner, Intermediate) => 0.3,
        (Beginner, Advanced) => 0.1,
        (Intermediate, Beginner) => 0.5,
        (Intermediate, Intermediate) => 1.0,
        (Intermediate, Advanced) => 0.7,
        (Advanced, Beginner) => 0.2,
        (Advanced, Intermediate) => 0.6,
        (Advanced, Advanced) => 1.0,
    }
}

/// Multiplier in [1.0, 1.2]; missing or unrecognised difficulty is neutral
pub fn difficulty_bonus(resource: &Resource, level: ExperienceLevel) -> f64 {
    resource
        .difficulty_level()
        .map(|content| 1.0 + 0.2 * difficulty_preference(level, content))
        .unwrap_or(1.0)
}
