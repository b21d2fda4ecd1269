use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{Resource, Source};

const TUTORIAL_KEYWORDS: &[&str] = &["tutorial", "how to", "guide", "step by step"];
const COURSE_KEYWORDS: &[&str] = &["course", "full", "complete", "series"];
const PROJECT_KEYWORDS: &[&str] = &["project", "build", "create", "make"];

/// Keep resources matching a content type.
///
/// `all` keeps everything and `video` keeps youtube resources. `tutorial`,
/// `course` and `project` match keywords in title + description. Unknown
/// types keep nothing.
pub fn filter_by_content_type(resources: &[Resource], content_type: &str) -> Vec<Resource> {
    let keywords = match content_type.trim().to_lowercase().as_str() {
        "all" => return resources.to_vec(),
        "video" => {
            return resources
                .iter()
                .filter(|r| r.source == Source::YouTube)
                .cloned()
                .collect()
        }
        "tutorial" => TUTORIAL_KEYWORDS,
        "course" => COURSE_KEYWORDS,
        "project" => PROJECT_KEYWORDS,
        _ => return Vec::new(),
    };

    resources
        .iter()
        .filter(|r| {
            let text = format!("{} {}", r.title, r.description).to_lowercase();
            keywords.iter().any(|k| text.contains(k))
        })
        .cloned()
        .collect()
}

/// Summary of a fetched resource set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentStats {
    pub total_resources: usize,
    pub by_source: BTreeMap<Source, usize>,
    pub average_rating: Option<f64>,
    pub total_duration_estimate: String,
}

impl ContentStats {
    pub fn from_resources(resources: &[Resource]) -> Self {
        let mut by_source: BTreeMap<Source, usize> =
            Source::ALL.iter().map(|s| (*s, 0)).collect();
        for resource in resources {
            *by_source.entry(resource.source).or_default() += 1;
        }

        let ratings: Vec<f64> = resources.iter().filter_map(|r| r.rating).collect();
        let average_rating = if ratings.is_empty() {
            None
        } else {
            Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
        };

        let total_seconds: u64 = resources
            .iter()
            .filter_map(|r| parse_clock_duration(&r.duration))
            .fold(0u64, u64::saturating_add);

        Self {
            total_resources: resources.len(),
            by_source,
            average_rating,
            total_duration_estimate: format!("{} hours", total_seconds / 3600),
        }
    }
}

/// Seconds in an `mm:ss` or `hh:mm:ss` duration; `None` if unparseable or
/// out of range
fn parse_clock_duration(duration: &str) -> Option<u64> {
    let parts: Vec<u64> = duration
        .trim()
        .split(':')
        .map(|p| p.trim().parse().ok())
        .collect::<Option<_>>()?;

    match parts.as_slice() {
        [m, s] => m.checked_mul(60)?.checked_add(*s),
        [h, m, s] => h
            .checked_mul(3600)?
            .checked_add(m.checked_mul(60)?)?
            .checked_add(*s),
        _ => None,
    }
}
