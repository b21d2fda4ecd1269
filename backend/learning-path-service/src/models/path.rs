use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ExperienceLevel, Resource};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathStep {
    /// 1-based, contiguous within a path
    pub step_number: u32,
    pub title: String,
    pub description: String,
    pub resources: Vec<Resource>,
    pub estimated_duration: String,
    pub prerequisites: Vec<String>,
    pub learning_objectives: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LearningPath {
    pub title: String,
    pub description: String,
    pub total_duration: String,
    pub difficulty: ExperienceLevel,
    pub steps: Vec<PathStep>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl LearningPath {
    pub fn resource_count(&self) -> usize {
        self.steps.iter().map(|s| s.resources.len()).sum()
    }

    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.steps.iter().flat_map(|s| s.resources.iter())
    }

    /// First step not yet completed, `None` once every step is done
    pub fn next_recommended_step(&self, completed: &[u32]) -> Option<u32> {
        self.steps
            .iter()
            .map(|s| s.step_number)
            .find(|n| !completed.contains(n))
    }
}

/// Response envelope returned to the upstream caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratePathResponse {
    pub success: bool,
    pub learning_path: Option<LearningPath>,
    pub message: String,
    pub path_id: Option<String>,
}
