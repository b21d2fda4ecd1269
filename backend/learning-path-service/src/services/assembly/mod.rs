// ============================================
// Path Assembler (路徑組裝)
// ============================================
//
// Distributes ranked resources into five fixed steps and derives the
// per-step and path-level metadata. Pure and infallible.

mod templates;

pub use templates::{step_duration, total_duration, StepArchetype};

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::models::{ExperienceLevel, LearnerProfile, LearningPath, PathStep, Resource};
use crate::utils::title_case;

pub const STEP_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, Default)]
pub struct PathAssembler;

impl PathAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Fewer resources than steps leaves trailing steps empty
    pub fn is_degraded(resource_count: usize) -> bool {
        resource_count < STEP_COUNT
    }

    /// Resources per step, in step order.
    ///
    /// Steps 1-4 take `n / 5` each and step 5 takes the rest. Below five
    /// resources every step takes at most one.
    pub fn split_counts(resource_count: usize) -> [usize; STEP_COUNT] {
        let per_step = (resource_count / STEP_COUNT).max(1);
        let mut counts = [0; STEP_COUNT];
        let mut remaining = resource_count;

        for (i, count) in counts.iter_mut().enumerate() {
            let take = if i == STEP_COUNT - 1 {
                remaining
            } else {
                per_step.min(remaining)
            };
            *count = take;
            remaining -= take;
        }

        counts
    }

    pub fn build<R>(&self, profile: &LearnerProfile, ranked: Vec<R>) -> LearningPath
    where
        R: Into<Resource>,
    {
        self.build_at(profile, ranked, Utc::now())
    }

    pub fn build_at<R>(
        &self,
        profile: &LearnerProfile,
        ranked: Vec<R>,
        created_at: DateTime<Utc>,
    ) -> LearningPath
    where
        R: Into<Resource>,
    {
        let resource_count = ranked.len();
        if Self::is_degraded(resource_count) {
            warn!(
                topic = profile.topic(),
                resources = resource_count,
                "Assembling degraded path, trailing steps will be empty"
            );
        }

        let level = profile.experience_level;
        let topic = profile.topic();
        let mut resources = ranked.into_iter().map(|r| -> Resource { r.into() });

        let steps: Vec<PathStep> = StepArchetype::ORDER
            .iter()
            .zip(Self::split_counts(resource_count))
            .enumerate()
            .map(|(i, (archetype, count))| {
                let step_number = i as u32 + 1;
                let (title, description) = archetype.heading(level);
                let step_resources: Vec<Resource> = resources.by_ref().take(count).collect();

                PathStep {
                    step_number,
                    title: title.to_string(),
                    description: description.to_string(),
                    estimated_duration: step_duration(step_resources.len(), level),
                    resources: step_resources,
                    prerequisites: prerequisites(step_number, *archetype, level),
                    learning_objectives: archetype.objectives(topic),
                }
            })
            .collect();

        LearningPath {
            title: path_title(profile),
            description: path_description(profile, resource_count),
            total_duration: total_duration(level).to_string(),
            difficulty: level,
            steps,
            tags: path_tags(profile),
            created_at,
        }
    }
}

fn prerequisites(step_number: u32, archetype: StepArchetype, level: ExperienceLevel) -> Vec<String> {
    if step_number == 1 {
        return Vec::new();
    }

    let mut prerequisites = vec![format!("Complete Step {}", step_number - 1)];
    if let Some(extra) = archetype.prerequisite_addition(level) {
        prerequisites.push(extra.to_string());
    }
    prerequisites
}

fn path_title(profile: &LearnerProfile) -> String {
    format!(
        "{} Learning Path for {} ({})",
        title_case(profile.topic()),
        profile.experience_level.label(),
        profile.goal_category().label()
    )
}

fn path_description(profile: &LearnerProfile, resource_count: usize) -> String {
    let topic = profile.topic();
    let goal = match profile.goal.trim() {
        "" => profile.goal_category().label().to_lowercase(),
        text => text.replace('_', " "),
    };

    let mut description = format!(
        "A comprehensive {}-level learning path for {}, designed for {}. \
         This path includes {} carefully curated resources including videos, \
         tutorials, and courses to help you master {} effectively.",
        profile.experience_level.as_str(),
        topic,
        goal,
        resource_count,
        topic
    );

    if let Some(hours) = profile.time_commitment.filter(|h| *h > 0) {
        description.push_str(&format!(" Designed for {} hours per week.", hours));
    }
    if let Some(pref) = profile
        .duration_preference
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
    {
        description.push_str(&format!(" Preferred duration: {}.", pref));
    }

    description
}

fn path_tags(profile: &LearnerProfile) -> Vec<String> {
    let topic = profile.topic().to_lowercase();
    let mut candidates = vec![
        topic.clone(),
        profile.experience_level.as_str().to_string(),
        profile.learning_style.as_str().to_string(),
        profile.goal_category().as_str().to_string(),
    ];

    if topic.contains("programming") || topic.contains("coding") {
        candidates.push("programming".to_string());
    }
    if topic.contains("web") {
        candidates.push("web-development".to_string());
    }
    if topic.contains("data") {
        candidates.push("data-science".to_string());
    }

    let mut tags: Vec<String> = Vec::with_capacity(candidates.len());
    for tag in candidates {
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}
