use serde::{Deserialize, Serialize};

use super::Source;

/// Learner experience level (ordinal)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    #[serde(alias = "expert")]
    Advanced,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 3] = [
        ExperienceLevel::Beginner,
        ExperienceLevel::Intermediate,
        ExperienceLevel::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "beginner",
            ExperienceLevel::Intermediate => "intermediate",
            ExperienceLevel::Advanced => "advanced",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "Beginner",
            ExperienceLevel::Intermediate => "Intermediate",
            ExperienceLevel::Advanced => "Advanced",
        }
    }

    /// Parse a free-text difficulty tag attached to a resource.
    /// Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "beginner" => Some(ExperienceLevel::Beginner),
            "intermediate" => Some(ExperienceLevel::Intermediate),
            "advanced" | "expert" => Some(ExperienceLevel::Advanced),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LearningStyle {
    Visual,
    Auditory,
    #[serde(alias = "kinesthetic")]
    HandsOn,
    #[serde(alias = "reading_writing")]
    Reading,
}

impl LearningStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            LearningStyle::Visual => "visual",
            LearningStyle::Auditory => "auditory",
            LearningStyle::HandsOn => "hands_on",
            LearningStyle::Reading => "reading",
        }
    }
}

/// Goal category derived from the learner's free-text goal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LearningGoal {
    SkillBuilding,
    CareerChange,
    Certification,
    Hobby,
    Academic,
}

impl LearningGoal {
    pub fn as_str(&self) -> &'static str {
        match self {
            LearningGoal::SkillBuilding => "skill_building",
            LearningGoal::CareerChange => "career_change",
            LearningGoal::Certification => "certification",
            LearningGoal::Hobby => "hobby",
            LearningGoal::Academic => "academic",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LearningGoal::SkillBuilding => "Skill Building",
            LearningGoal::CareerChange => "Career Change",
            LearningGoal::Certification => "Certification",
            LearningGoal::Hobby => "Hobby",
            LearningGoal::Academic => "Academic",
        }
    }

    /// Classify a goal description. Exact slugs win, then keyword
    /// matching, then `SkillBuilding`.
    pub fn classify(goal: &str) -> Self {
        let normalized = goal.trim().to_lowercase();
        let slug = normalized.replace([' ', '-'], "_");

        match slug.as_str() {
            "skill_building" => return LearningGoal::SkillBuilding,
            "career_change" => return LearningGoal::CareerChange,
            "certification" => return LearningGoal::Certification,
            "hobby" => return LearningGoal::Hobby,
            "academic" => return LearningGoal::Academic,
            _ => {}
        }

        let words: Vec<&str> = normalized
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        // Stems match word prefixes ("certif" matches "certification")
        let has_stem = |stems: &[&str]| words.iter().any(|w| stems.iter().any(|s| w.starts_with(s)));

        if has_stem(&["career", "job", "employ", "industry", "hire", "hiring"]) {
            LearningGoal::CareerChange
        } else if has_stem(&["certif", "exam", "credential"]) {
            LearningGoal::Certification
        } else if words.contains(&"fun") || has_stem(&["hobby", "hobbies", "personal", "creative"]) {
            LearningGoal::Hobby
        } else if has_stem(&["academ", "university", "research", "degree", "study", "studies"]) {
            LearningGoal::Academic
        } else {
            LearningGoal::SkillBuilding
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LearnerProfile {
    pub goal: String,
    pub experience_level: ExperienceLevel,
    pub learning_style: LearningStyle,
    pub topic: String,
    /// Hours per week
    #[serde(default)]
    pub time_commitment: Option<u32>,
    #[serde(default)]
    pub duration_preference: Option<String>,
}

impl LearnerProfile {
    pub fn new(
        topic: impl Into<String>,
        experience_level: ExperienceLevel,
        learning_style: LearningStyle,
        goal: impl Into<String>,
    ) -> Self {
        Self {
            goal: goal.into(),
            experience_level,
            learning_style,
            topic: topic.into(),
            time_commitment: None,
            duration_preference: None,
        }
    }

    pub fn with_time_commitment(mut self, hours_per_week: u32) -> Self {
        self.time_commitment = Some(hours_per_week);
        self
    }

    pub fn with_duration_preference(mut self, preference: impl Into<String>) -> Self {
        self.duration_preference = Some(preference.into());
        self
    }

    /// Trimmed topic
    pub fn topic(&self) -> &str {
        self.topic.trim()
    }

    pub fn has_topic(&self) -> bool {
        !self.topic().is_empty()
    }

    pub fn goal_category(&self) -> LearningGoal {
        LearningGoal::classify(&self.goal)
    }
}

/// Upstream request for one path generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratePathRequest {
    pub profile: LearnerProfile,
    #[serde(default)]
    pub platform_preferences: Vec<Source>,
    #[serde(default)]
    pub duration_preference: Option<String>,
}

impl GeneratePathRequest {
    pub fn new(profile: LearnerProfile) -> Self {
        Self {
            profile,
            platform_preferences: Vec::new(),
            duration_preference: None,
        }
    }

    /// Profile with the request-level duration preference applied
    pub fn effective_profile(&self) -> LearnerProfile {
        let mut profile = self.profile.clone();
        if let Some(pref) = &self.duration_preference {
            profile.duration_preference = Some(pref.clone());
        }
        profile
    }
}
