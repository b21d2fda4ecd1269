// ============================================
// Query Generator (查詢生成)
// ============================================
//
// Rule-based mapping from a learner profile to per-source search queries.
//
// Three modifier tables (experience level, learning style, goal category)
// feed `topic + modifier + suffix` templates. Each source gets a fixed
// 2-4 queries so downstream fetch volume stays bounded. Output order is
// sources in fixed order, then template order.

use crate::models::{
    ContentType, ExperienceLevel, LearnerProfile, LearningGoal, LearningStyle, SearchQuery,
    Source,
};

fn level_modifiers(level: ExperienceLevel) -> &'static [&'static str] {
    match level {
        ExperienceLevel::Beginner => &[
            "beginner",
            "introduction",
            "basics",
            "tutorial",
            "getting started",
            "fundamentals",
        ],
        ExperienceLevel::Intermediate => &[
            "intermediate",
            "practical",
            "projects",
            "hands-on",
            "implementation",
        ],
        ExperienceLevel::Advanced => &[
            "advanced",
            "expert",
            "mastery",
            "deep dive",
            "professional",
            "complex",
        ],
    }
}

fn style_modifiers(style: LearningStyle) -> &'static [&'static str] {
    match style {
        LearningStyle::Visual => &["visual", "diagram", "infographic", "chart", "demonstration"],
        LearningStyle::Auditory => &["explained", "lecture", "podcast", "audio", "discussion"],
        LearningStyle::HandsOn => &["project", "tutorial", "coding", "practice", "workshop", "lab"],
        LearningStyle::Reading => &["guide", "documentation", "article", "book", "text"],
    }
}

fn goal_modifiers(goal: LearningGoal) -> &'static [&'static str] {
    match goal {
        LearningGoal::SkillBuilding => &["skills", "techniques", "methods", "practical"],
        LearningGoal::CareerChange => &["career", "job", "employment", "professional", "industry"],
        LearningGoal::Certification => &["certification", "exam", "test", "credential", "official"],
        LearningGoal::Hobby => &["fun", "hobby", "personal", "creative", "interesting"],
        LearningGoal::Academic => &["academic", "theory", "research", "study", "course"],
    }
}

/// Modifier tokens selected for one profile
struct Modifiers {
    level: &'static [&'static str],
    style: &'static [&'static str],
    goal: &'static [&'static str],
    hands_on: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QueryGenerator;

impl QueryGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate the per-source queries for a profile.
    ///
    /// Returns an empty list when the topic is blank; callers treat that as
    /// an invalid profile rather than retrying with defaults.
    pub fn generate_queries(&self, profile: &LearnerProfile) -> Vec<SearchQuery> {
        self.generate_for_sources(profile, &Source::ALL)
    }

    /// Same as [`generate_queries`](Self::generate_queries) restricted to
    /// `sources`. Output still follows the fixed source order.
    pub fn generate_for_sources(
        &self,
        profile: &LearnerProfile,
        sources: &[Source],
    ) -> Vec<SearchQuery> {
        if !profile.has_topic() {
            return Vec::new();
        }

        let topic = profile.topic();
        let mods = Modifiers {
            level: level_modifiers(profile.experience_level),
            style: style_modifiers(profile.learning_style),
            goal: goal_modifiers(profile.goal_category()),
            hands_on: profile.learning_style == LearningStyle::HandsOn,
        };

        Source::ALL
            .iter()
            .filter(|s| sources.contains(s))
            .flat_map(|source| match source {
                Source::YouTube => youtube_queries(topic, &mods),
                Source::Udemy => udemy_queries(topic, &mods),
                Source::Reddit => reddit_queries(topic, &mods),
            })
            .collect()
    }

    /// Tutorial queries drilling into one subtopic
    pub fn generate_follow_up_queries(
        &self,
        topic: &str,
        subtopic: &str,
        difficulty: &str,
    ) -> Vec<SearchQuery> {
        let (topic, subtopic, difficulty) = (topic.trim(), subtopic.trim(), difficulty.trim());
        if topic.is_empty() || subtopic.is_empty() {
            return Vec::new();
        }

        [
            format!("{} {} {}", subtopic, topic, difficulty),
            format!("how to {} in {}", subtopic, topic),
            format!("{} {} tutorial", subtopic, topic),
            format!("{} {} examples", subtopic, topic),
        ]
        .into_iter()
        .map(|text| {
            SearchQuery::new(
                Source::YouTube,
                text.split_whitespace().collect::<Vec<_>>().join(" "),
                difficulty,
                ContentType::Tutorial,
            )
        })
        .collect()
    }
}

fn youtube_queries(topic: &str, mods: &Modifiers) -> Vec<SearchQuery> {
    let primary = mods.level[0];
    let mut queries: Vec<SearchQuery> = mods.level[..2]
        .iter()
        .map(|m| {
            SearchQuery::new(
                Source::YouTube,
                format!("{} {} tutorial", topic, m),
                *m,
                ContentType::Tutorial,
            )
        })
        .collect();

    queries.push(SearchQuery::new(
        Source::YouTube,
        format!("{} {} course", topic, mods.style[0]),
        primary,
        ContentType::Course,
    ));

    if mods.hands_on {
        queries.push(SearchQuery::new(
            Source::YouTube,
            format!("{} {} project", topic, primary),
            primary,
            ContentType::Project,
        ));
    } else {
        queries.push(SearchQuery::new(
            Source::YouTube,
            format!("{} {} course", topic, mods.style[1]),
            primary,
            ContentType::Course,
        ));
    }

    queries
}

fn udemy_queries(topic: &str, mods: &Modifiers) -> Vec<SearchQuery> {
    let primary = mods.level[0];
    let mut queries: Vec<SearchQuery> = mods.level[..2]
        .iter()
        .map(|m| {
            SearchQuery::new(
                Source::Udemy,
                format!("{} {} complete course", topic, m),
                *m,
                ContentType::Course,
            )
        })
        .collect();

    queries.push(SearchQuery::new(
        Source::Udemy,
        format!("{} {} course", topic, mods.goal[0]),
        primary,
        ContentType::Course,
    ));

    queries
}

fn reddit_queries(topic: &str, mods: &Modifiers) -> Vec<SearchQuery> {
    let primary = mods.level[0];
    vec![
        SearchQuery::new(
            Source::Reddit,
            format!("{} {} learning path", topic, primary),
            primary,
            ContentType::Discussion,
        ),
        SearchQuery::new(
            Source::Reddit,
            format!("{} {} best resources", topic, primary),
            primary,
            ContentType::Recommendations,
        ),
        SearchQuery::new(
            Source::Reddit,
            format!("{} {} advice", topic, mods.goal[0]),
            primary,
            ContentType::Advice,
        ),
    ]
}
