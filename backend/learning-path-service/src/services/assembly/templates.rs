use crate::models::ExperienceLevel;

/// Role a step plays in the curriculum; position is fixed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepArchetype {
    Introduction,
    CoreConcepts,
    PracticalExamples,
    HandsOnPractice,
    Capstone,
}

impl StepArchetype {
    pub const ORDER: [StepArchetype; 5] = [
        StepArchetype::Introduction,
        StepArchetype::CoreConcepts,
        StepArchetype::PracticalExamples,
        StepArchetype::HandsOnPractice,
        StepArchetype::Capstone,
    ];

    /// (title, description) for a level
    pub fn heading(&self, level: ExperienceLevel) -> (&'static str, &'static str) {
        use ExperienceLevel::*;
        use StepArchetype::*;

        match (level, self) {
            (Beginner, Introduction) => ("Introduction and Fundamentals", "Get familiar with basic concepts"),
            (Beginner, CoreConcepts) => ("Core Concepts", "Learn the essential building blocks"),
            (Beginner, PracticalExamples) => ("Practical Examples", "See concepts in action"),
            (Beginner, HandsOnPractice) => ("Hands-On Practice", "Apply what you've learned"),
            (Beginner, Capstone) => ("First Project", "Build something real"),

            (Intermediate, Introduction) => ("Review and Foundation", "Solidify your existing knowledge"),
            (Intermediate, CoreConcepts) => ("Advanced Concepts", "Dive deeper into complex topics"),
            (Intermediate, PracticalExamples) => ("Best Practices", "Learn industry standards"),
            (Intermediate, HandsOnPractice) => ("Real-World Projects", "Build complex applications"),
            (Intermediate, Capstone) => ("Optimization and Performance", "Make it better and faster"),

            (Advanced, Introduction) => ("Advanced Techniques", "Master complex methodologies"),
            (Advanced, CoreConcepts) => ("Architecture and Design", "Learn system design principles"),
            (Advanced, PracticalExamples) => ("Performance Optimization", "Optimize for scale and efficiency"),
            (Advanced, HandsOnPractice) => ("Expert-Level Projects", "Build production-ready systems"),
            (Advanced, Capstone) => ("Teaching and Leadership", "Share knowledge and lead teams"),
        }
    }

    pub fn objectives(&self, topic: &str) -> Vec<String> {
        match self {
            StepArchetype::Introduction => vec![
                format!("Understand the basic concepts of {}", topic),
                "Learn the fundamental terminology and principles".to_string(),
                format!("Get familiar with the {} ecosystem", topic),
            ],
            StepArchetype::CoreConcepts => vec![
                format!("Master the essential {} concepts", topic),
                "Learn how different components work together".to_string(),
                "Understand best practices and common patterns".to_string(),
            ],
            StepArchetype::PracticalExamples => vec![
                format!("See {} concepts applied in real scenarios", topic),
                "Understand common use cases and applications".to_string(),
                "Learn to identify when to use different approaches".to_string(),
            ],
            StepArchetype::HandsOnPractice => vec![
                format!("Practice implementing {} solutions", topic),
                "Build confidence through hands-on exercises".to_string(),
                "Develop problem-solving skills".to_string(),
            ],
            StepArchetype::Capstone => vec![
                format!("Apply {} knowledge to build a complete project", topic),
                "Learn project organization and structure".to_string(),
                "Practice debugging and troubleshooting".to_string(),
            ],
        }
    }

    /// Extra prerequisite beyond completing the previous step, keyed on
    /// the step title at `level`
    pub fn prerequisite_addition(&self, level: ExperienceLevel) -> Option<&'static str> {
        let title = self.heading(level).0.to_lowercase();
        if title.contains("advanced") {
            Some("Strong understanding of core concepts")
        } else if title.contains("project") {
            Some("Practical experience with the fundamentals")
        } else {
            None
        }
    }
}

pub fn total_duration(level: ExperienceLevel) -> &'static str {
    match level {
        ExperienceLevel::Beginner => "6-10 weeks",
        ExperienceLevel::Intermediate => "8-12 weeks",
        ExperienceLevel::Advanced => "10-16 weeks",
    }
}

/// 2 days per resource scaled by level, in whole weeks (min 1)
pub fn step_duration(resource_count: usize, level: ExperienceLevel) -> String {
    // Integer scaling: x1.5 and x0.7, truncated
    let base_days = resource_count * 2;
    let days = match level {
        ExperienceLevel::Beginner => base_days * 3 / 2,
        ExperienceLevel::Intermediate => base_days,
        ExperienceLevel::Advanced => base_days * 7 / 10,
    };

    match (days / 7).max(1) {
        1 => "1 week".to_string(),
        weeks => format!("{} weeks", weeks),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_duration() {
        assert_eq!(step_duration(0, ExperienceLevel::Beginner), "1 week");
        // 3 * 2 * 1.5 = 9 days
        assert_eq!(step_duration(3, ExperienceLevel::Beginner), "1 week");
        // 5 * 2 * 1.5 = 15 days
        assert_eq!(step_duration(5, ExperienceLevel::Beginner), "2 weeks");
        assert_eq!(step_duration(7, ExperienceLevel::Intermediate), "2 weeks");
        // 10 * 2 * 0.7 = 14 days
        assert_eq!(step_duration(10, ExperienceLevel::Advanced), "2 weeks");
    }

    #[test]
    fn test_every_archetype_has_objectives() {
        for archetype in StepArchetype::ORDER {
            let objectives = archetype.objectives("Rust");
            assert_eq!(objectives.len(), 3);
            for level in ExperienceLevel::ALL {
                let (title, description) = archetype.heading(level);
                assert!(!title.is_empty() && !description.is_empty());
            }
        }
    }
}
