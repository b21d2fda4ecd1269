mod path;
mod profile;
mod resource;

pub use path::{GeneratePathResponse, LearningPath, PathStep};
pub use profile::{
    ExperienceLevel, GeneratePathRequest, LearnerProfile, LearningGoal, LearningStyle,
};
pub use resource::{
    AsResource, ContentType, RankedResource, Resource, ScoreFactors, SearchQuery, Source,
    UnknownSource,
};
