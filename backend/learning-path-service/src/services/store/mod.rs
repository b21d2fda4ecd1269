use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::models::LearningPath;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Invalid path id: {0}")]
    InvalidId(String),
}

/// Persistence collaborator; assigns path identifiers
#[async_trait]
pub trait PathStore: Send + Sync {
    async fn save(&self, path: &LearningPath) -> Result<String, StoreError>;
}

/// Process-local store keyed by v4 uuid
#[derive(Debug, Default)]
pub struct InMemoryPathStore {
    paths: DashMap<Uuid, LearningPath>,
}

impl InMemoryPathStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Result<Option<LearningPath>, StoreError> {
        let id = Uuid::parse_str(id).map_err(|e| StoreError::InvalidId(e.to_string()))?;
        Ok(self.paths.get(&id).map(|entry| entry.value().clone()))
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[async_trait]
impl PathStore for InMemoryPathStore {
    async fn save(&self, path: &LearningPath) -> Result<String, StoreError> {
        let id = Uuid::new_v4();
        self.paths.insert(id, path.clone());
        debug!(path_id = %id, title = %path.title, "Stored learning path");
        Ok(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExperienceLevel, LearnerProfile, LearningStyle, Resource};
    use crate::services::PathAssembler;

    #[tokio::test]
    async fn test_save_assigns_distinct_ids() {
        let profile = LearnerProfile::new(
            "go",
            ExperienceLevel::Intermediate,
            LearningStyle::Auditory,
            "hobby",
        );
        let path = PathAssembler::new().build(&profile, Vec::<Resource>::new());
        let store = InMemoryPathStore::new();

        let first = store.save(&path).await.unwrap();
        let second = store.save(&path).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&first).unwrap(), Some(path));
        assert!(store.get("not-a-uuid").is_err());
    }
}
