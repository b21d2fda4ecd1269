use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::models::Source;
use crate::services::store::StoreError;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("No resources found for topic '{topic}'")]
    NoResourcesFound { topic: String },

    #[error("Source {source_id} unavailable: {reason}")]
    SourceUnavailable { source_id: Source, reason: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl AppError {
    /// HTTP-class status for the upstream service layer
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::InvalidProfile(_) => 400,
            AppError::NoResourcesFound { .. } => 404,
            AppError::SourceUnavailable { .. } => 502,
            AppError::Storage(_) | AppError::Configuration(_) => 500,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let hint = match self {
            AppError::InvalidProfile(_) => Some("Provide a non-empty topic to learn.".to_string()),
            AppError::NoResourcesFound { .. } => Some(
                "Try a broader topic or remove platform preferences.".to_string(),
            ),
            _ => None,
        };

        ErrorResponse {
            error: self.to_string(),
            code: self.status_code(),
            hint,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Storage(err.to_string())
    }
}
