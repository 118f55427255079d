use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input for '{field}': {reason}")]
    Validation { field: String, reason: String },

    #[error("Data unavailable from {collaborator}: {reason}")]
    DataUnavailable {
        collaborator: &'static str,
        reason:       String,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EngineError {
    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        EngineError::Validation {
            field:  field.to_string(),
            reason: reason.into(),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
