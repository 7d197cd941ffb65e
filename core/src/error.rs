use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorklistError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type WorklistResult<T> = Result<T, WorklistError>;
