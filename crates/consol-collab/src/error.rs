//! Collaborator errors
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CollabError>;

#[derive(Error, Debug)]
pub enum CollabError {
    #[error("COLLAB/UNAVAILABLE/{0}")]
    Unavailable(String),

    #[error("COLLAB/PROVIDER/{provider}: {message}")]
    Provider { provider: String, message: String },

    #[error("COLLAB/RESPONSE/{0}")]
    InvalidResponse(String),

    #[error("COLLAB/TASK/{0}")]
    Task(String),
}

impl From<serde_json::Error> for CollabError {
    fn from(err: serde_json::Error) -> Self {
        CollabError::InvalidResponse(err.to_string())
    }
}

impl From<tokio::task::JoinError> for CollabError {
    fn from(err: tokio::task::JoinError) -> Self {
        CollabError::Task(err.to_string())
    }
}
