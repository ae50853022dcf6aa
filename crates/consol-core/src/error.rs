//! Unified Error Model
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsolError {
    #[error("SESSION/{0}")]
    InvalidSession(String),

    #[error("SERIALIZE/{0}")]
    Serialize(#[from] serde_json::Error),

    #[error("CONFIG/{0}")]
    Config(String),
}
