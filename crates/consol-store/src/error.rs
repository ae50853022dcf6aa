//! Store errors
use consol_core::ConsolError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("STORE/IO/{0}")]
    Io(#[from] std::io::Error),

    #[error("STORE/SERIALIZE/{0}")]
    Serialize(#[from] serde_json::Error),

    #[error("STORE/WALK/{0}")]
    Walk(#[from] walkdir::Error),

    #[error("STORE/SESSION/{0}")]
    Session(#[from] ConsolError),

    #[error("STORE/NAME/{0}")]
    InvalidName(String),

    #[error("STORE/UNAVAILABLE/{0}")]
    Unavailable(String),
}
