use thiserror::Error;

#[derive(Error, Debug)]
pub enum QualityError {
    #[error("PROFILE/{0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("PROFILE/INVALID/{0}")]
    InvalidProfile(String),
}
