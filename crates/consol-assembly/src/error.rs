//! Assembly errors
use consol_core::ConsolError;
use consol_out::RenderError;
use consol_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("ASSEMBLY/STORE/{0}")]
    Store(#[from] StoreError),

    #[error("ASSEMBLY/CORE/{0}")]
    Core(#[from] ConsolError),

    #[error("ASSEMBLY/SERIALIZE/{0}")]
    Serialize(#[from] serde_json::Error),

    #[error("ASSEMBLY/RENDER/{0}")]
    Render(#[from] RenderError),

    #[error("ASSEMBLY/CONFIG/{0}")]
    Config(String),

    #[error("ASSEMBLY/PANIC/{0}")]
    Panic(String),
}
