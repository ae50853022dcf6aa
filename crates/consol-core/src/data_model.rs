//! Data Model: StepRecord, StepFile
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::PathBuf;

use crate::session::SessionId;

/// Category used for error records written through `save_error`.
pub const ERROR_CATEGORY: &str = "erros";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    #[serde(rename = "sucesso")]
    Success,
    #[serde(rename = "erro")]
    Error,
}

/// One named, timestamped, session-scoped intermediate result.
///
/// Records are never updated in place: a stage that reruns writes a new
/// record with a later timestamp and the store keeps both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Step name (ex: "drivers_mentais_customizados")
    #[serde(rename = "etapa", alias = "name")]
    pub name: String,
    /// Storage category (ex: "analise_completa")
    #[serde(rename = "categoria", alias = "category")]
    pub category: String,
    pub session_id: SessionId,
    pub status: StepStatus,
    #[serde(rename = "dados", alias = "data", default)]
    pub data: Value,
    pub timestamp: DateTime<Utc>,
}

impl StepRecord {
    pub fn success(
        name: impl Into<String>,
        category: impl Into<String>,
        session_id: SessionId,
        data: Value,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            session_id,
            status: StepStatus::Success,
            data,
            timestamp: Utc::now(),
        }
    }

    pub fn error(
        name: impl Into<String>,
        session_id: SessionId,
        message: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            data: json!({ "etapa": name.clone(), "erro": message.into() }),
            name,
            category: ERROR_CATEGORY.to_string(),
            session_id,
            status: StepStatus::Error,
            timestamp: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == StepStatus::Success
    }
}

/// A raw intermediate file the step store holds for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepFile {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "caminho")]
    pub path: PathBuf,
    #[serde(rename = "tamanho")]
    pub size: u64,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "modificado")]
    pub modified: DateTime<Utc>,
}
