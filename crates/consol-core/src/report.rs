//! Report: the consolidated output of one session.
//!
//! Four shapes share one identity, tagged by `tipo`:
//! full (`relatorio_completo`), minimal (`relatorio_minimo`), emergency
//! (`relatorio_emergencia`) and critical (`emergencia_critica`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::data_model::StepFile;
use crate::error::ConsolError;
use crate::quality::QualityAssessment;
use crate::session::SessionId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub session_id: SessionId,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_consolidacao: Option<ConsolidationMetadata>,
    #[serde(flatten)]
    pub body: ReportBody,
}

impl Report {
    pub fn new(session_id: SessionId, body: ReportBody) -> Self {
        Self {
            session_id,
            timestamp: Utc::now(),
            metadata_consolidacao: None,
            body,
        }
    }

    pub fn with_metadata(mut self, metadata: ConsolidationMetadata) -> Self {
        self.metadata_consolidacao = Some(metadata);
        self
    }

    pub fn kind(&self) -> ReportKind {
        match &self.body {
            ReportBody::Full(_) => ReportKind::Full,
            ReportBody::Minimal(_) => ReportKind::Minimal,
            ReportBody::Emergency(_) => ReportKind::Emergency,
            ReportBody::Critical(_) => ReportKind::Critical,
        }
    }

    /// Dict-like form used by renderers and persisted step records.
    pub fn to_value(&self) -> Result<Value, ConsolError> {
        Ok(serde_json::to_value(self)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportKind {
    #[serde(rename = "relatorio_completo")]
    Full,
    #[serde(rename = "relatorio_minimo")]
    Minimal,
    #[serde(rename = "relatorio_emergencia")]
    Emergency,
    #[serde(rename = "emergencia_critica")]
    Critical,
}

impl ReportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::Full => "relatorio_completo",
            ReportKind::Minimal => "relatorio_minimo",
            ReportKind::Emergency => "relatorio_emergencia",
            ReportKind::Critical => "emergencia_critica",
        }
    }

    /// Full or minimal: the consolidation did not need the fallback tiers.
    pub fn is_regular(self) -> bool {
        matches!(self, ReportKind::Full | ReportKind::Minimal)
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tipo")]
pub enum ReportBody {
    #[serde(rename = "relatorio_completo")]
    Full(FullReport),
    #[serde(rename = "relatorio_minimo")]
    Minimal(MinimalReport),
    #[serde(rename = "relatorio_emergencia")]
    Emergency(EmergencyReport),
    #[serde(rename = "emergencia_critica")]
    Critical(CriticalReport),
}

// ============================================================================
// FULL
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullReport {
    pub qualidade_validada: bool,
    pub score_qualidade: f64,
    pub resumo_executivo: ExecutiveSummary,
    pub diagnostico_final: FinalDiagnostic,
    /// Principal modules keyed by step name (ex: "insights_exclusivos").
    #[serde(flatten)]
    pub modules: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub segmento_analisado: String,
    pub produto_servico: String,
    pub qualidade_analise: f64,
    pub componentes_gerados: usize,
    pub principais_descobertas: Vec<Value>,
    pub recomendacoes_imediatas: Vec<String>,
    pub proximos_passos: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalDiagnostic {
    pub status_geral: String,
    pub componentes_funcionaram: Vec<String>,
    pub componentes_falharam: Vec<String>,
    /// Business modules without usable data, with their alias keys resolved.
    #[serde(default)]
    pub modulos_sem_dados: Vec<String>,
    pub qualidade_geral: f64,
    pub dados_preservados: bool,
    pub recuperacao_possivel: bool,
    pub avaliacao: String,
    pub recomendacao: String,
}

// ============================================================================
// MINIMAL
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimalReport {
    pub status: String,
    pub qualidade_limitada: bool,
    pub score_qualidade: f64,
    pub projeto_dados: Value,
    pub componentes_gerados: Vec<String>,
    pub arquivos_intermediarios: IntermediateFiles,
    pub dados_recuperados: BTreeMap<String, Value>,
    pub diagnostico_problemas: ProblemDiagnosis,
    pub resumo_preservacao: PreservationSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntermediateFiles {
    pub localizacao: String,
    pub arquivos_disponiveis: Vec<StepFile>,
    pub total_arquivos: usize,
    pub instrucoes_acesso: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemDiagnosis {
    pub problemas_identificados: Vec<String>,
    pub recomendacoes: Vec<String>,
    pub proximos_passos: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreservationSummary {
    pub dados_perdidos: String,
    pub componentes_executados: usize,
    pub arquivos_salvos: usize,
    pub recuperacao_possivel: String,
    pub valor_preservado: String,
}

// ============================================================================
// EMERGENCY / CRITICAL
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyReport {
    pub status: String,
    pub erro_consolidacao: String,
    pub garantias: Guarantees,
    pub instrucoes_recuperacao: Vec<String>,
    pub arquivos_disponiveis: Vec<StepFile>,
    pub valor_preservado: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guarantees {
    pub dados_perdidos: String,
    pub arquivos_salvos: String,
    pub recuperacao_possivel: String,
    pub localizacao_dados: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalReport {
    pub erro_original: String,
    pub erro_fallback: String,
    pub status: String,
    pub instrucao: String,
}

// ============================================================================
// METADATA
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidationMetadata {
    pub session_id: SessionId,
    pub timestamp_consolidacao: DateTime<Utc>,
    pub qualidade_dados: QualityAssessment,
    /// "completo" | "minimo"
    pub tipo_relatorio: String,
    pub arquivos_intermediarios: Vec<StepFile>,
    pub garantia_dados: String,
    pub acesso_direto: String,
}
