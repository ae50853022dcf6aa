//! Quality assessment carried inside report metadata.
use serde::{Deserialize, Serialize};

/// Completeness score of one session's recovered steps.
///
/// Computed fresh on every consolidation; only persisted as part of the
/// report metadata and the `validacao_qualidade` step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    #[serde(rename = "qualidade_suficiente")]
    pub sufficient: bool,

    /// 0-100
    #[serde(rename = "score_qualidade")]
    pub score: f64,

    #[serde(rename = "componentes_encontrados")]
    pub components_found: usize,

    #[serde(rename = "drivers_mentais_count")]
    pub drivers: u64,

    #[serde(rename = "provas_visuais_count")]
    pub visual_proofs: u64,

    #[serde(rename = "pesquisa_fontes")]
    pub research_sources: u64,

    #[serde(rename = "insights_count")]
    pub insights: u64,

    #[serde(rename = "criterios_atendidos")]
    pub satisfied: u32,

    #[serde(rename = "total_criterios")]
    pub total_signals: u32,

    /// Profile used for evaluation (ex: "lenient@1.0")
    #[serde(rename = "perfil")]
    pub profile: String,

    #[serde(rename = "problemas_identificados", default)]
    pub problems: Vec<String>,

    #[serde(rename = "recomendacoes", default)]
    pub recommendations: Vec<String>,
}
