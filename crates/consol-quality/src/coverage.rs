//! Module coverage
//!
//! Which of the eight business modules hold usable data. Each module may be
//! written under several keys by different stage versions.

use consol_core::CollectedSteps;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shortest free-text payload that counts as content.
const MIN_TEXT_CHARS: usize = 100;

/// Business module name and the step keys it may be stored under.
pub const BUSINESS_MODULES: [(&str, &[&str]); 8] = [
    ("pesquisa_web", &["pesquisa_web_massiva", "pesquisa_web"]),
    ("avatar", &["avatar_ultra_detalhado", "avatar", "avatars"]),
    ("concorrencia", &["analise_concorrencia", "concorrencia"]),
    ("drivers_mentais", &["drivers_mentais_customizados", "drivers_mentais"]),
    ("funil_vendas", &["funil_vendas_otimizado", "funil_vendas"]),
    ("metricas", &["metricas", "metricas_qualidade"]),
    ("insights", &["insights_estrategicos", "insights_exclusivos", "insights"]),
    ("plano_acao", &["plano_acao_estrategico", "plano_acao"]),
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleCoverage {
    pub valid: Vec<String>,
    pub missing: Vec<String>,
}

impl ModuleCoverage {
    pub fn inspect(collected: &CollectedSteps) -> Self {
        let mut coverage = Self::default();
        for (module, keys) in BUSINESS_MODULES {
            let found = keys
                .iter()
                .filter_map(|key| collected.step(key).or_else(|| collected.pipeline_data.get(*key)))
                .any(has_content);
            if found {
                coverage.valid.push(module.to_string());
            } else {
                coverage.missing.push(module.to_string());
            }
        }
        coverage
    }
}

/// Non-empty object not reporting an error, non-empty list, or long text.
pub fn has_content(value: &Value) -> bool {
    match value {
        Value::Object(map) => !map.is_empty() && !value.to_string().to_lowercase().contains("erro"),
        Value::Array(items) => !items.is_empty(),
        Value::String(text) => text.chars().count() > MIN_TEXT_CHARS,
        _ => false,
    }
}
