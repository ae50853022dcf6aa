//! Typed, lenient views over step payloads.
//!
//! Upstream stages write loosely-structured JSON. Everything that reads a
//! step goes through this module: a field with the wrong type decodes to
//! its default and a payload with the wrong overall shape is "absent".

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The principal analysis modules a full report is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StepKind {
    ProjectData,
    WebResearch,
    Avatar,
    MentalDrivers,
    VisualProofs,
    AntiObjection,
    PrePitch,
    Predictions,
    Insights,
}

impl StepKind {
    /// Allow-list copied into a full report, in report order.
    pub const PRINCIPAL: [StepKind; 9] = [
        StepKind::ProjectData,
        StepKind::WebResearch,
        StepKind::Avatar,
        StepKind::MentalDrivers,
        StepKind::VisualProofs,
        StepKind::AntiObjection,
        StepKind::PrePitch,
        StepKind::Predictions,
        StepKind::Insights,
    ];

    /// Components a complete run is expected to have produced.
    pub const EXPECTED: [StepKind; 6] = [
        StepKind::WebResearch,
        StepKind::Avatar,
        StepKind::MentalDrivers,
        StepKind::VisualProofs,
        StepKind::AntiObjection,
        StepKind::PrePitch,
    ];

    pub fn key(self) -> &'static str {
        match self {
            StepKind::ProjectData => "projeto_dados",
            StepKind::WebResearch => "pesquisa_web_massiva",
            StepKind::Avatar => "avatar_ultra_detalhado",
            StepKind::MentalDrivers => "drivers_mentais_customizados",
            StepKind::VisualProofs => "provas_visuais_sugeridas",
            StepKind::AntiObjection => "sistema_anti_objecao",
            StepKind::PrePitch => "pre_pitch_invisivel",
            StepKind::Predictions => "predicoes_futuro_completas",
            StepKind::Insights => "insights_exclusivos",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::PRINCIPAL.into_iter().find(|kind| kind.key() == key)
    }
}

/// Deserialize a field, falling back to `T::default()` on a type mismatch.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Deserialize a count. Any JSON number counts, truncated toward zero;
/// negatives and non-numbers are 0.
pub fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let count = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().unwrap_or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f > 0.0)
                .map_or(0, |f| f.trunc() as u64)
        }),
        _ => 0,
    };
    Ok(count)
}

/// Decode a JSON object into `T`; anything that is not an object is absent.
pub fn decode_object<T: DeserializeOwned>(value: &Value) -> Option<T> {
    if !value.is_object() {
        return None;
    }
    serde_json::from_value(value.clone()).ok()
}

/// Output of the mental-drivers stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MentalDrivers {
    #[serde(default, deserialize_with = "lenient")]
    pub drivers_customizados: Vec<Value>,
}

impl MentalDrivers {
    pub fn count(&self) -> usize {
        self.drivers_customizados.len()
    }

    pub fn drivers(&self) -> Vec<Driver> {
        self.drivers_customizados
            .iter()
            .map(|v| decode_object(v).unwrap_or_default())
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Driver {
    #[serde(default, deserialize_with = "lenient")]
    pub nome: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub gatilho_central: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub roteiro_ativacao: ActivationScript,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivationScript {
    #[serde(default, deserialize_with = "lenient")]
    pub historia_analogia: Option<String>,
}

/// Output of the massive web-research stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebResearch {
    #[serde(default, deserialize_with = "lenient_count")]
    pub unique_sources: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub extracted_content: Vec<Value>,
}

/// Project description handed in by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectData {
    #[serde(default, deserialize_with = "lenient")]
    pub segmento: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub produto: Option<String>,
}

/// Render a list entry (insight, finding) as display text.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wrong_field_type_defaults() {
        let drivers: MentalDrivers =
            decode_object(&json!({ "drivers_customizados": "not a list" })).unwrap();
        assert_eq!(drivers.count(), 0);

        let research: WebResearch = decode_object(&json!({
            "unique_sources": "three",
            "extracted_content": [1, 2]
        }))
        .unwrap();
        assert_eq!(research.unique_sources, 0);
        assert_eq!(research.extracted_content.len(), 2);
    }

    #[test]
    fn test_fractional_source_counts() {
        let sources = |raw: Value| {
            decode_object::<WebResearch>(&json!({ "unique_sources": raw }))
                .unwrap()
                .unique_sources
        };
        assert_eq!(sources(json!(3.0)), 3);
        assert_eq!(sources(json!(2.9)), 2);
        assert_eq!(sources(json!(12)), 12);
        assert_eq!(sources(json!(-4)), 0);
        assert_eq!(sources(json!(-0.5)), 0);
        assert_eq!(sources(json!("3")), 0);
        assert_eq!(sources(Value::Null), 0);
    }

    #[test]
    fn test_non_object_is_absent() {
        assert!(decode_object::<MentalDrivers>(&json!(["a", "b"])).is_none());
        assert!(decode_object::<WebResearch>(&Value::Null).is_none());
    }

    #[test]
    fn test_driver_view_tolerates_garbage_entries() {
        let drivers: MentalDrivers = decode_object(&json!({
            "drivers_customizados": [
                {
                    "nome": "Urgência",
                    "gatilho_central": "Tempo",
                    "roteiro_ativacao": { "historia_analogia": "Relógio" }
                },
                "loose string",
                { "nome": 42 }
            ]
        }))
        .unwrap();
        let views = drivers.drivers();
        assert_eq!(views.len(), 3);
        assert_eq!(views[0].nome.as_deref(), Some("Urgência"));
        assert_eq!(views[0].roteiro_ativacao.historia_analogia.as_deref(), Some("Relógio"));
        assert!(views[1].nome.is_none());
        assert!(views[2].nome.is_none());
    }

    #[test]
    fn test_step_kind_keys() {
        for kind in StepKind::PRINCIPAL {
            assert_eq!(StepKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(StepKind::from_key("unknown"), None);
    }
}
