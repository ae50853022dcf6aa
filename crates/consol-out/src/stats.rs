//! Size statistics of a finished report.
use serde::{Deserialize, Serialize};
use serde_json::Value;

use consol_core::Report;

use crate::RenderError;

const WORDS_PER_PAGE: usize = 250;
const CHARS_PER_PAGE: usize = 1800;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentDensity {
    Alta,
    #[serde(rename = "Média")]
    Media,
    Baixa,
}

impl ContentDensity {
    fn from_chars(chars: usize) -> Self {
        if chars > 100_000 {
            ContentDensity::Alta
        } else if chars > 50_000 {
            ContentDensity::Media
        } else {
            ContentDensity::Baixa
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportStatistics {
    #[serde(rename = "total_palavras")]
    pub words: usize,
    #[serde(rename = "total_caracteres")]
    pub characters: usize,
    #[serde(rename = "paginas_estimadas")]
    pub estimated_pages: usize,
    #[serde(rename = "secoes_principais")]
    pub sections: usize,
    #[serde(rename = "densidade_conteudo")]
    pub density: ContentDensity,
}

impl ReportStatistics {
    /// Measured on the compact JSON form of the report.
    pub fn compute(report: &Report) -> Result<Self, RenderError> {
        let value = serde_json::to_value(report)?;
        let text = serde_json::to_string(&value)?;

        let words = text.split_whitespace().count();
        let characters = text.chars().count();
        let sections = match &value {
            Value::Object(map) => map.keys().filter(|k| !k.starts_with('_')).count(),
            _ => 0,
        };

        Ok(Self {
            words,
            characters,
            estimated_pages: (words / WORDS_PER_PAGE).max(characters / CHARS_PER_PAGE),
            sections,
            density: ContentDensity::from_chars(characters),
        })
    }
}
