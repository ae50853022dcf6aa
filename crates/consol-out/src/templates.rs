//! Template loading for report rendering.
//!
//! Templates live in a YAML file with named Handlebars templates. A default
//! file ships embedded in the crate; a path from configuration replaces it.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::RenderError;

pub const MARKDOWN_TEMPLATE: &str = "report_markdown";
pub const HTML_TEMPLATE: &str = "report_html";
pub const TEXT_TEMPLATE: &str = "report_text";

const EMBEDDED_YAML: &str = include_str!("../templates/report.yaml");

static EMBEDDED: Lazy<Result<TemplatesFile, String>> =
    Lazy::new(|| TemplatesFile::from_yaml(EMBEDDED_YAML).map_err(|e| e.to_string()));

/// Top-level templates file structure
#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesFile {
    pub version: String,
    pub templates: BTreeMap<String, Template>,
}

/// A single template definition
#[derive(Debug, Clone, Deserialize)]
pub struct Template {
    pub description: String,
    pub template: String,
}

impl TemplatesFile {
    /// Templates shipped with the crate.
    pub fn embedded() -> Result<Self, RenderError> {
        EMBEDDED.clone().map_err(RenderError::Template)
    }

    /// Load templates from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RenderError::Template(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse templates from YAML content
    pub fn from_yaml(yaml: &str) -> Result<Self, RenderError> {
        serde_yaml::from_str(yaml).map_err(|e| RenderError::Template(e.to_string()))
    }

    /// Embedded templates overlaid with the ones found at `path`, if any.
    pub fn embedded_with_overrides(path: Option<&Path>) -> Result<Self, RenderError> {
        let mut base = Self::embedded()?;
        if let Some(path) = path {
            let custom = Self::load(path)?;
            base.version = custom.version;
            base.templates.extend(custom.templates);
        }
        Ok(base)
    }

    /// Get a template by name
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }
}
