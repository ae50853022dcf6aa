//! Consolidation configuration
//!
//! Immutable once a service is built from it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use consol_core::{RenderFormat, INTERMEDIATE_ROOT};
use consol_out::OutputSettings;
use consol_quality::QualityProfile;

use crate::error::AssemblyError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsolidationConfig {
    /// Sufficiency policy used to pick full vs minimal
    pub profile: QualityProfile,

    /// Root of the filesystem step store
    pub store_root: PathBuf,

    /// Rendered files land in `{output_root}/{session_id}/`
    pub output_root: PathBuf,

    /// Filename prefix of rendered files
    pub report_prefix: String,

    /// Session-id characters kept in rendered filenames
    pub session_prefix_len: usize,

    /// YAML templates file overriding the embedded templates
    pub templates_path: Option<PathBuf>,

    /// Enabled output formats
    pub formats: Vec<RenderFormat>,
}

impl Default for ConsolidationConfig {
    fn default() -> Self {
        let output = OutputSettings::default();
        Self {
            profile: QualityProfile::lenient(),
            store_root: PathBuf::from(INTERMEDIATE_ROOT),
            output_root: output.output_root,
            report_prefix: output.report_prefix,
            session_prefix_len: output.session_prefix_len,
            templates_path: None,
            formats: RenderFormat::ALL.to_vec(),
        }
    }
}

impl ConsolidationConfig {
    /// Load configuration from YAML; missing keys keep their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, AssemblyError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| AssemblyError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks shared by YAML loading and service construction.
    pub fn validate(&self) -> Result<(), AssemblyError> {
        if self.formats.is_empty() {
            return Err(AssemblyError::Config("no output format enabled".to_string()));
        }
        self.profile
            .validate()
            .map_err(|e| AssemblyError::Config(e.to_string()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AssemblyError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| AssemblyError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
    }

    pub fn output_settings(&self) -> OutputSettings {
        OutputSettings {
            output_root: self.output_root.clone(),
            report_prefix: self.report_prefix.clone(),
            session_prefix_len: self.session_prefix_len,
        }
    }
}
