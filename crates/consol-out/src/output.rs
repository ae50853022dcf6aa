//! Multi-format output
//!
//! Renders one report to every registered format and writes each to disk.
//! Formats are independent: one failing never blocks the others.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use consol_core::{RenderFormat, Report};

use crate::renderer::{HtmlRenderer, JsonRenderer, MarkdownRenderer, ReportRenderer, TextRenderer};
use crate::templates::TemplatesFile;
use crate::RenderError;

/// Where and under which names rendered files are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    pub output_root: PathBuf,
    pub report_prefix: String,
    pub session_prefix_len: usize,
}

impl OutputSettings {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            ..Self::default()
        }
    }

    /// `{prefix}_{session_prefix}_{YYYYmmdd_HHMMSS}.{ext}`
    pub fn file_name(&self, report: &Report, format: RenderFormat, at: DateTime<Utc>) -> String {
        format!(
            "{}_{}_{}.{}",
            self.report_prefix,
            report.session_id.prefix(self.session_prefix_len),
            at.format("%Y%m%d_%H%M%S"),
            format.extension()
        )
    }

    pub fn session_dir(&self, report: &Report) -> PathBuf {
        self.output_root.join(report.session_id.as_str())
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("relatorios_finais"),
            report_prefix: "relatorio_final".to_string(),
            session_prefix_len: 8,
        }
    }
}

pub struct MultiFormatRenderer {
    settings: OutputSettings,
    renderers: BTreeMap<RenderFormat, Box<dyn ReportRenderer>>,
}

impl MultiFormatRenderer {
    /// Built-in renderers for all four formats, default naming.
    pub fn new(output_root: impl Into<PathBuf>) -> Result<Self, RenderError> {
        Self::with_settings(OutputSettings::new(output_root), &TemplatesFile::embedded()?)
    }

    pub fn with_settings(
        settings: OutputSettings,
        templates: &TemplatesFile,
    ) -> Result<Self, RenderError> {
        Ok(Self {
            settings,
            renderers: BTreeMap::new(),
        }
        .with_renderer(HtmlRenderer::new(templates)?)
        .with_renderer(MarkdownRenderer::new(templates)?)
        .with_renderer(JsonRenderer)
        .with_renderer(TextRenderer::new(templates)?))
    }

    /// Register a renderer, replacing any other for the same format.
    pub fn with_renderer(mut self, renderer: impl ReportRenderer + 'static) -> Self {
        self.renderers.insert(renderer.format(), Box::new(renderer));
        self
    }

    /// Keep only the listed formats.
    pub fn only(mut self, formats: &[RenderFormat]) -> Self {
        self.renderers.retain(|format, _| formats.contains(format));
        self
    }

    pub fn formats(&self) -> Vec<RenderFormat> {
        self.renderers.keys().copied().collect()
    }

    pub fn settings(&self) -> &OutputSettings {
        &self.settings
    }

    /// Render and write every format. Failed formats are logged and omitted.
    pub fn render_all(&self, report: &Report) -> BTreeMap<RenderFormat, PathBuf> {
        let at = Utc::now();
        let dir = self.settings.session_dir(report);
        let mut written = BTreeMap::new();

        for (format, renderer) in &self.renderers {
            let result = renderer
                .render(report)
                .and_then(|content| self.write(&dir, report, *format, at, &content));
            match result {
                Ok(path) => {
                    info!(format = %format, path = %path.display(), "report format written");
                    written.insert(*format, path);
                }
                Err(e) => error!(format = %format, error = %e, "report format failed"),
            }
        }
        written
    }

    fn write(
        &self,
        dir: &Path,
        report: &Report,
        format: RenderFormat,
        at: DateTime<Utc>,
        content: &str,
    ) -> Result<PathBuf, RenderError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(self.settings.file_name(report, format, at));
        fs::write(&path, content)?;
        Ok(path)
    }
}
