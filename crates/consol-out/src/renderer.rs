//! Report renderers.
//!
//! Uses Handlebars for the document formats with a few custom helpers:
//! - fixed1: Format a number with one decimal (85 -> "85.0")
//! - inc: One-based position from `@index`
//!
//! JSON is written straight from the report with `serde_json`.

use handlebars::{handlebars_helper, Handlebars};
use serde_json::Value;

use consol_core::{RenderFormat, Report};

use crate::templates::{TemplatesFile, HTML_TEMPLATE, MARKDOWN_TEMPLATE, TEXT_TEMPLATE};
use crate::view::ReportView;
use crate::RenderError;

handlebars_helper!(fixed1: |v: f64| format!("{:.1}", v));
handlebars_helper!(inc: |i: u64| i + 1);

/// Turns one report into one on-disk encoding.
pub trait ReportRenderer: Send + Sync {
    fn format(&self) -> RenderFormat;
    fn render(&self, report: &Report) -> Result<String, RenderError>;
}

/// Compiled Handlebars registry with registered helpers
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl TemplateRenderer {
    /// Registry that HTML-escapes interpolated values
    pub fn escaped(templates: &TemplatesFile) -> Result<Self, RenderError> {
        Self::build(templates, true)
    }

    /// Registry that writes values verbatim (markdown, text)
    pub fn verbatim(templates: &TemplatesFile) -> Result<Self, RenderError> {
        Self::build(templates, false)
    }

    fn build(templates: &TemplatesFile, escape: bool) -> Result<Self, RenderError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        if !escape {
            handlebars.register_escape_fn(handlebars::no_escape);
        }

        handlebars.register_helper("fixed1", Box::new(fixed1));
        handlebars.register_helper("inc", Box::new(inc));

        for (name, template) in &templates.templates {
            handlebars
                .register_template_string(name, &template.template)
                .map_err(|e| RenderError::Template(format!("{}: {}", name, e)))?;
        }

        Ok(TemplateRenderer { handlebars })
    }

    /// Render a named template with data
    pub fn render(&self, template_name: &str, data: &Value) -> Result<String, RenderError> {
        if !self.handlebars.has_template(template_name) {
            return Err(RenderError::Template(format!(
                "template '{}' not registered",
                template_name
            )));
        }
        self.handlebars
            .render(template_name, data)
            .map_err(|e| RenderError::Render(e.to_string()))
    }

    fn render_report(&self, template_name: &str, report: &Report) -> Result<String, RenderError> {
        let view = serde_json::to_value(ReportView::from_report(report))?;
        self.render(template_name, &view)
    }
}

pub struct HtmlRenderer {
    engine: TemplateRenderer,
}

impl HtmlRenderer {
    pub fn new(templates: &TemplatesFile) -> Result<Self, RenderError> {
        Ok(Self {
            engine: TemplateRenderer::escaped(templates)?,
        })
    }
}

impl ReportRenderer for HtmlRenderer {
    fn format(&self) -> RenderFormat {
        RenderFormat::Html
    }

    fn render(&self, report: &Report) -> Result<String, RenderError> {
        self.engine.render_report(HTML_TEMPLATE, report)
    }
}

pub struct MarkdownRenderer {
    engine: TemplateRenderer,
}

impl MarkdownRenderer {
    pub fn new(templates: &TemplatesFile) -> Result<Self, RenderError> {
        Ok(Self {
            engine: TemplateRenderer::verbatim(templates)?,
        })
    }
}

impl ReportRenderer for MarkdownRenderer {
    fn format(&self) -> RenderFormat {
        RenderFormat::Markdown
    }

    fn render(&self, report: &Report) -> Result<String, RenderError> {
        self.engine.render_report(MARKDOWN_TEMPLATE, report)
    }
}

pub struct TextRenderer {
    engine: TemplateRenderer,
}

impl TextRenderer {
    pub fn new(templates: &TemplatesFile) -> Result<Self, RenderError> {
        Ok(Self {
            engine: TemplateRenderer::verbatim(templates)?,
        })
    }
}

impl ReportRenderer for TextRenderer {
    fn format(&self) -> RenderFormat {
        RenderFormat::Text
    }

    fn render(&self, report: &Report) -> Result<String, RenderError> {
        self.engine.render_report(TEXT_TEMPLATE, report)
    }
}

#[derive(Debug, Default)]
pub struct JsonRenderer;

impl ReportRenderer for JsonRenderer {
    fn format(&self) -> RenderFormat {
        RenderFormat::Json
    }

    fn render(&self, report: &Report) -> Result<String, RenderError> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consol_core::{EmergencyReport, Guarantees, ReportBody, SessionId};
    use serde_json::json;

    fn test_templates() -> TemplatesFile {
        TemplatesFile::from_yaml(
            r#"
version: "1.0"
templates:
  quality:
    description: Score display
    template: "Qualidade: {{fixed1 score}}%"
  list:
    description: Numbered list
    template: "{{#each items}}{{inc @index}}. {{this}}\n{{/each}}"
  raw:
    description: Escaping probe
    template: "{{text}}"
"#,
        )
        .unwrap()
    }

    fn emergency() -> Report {
        Report::new(
            SessionId::new("abcdef123456"),
            ReportBody::Emergency(EmergencyReport {
                status: "ERRO_MAS_DADOS_PRESERVADOS".to_string(),
                erro_consolidacao: "<disk> failure".to_string(),
                garantias: Guarantees {
                    dados_perdidos: "NENHUM".to_string(),
                    arquivos_salvos: "SIM".to_string(),
                    recuperacao_possivel: "SIM".to_string(),
                    localizacao_dados: "relatorios_intermediarios/abcdef123456/".to_string(),
                },
                instrucoes_recuperacao: vec!["1. Acesse o diretório".to_string()],
                arquivos_disponiveis: vec![],
                valor_preservado: "ALTO".to_string(),
            }),
        )
    }

    #[test]
    fn test_fixed1_helper() {
        let renderer = TemplateRenderer::verbatim(&test_templates()).unwrap();
        let result = renderer.render("quality", &json!({ "score": 87.5 })).unwrap();
        assert_eq!(result, "Qualidade: 87.5%");
    }

    #[test]
    fn test_inc_helper() {
        let renderer = TemplateRenderer::verbatim(&test_templates()).unwrap();
        let result = renderer.render("list", &json!({ "items": ["a", "b"] })).unwrap();
        assert_eq!(result, "1. a\n2. b\n");
    }

    #[test]
    fn test_escaping_by_registry() {
        let data = json!({ "text": "<b>" });
        let escaped = TemplateRenderer::escaped(&test_templates()).unwrap();
        let verbatim = TemplateRenderer::verbatim(&test_templates()).unwrap();
        assert_eq!(escaped.render("raw", &data).unwrap(), "&lt;b&gt;");
        assert_eq!(verbatim.render("raw", &data).unwrap(), "<b>");
    }

    #[test]
    fn test_unknown_template() {
        let renderer = TemplateRenderer::verbatim(&test_templates()).unwrap();
        assert!(matches!(
            renderer.render("missing", &json!({})),
            Err(RenderError::Template(_))
        ));
    }

    #[test]
    fn test_emergency_renders_everywhere() {
        let templates = TemplatesFile::embedded().unwrap();
        let report = emergency();

        let html = HtmlRenderer::new(&templates).unwrap().render(&report).unwrap();
        assert!(html.contains("&lt;disk&gt; failure"));
        assert!(html.contains("relatorio_emergencia"));

        let md = MarkdownRenderer::new(&templates).unwrap().render(&report).unwrap();
        assert!(md.contains("# Relatório de Análise Ultra-Detalhada"));
        assert!(md.contains("- 1. Acesse o diretório"));
        assert!(md.contains("<disk> failure"));

        let text = TextRenderer::new(&templates).unwrap().render(&report).unwrap();
        assert!(text.contains("Status: ERRO_MAS_DADOS_PRESERVADOS"));
        assert!(text.contains("Localização: relatorios_intermediarios/abcdef123456/"));
        assert!(text.contains("Total: 0 arquivos"));

        let json_out = JsonRenderer.render(&report).unwrap();
        let parsed: Value = serde_json::from_str(&json_out).unwrap();
        assert_eq!(parsed["tipo"], "relatorio_emergencia");
    }
}
