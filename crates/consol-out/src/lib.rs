//! Consol Out: multi-format report rendering
//!
//! Turns a consolidated report into HTML, Markdown, JSON and plain-text
//! files, one independent renderer per format.
//!
//! # Example
//!
//! ```ignore
//! use consol_out::MultiFormatRenderer;
//!
//! let renderer = MultiFormatRenderer::new("relatorios_finais")?;
//! for (format, path) in renderer.render_all(&report) {
//!     println!("{}: {}", format, path.display());
//! }
//! ```

pub mod output;
pub mod renderer;
pub mod stats;
pub mod templates;
pub mod view;

pub use output::{MultiFormatRenderer, OutputSettings};
pub use renderer::{
    HtmlRenderer, JsonRenderer, MarkdownRenderer, ReportRenderer, TemplateRenderer, TextRenderer,
};
pub use stats::{ContentDensity, ReportStatistics};
pub use templates::TemplatesFile;
pub use view::ReportView;

use thiserror::Error;

/// Errors that can occur during rendering
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template load failed: {0}")]
    Template(String),
    #[error("Render failed: {0}")]
    Render(String),
    #[error("Serialize failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Write failed: {0}")]
    Write(#[from] std::io::Error),
}
