//! Output formats a report can be rendered to.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConsolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    Html,
    Markdown,
    Json,
    /// Plain-text summary.
    #[serde(rename = "minimal")]
    Text,
}

impl RenderFormat {
    pub const ALL: [RenderFormat; 4] = [
        RenderFormat::Html,
        RenderFormat::Markdown,
        RenderFormat::Json,
        RenderFormat::Text,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RenderFormat::Html => "html",
            RenderFormat::Markdown => "markdown",
            RenderFormat::Json => "json",
            RenderFormat::Text => "minimal",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            RenderFormat::Html => "html",
            RenderFormat::Markdown => "md",
            RenderFormat::Json => "json",
            RenderFormat::Text => "txt",
        }
    }
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderFormat {
    type Err = ConsolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(RenderFormat::Html),
            "markdown" | "md" => Ok(RenderFormat::Markdown),
            "json" => Ok(RenderFormat::Json),
            "minimal" | "text" | "txt" => Ok(RenderFormat::Text),
            other => Err(ConsolError::Config(format!("unknown render format '{}'", other))),
        }
    }
}
