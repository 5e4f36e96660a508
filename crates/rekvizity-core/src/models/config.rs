//! Configuration structures for extraction and output.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{RekvizityError, Result};

/// Main configuration for rekvizity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RekvizityConfig {
    /// Extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output configuration (used by the CLI).
    pub output: OutputConfig,
}

/// Extraction engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Render phones as `+7 (XXX) XXX-XX-XX` instead of `+7XXXXXXXXXX`.
    pub format_phone: bool,

    /// Keep rejected candidates on accepted fields.
    pub keep_alternatives: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            format_phone: true,
            keep_alternatives: true,
        }
    }
}

/// Output format for extracted data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
    Text,
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format.
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            pretty: true,
        }
    }
}

impl RekvizityConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            RekvizityError::Config(format!("{}: {}", path.display(), e))
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
