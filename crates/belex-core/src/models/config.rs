//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{BelexError, Result};
use crate::extract::MAX_LINE_ITEMS;
use crate::upload::{DEFAULT_MAX_SIZE_BYTES, PDF_MIME};

/// Main configuration for the belex pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BelexConfig {
    /// Upload boundary limits.
    pub upload: UploadConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output rendering configuration.
    pub output: OutputConfig,
}

/// Limits enforced before a document reaches the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Maximum document size in bytes.
    pub max_size_bytes: u64,

    /// Accepted MIME types, detected from the file content.
    pub allowed_mime_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            allowed_mime_types: vec![PDF_MIME.to_string()],
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum number of line items kept per document (capped at 30).
    pub max_line_items: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_line_items: MAX_LINE_ITEMS,
        }
    }
}

/// Output rendering configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty: bool,

    /// Keep the raw document text in JSON output.
    pub include_raw_text: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            include_raw_text: true,
        }
    }
}

impl BelexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| BelexError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| BelexError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = BelexConfig::default();
        assert_eq!(config.upload.max_size_bytes, 10 * 1024 * 1024);
        assert_eq!(config.upload.allowed_mime_types, vec!["application/pdf"]);
        assert_eq!(config.extraction.max_line_items, 30);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: BelexConfig =
            serde_json::from_str(r#"{ "extraction": { "max_line_items": 5 } }"#).unwrap();
        assert_eq!(config.extraction.max_line_items, 5);
        assert_eq!(config.upload, UploadConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = BelexConfig::default();
        config.output.include_raw_text = false;
        config.save(&path).unwrap();

        assert_eq!(BelexConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            BelexConfig::from_file(&path),
            Err(BelexError::Config(_))
        ));
    }
}
