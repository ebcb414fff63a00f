//! Configuration structures for the reconciliation pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::parse::patterns::{
    DEFAULT_LINE_ITEM_PATTERN, DEFAULT_TOTAL_PATTERN, DEFAULT_VENDOR_PATTERN,
};

/// Main configuration for the recondoc pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecondocConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Field extraction pattern overrides.
    pub patterns: PatternConfig,
}

impl Default for RecondocConfig {
    fn default() -> Self {
        Self {
            pdf: PdfConfig::default(),
            ocr: OcrConfig::default(),
            patterns: PatternConfig::default(),
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to visit during the OCR fallback (0 = unlimited).
    /// The embedded-text pass always covers the whole document; this cap
    /// bounds the expensive rasterized pass on pathological inputs.
    pub max_pages: usize,

    /// Minimum non-whitespace characters for the embedded-text pass to be
    /// considered successful. Below this, extraction falls back to OCR.
    pub min_text_chars: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            min_text_chars: 1,
        }
    }
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
        }
    }
}

impl OcrConfig {
    /// Path to the detection model file.
    pub fn detection_path(&self) -> PathBuf {
        self.model_dir.join(&self.detection_model)
    }
}

/// Field extraction patterns.
///
/// Regex-based parsing is fragile to PDF layout variance, so the pattern set
/// is configuration data rather than code: each entry can be overridden and
/// tested independently of the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Vendor label pattern; capture group 1 is the vendor name.
    pub vendor: String,

    /// Total label pattern; capture group 1 is the numeric amount.
    pub total: String,

    /// Line item pattern; capture groups are quantity, name, unit price.
    pub line_item: String,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            vendor: DEFAULT_VENDOR_PATTERN.to_string(),
            total: DEFAULT_TOTAL_PATTERN.to_string(),
            line_item: DEFAULT_LINE_ITEM_PATTERN.to_string(),
        }
    }
}

impl RecondocConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config =
            serde_json::from_str(&content).map_err(|e| ConfigError::Format(e.to_string()))?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> crate::error::Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Format(e.to_string()))?;
        std::fs::write(path, content).map_err(ConfigError::Io)?;
        Ok(())
    }
}
