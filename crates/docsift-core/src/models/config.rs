//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::DocsiftError;
use crate::extract::DocumentKind;
use crate::ocr::RecognitionProfile;

/// Main configuration for the docsift pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsiftConfig {
    /// Recognition engine configuration.
    pub ocr: OcrConfig,

    /// PDF rasterization configuration.
    pub pdf: PdfConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,
}

impl Default for DocsiftConfig {
    fn default() -> Self {
        Self {
            ocr: OcrConfig::default(),
            pdf: PdfConfig::default(),
            extraction: ExtractionConfig::default(),
        }
    }
}

/// Recognition engine configuration.
///
/// Passed by value into the engine at construction; there is no
/// process-global OCR state, so engines with different languages can
/// coexist in one process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory holding the recognizer's language data (tessdata).
    /// `None` uses the backend's compiled-in default.
    pub tessdata_path: Option<PathBuf>,

    /// Recognition language code.
    pub language: String,

    /// Page-segmentation profiles to try, in order.
    pub profiles: Vec<RecognitionProfile>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tessdata_path: None,
            language: "eng".to_string(),
            profiles: RecognitionProfile::DEFAULT_LADDER.to_vec(),
        }
    }
}

/// PDF rasterization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// DPI for rendering PDF pages to bitmaps. 300 keeps small print legible.
    pub render_dpi: u32,

    /// Maximum pages to rasterize from one document.
    pub max_pages: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            render_dpi: 300,
            max_pages: 10,
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Category used when no hint is given and keyword sniffing is
    /// inconclusive.
    pub default_category: DocumentKind,

    /// Fraction of the page height treated as the letterhead region when
    /// recovering an issuer name the full-page pass missed.
    pub letterhead_fraction: f32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            default_category: DocumentKind::Invoice,
            letterhead_fraction: 0.25,
        }
    }
}

impl DocsiftConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, DocsiftError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| DocsiftError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), DocsiftError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| DocsiftError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profiles_cover_the_full_ladder() {
        let config = OcrConfig::default();
        assert_eq!(config.profiles.len(), 4);
        assert_eq!(config.language, "eng");
    }

    #[test]
    fn config_json_round_trip() {
        let config = DocsiftConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: DocsiftConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.pdf.render_dpi, config.pdf.render_dpi);
        assert_eq!(parsed.extraction.default_category, DocumentKind::Invoice);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let parsed: DocsiftConfig = serde_json::from_str(r#"{"pdf":{"render_dpi":150}}"#).unwrap();
        assert_eq!(parsed.pdf.render_dpi, 150);
        assert_eq!(parsed.ocr.language, "eng");
    }
}
