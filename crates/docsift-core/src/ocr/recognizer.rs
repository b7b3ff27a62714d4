//! Recognition backends.
//!
//! The engine drives any [`TextRecognizer`]. The real backend wraps
//! Tesseract via `leptess` and is gated behind the `tesseract` feature so
//! the library builds and tests without a Tesseract install;
//! [`MockRecognizer`] serves the tests.

use std::collections::HashMap;

use super::RecognitionProfile;
use crate::error::OcrError;

/// Abstraction over an OCR backend.
///
/// Implementations accept PNG bytes of a normalized page and return the
/// recognized text for one profile. A failure affects only that profile;
/// the engine skips it and carries on.
pub trait TextRecognizer {
    fn recognize(&self, png: &[u8], profile: RecognitionProfile) -> Result<String, OcrError>;
}

// ── Mock backend (always available, used for tests) ──────────────────────

/// Returns pre-set text per profile, so engine selection and the extraction
/// pipeline can be tested without an OCR install.
#[derive(Debug, Default)]
pub struct MockRecognizer {
    responses: HashMap<RecognitionProfile, String>,
}

impl MockRecognizer {
    /// A recognizer that answers every profile with the same text.
    pub fn uniform(text: impl Into<String>) -> Self {
        let text = text.into();
        let responses = RecognitionProfile::DEFAULT_LADDER
            .iter()
            .map(|&p| (p, text.clone()))
            .collect();
        Self { responses }
    }

    /// Set the response for one profile. Profiles without a response fail.
    pub fn with_response(mut self, profile: RecognitionProfile, text: impl Into<String>) -> Self {
        self.responses.insert(profile, text.into());
        self
    }
}

impl TextRecognizer for MockRecognizer {
    fn recognize(&self, _png: &[u8], profile: RecognitionProfile) -> Result<String, OcrError> {
        self.responses
            .get(&profile)
            .cloned()
            .ok_or_else(|| OcrError::Recognition(format!("no mock response for {}", profile.name())))
    }
}

// ── Unavailable backend (builds without the `tesseract` feature) ─────────

/// Placeholder backend for builds without the `tesseract` feature. Every
/// call fails, which the engine surfaces as a skipped profile.
pub struct UnavailableRecognizer;

impl TextRecognizer for UnavailableRecognizer {
    fn recognize(&self, _png: &[u8], _profile: RecognitionProfile) -> Result<String, OcrError> {
        Err(OcrError::BackendUnavailable)
    }
}

// ── Tesseract backend (optional, gated behind `tesseract` feature) ───────

#[cfg(feature = "tesseract")]
pub use tesseract_backend::TesseractRecognizer;

#[cfg(feature = "tesseract")]
mod tesseract_backend {
    use leptess::LepTess;

    use super::TextRecognizer;
    use crate::error::OcrError;
    use crate::models::config::OcrConfig;
    use crate::ocr::RecognitionProfile;

    /// Tesseract-backed recognizer. Each call builds a fresh `LepTess`
    /// handle, so the backend holds no mutable state across profiles and
    /// engines with different languages can run side by side.
    pub struct TesseractRecognizer {
        datapath: Option<String>,
        language: String,
    }

    impl TesseractRecognizer {
        pub fn new(config: &OcrConfig) -> Self {
            Self {
                datapath: config
                    .tessdata_path
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
                language: config.language.clone(),
            }
        }
    }

    impl TextRecognizer for TesseractRecognizer {
        fn recognize(&self, png: &[u8], profile: RecognitionProfile) -> Result<String, OcrError> {
            let mut lt = LepTess::new(self.datapath.as_deref(), &self.language)
                .map_err(|e| OcrError::Recognition(e.to_string()))?;
            lt.set_variable(leptess::Variable::TesseditPagesegMode, profile.page_seg_mode())
                .map_err(|e| OcrError::Recognition(e.to_string()))?;
            lt.set_image_from_mem(png)
                .map_err(|e| OcrError::ImageDecode(e.to_string()))?;
            lt.get_utf8_text()
                .map_err(|e| OcrError::Recognition(e.to_string()))
        }
    }
}
