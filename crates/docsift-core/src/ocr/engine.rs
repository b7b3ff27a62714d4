//! Multi-profile recognition engine.

use image::GrayImage;
use tracing::{debug, warn};

use super::normalize::encode_png;
use super::recognizer::TextRecognizer;
use super::{RecognitionProfile, RecognizedText};
use crate::error::OcrError;

/// Runs the recognizer under several page-segmentation profiles and keeps
/// the output with the greatest character yield.
///
/// Each profile run is independent: a failed profile is logged and skipped,
/// never aborting the others. The engine knows nothing about the eventual
/// document category.
pub struct RecognitionEngine {
    recognizer: Box<dyn TextRecognizer + Send + Sync>,
    profiles: Vec<RecognitionProfile>,
}

impl RecognitionEngine {
    /// Create an engine with the default profile ladder.
    pub fn new(recognizer: Box<dyn TextRecognizer + Send + Sync>) -> Self {
        Self {
            recognizer,
            profiles: RecognitionProfile::DEFAULT_LADDER.to_vec(),
        }
    }

    /// Replace the profile ladder. An empty list falls back to the default.
    pub fn with_profiles(mut self, profiles: Vec<RecognitionProfile>) -> Self {
        if !profiles.is_empty() {
            self.profiles = profiles;
        }
        self
    }

    /// Recognize text on a normalized bitmap.
    ///
    /// Returns the best-scoring non-whitespace output, or
    /// [`OcrError::NoTextRecognized`] when every profile fails or yields
    /// only whitespace.
    pub fn recognize(&self, image: &GrayImage) -> Result<RecognizedText, OcrError> {
        let png = encode_png(image)?;
        let mut best: Option<RecognizedText> = None;

        for &profile in &self.profiles {
            match self.recognizer.recognize(&png, profile) {
                Ok(text) => {
                    if text.trim().is_empty() {
                        debug!(profile = profile.name(), "profile yielded only whitespace");
                        continue;
                    }
                    let score = text.chars().count();
                    debug!(profile = profile.name(), score, "profile completed");
                    if best.as_ref().is_none_or(|b| score > b.score) {
                        best = Some(RecognizedText { text, profile, score });
                    }
                }
                Err(e) => {
                    warn!(profile = profile.name(), error = %e, "profile failed, skipping");
                }
            }
        }

        best.ok_or(OcrError::NoTextRecognized)
    }
}
