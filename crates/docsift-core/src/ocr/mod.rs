//! Image normalization and multi-profile text recognition.

mod engine;
mod normalize;
mod recognizer;

pub use engine::RecognitionEngine;
pub use normalize::{ImageNormalizer, ThresholdStrategy, encode_png};
pub use recognizer::{MockRecognizer, TextRecognizer, UnavailableRecognizer};

#[cfg(feature = "tesseract")]
pub use recognizer::TesseractRecognizer;

use serde::{Deserialize, Serialize};

/// A fixed configuration under which the recognizer is run once.
///
/// Profiles differ in their page-segmentation assumption; the engine tries
/// each one and keeps the output with the greatest character yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognitionProfile {
    /// A single uniform block of text.
    UniformBlock,
    /// Fully automatic page segmentation.
    FullAuto,
    /// A single column of text of variable sizes.
    SingleColumn,
    /// Sparse text in no particular order.
    SparseText,
}

impl RecognitionProfile {
    /// The default profile ladder, tried in order.
    pub const DEFAULT_LADDER: [RecognitionProfile; 4] = [
        RecognitionProfile::UniformBlock,
        RecognitionProfile::FullAuto,
        RecognitionProfile::SingleColumn,
        RecognitionProfile::SparseText,
    ];

    /// Tesseract page-segmentation mode for this profile.
    pub fn page_seg_mode(self) -> &'static str {
        match self {
            RecognitionProfile::UniformBlock => "6",
            RecognitionProfile::FullAuto => "3",
            RecognitionProfile::SingleColumn => "4",
            RecognitionProfile::SparseText => "11",
        }
    }

    /// Short name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            RecognitionProfile::UniformBlock => "uniform_block",
            RecognitionProfile::FullAuto => "full_auto",
            RecognitionProfile::SingleColumn => "single_column",
            RecognitionProfile::SparseText => "sparse_text",
        }
    }
}

/// The surviving output of a multi-profile recognition run.
#[derive(Debug, Clone)]
pub struct RecognizedText {
    /// Recognized text.
    pub text: String,

    /// Profile whose output won the selection.
    pub profile: RecognitionProfile,

    /// Character count, the selection score. Longer output is treated as a
    /// proxy for more complete recognition; it is not a confidence score.
    pub score: usize,
}
