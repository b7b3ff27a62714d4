//! Error types for the docsift-core library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the docsift library.
#[derive(Error, Debug)]
pub enum DocsiftError {
    /// The input file has an extension the pipeline does not handle.
    #[error("unsupported file type: .{0}")]
    UnsupportedFileType(String),

    /// The input file contains zero bytes.
    #[error("input file is empty: {}", .0.display())]
    EmptyInput(PathBuf),

    /// PDF rasterization error.
    #[error("rasterization error: {0}")]
    Raster(#[from] RasterError),

    /// Text recognition error.
    #[error("recognition error: {0}")]
    Ocr(#[from] OcrError),

    /// Field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Record serialization error.
    #[error("export error: {0}")]
    Export(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to turning a PDF into page bitmaps.
#[derive(Error, Debug)]
pub enum RasterError {
    /// The file is not a readable PDF or has no pages.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// Every rendering backend was tried and failed; carries the last error.
    #[error("all rasterization backends failed: {0}")]
    RasterizationFailed(String),
}

/// Errors related to image normalization and text recognition.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The input image could not be decoded, or decoded to nothing.
    #[error("image decode error: {0}")]
    ImageDecode(String),

    /// The normalized bitmap could not be re-encoded for the recognizer.
    #[error("image encode error: {0}")]
    ImageEncode(String),

    /// A recognizer run failed.
    #[error("recognizer error: {0}")]
    Recognition(String),

    /// The crate was built without a real OCR backend.
    #[error("no OCR backend available - rebuild with the `tesseract` feature")]
    BackendUnavailable,

    /// Every recognition profile failed or produced only whitespace.
    #[error("no text recognized by any profile")]
    NoTextRecognized,
}

/// Errors related to field extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The recognized text was empty; there is nothing to extract from.
    #[error("input text is empty")]
    EmptyInput,
}

/// Result type for the docsift library.
pub type Result<T> = std::result::Result<T, DocsiftError>;
