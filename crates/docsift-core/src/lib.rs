//! Core library for scanned-document data capture.
//!
//! This crate turns scanned business documents (invoices, safety
//! certificates, insurance policies, personal IDs) into structured,
//! typed records:
//! - PDF rasterization with backend fallback
//! - Image normalization tuned for text recognition
//! - Multi-profile recognition with longest-yield selection
//! - Per-category field extraction via ordered pattern cascades
//! - JSON and flattened-CSV export

#![recursion_limit = "512"]

pub mod error;
pub mod export;
pub mod extract;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod pipeline;

pub use error::{DocsiftError, ExtractionError, OcrError, RasterError, Result};
pub use export::{CsvExport, ExportFormat, ExportPayload, export, to_csv, to_json};
pub use extract::{
    DocumentKind, extract_insurance, extract_invoice, extract_personal, extract_safety,
    extract_record, sniff_kind,
};
pub use models::config::{DocsiftConfig, ExtractionConfig, OcrConfig, PdfConfig};
pub use models::record::{
    DocumentRecord, InsuranceRecord, InvoiceRecord, LineItem, PersonalIdKind, PersonalRecord,
    RecordBase, SafetyRecord,
};
pub use ocr::{
    ImageNormalizer, MockRecognizer, RecognitionEngine, RecognitionProfile, RecognizedText,
    TextRecognizer, ThresholdStrategy, UnavailableRecognizer,
};
pub use pdf::{PageOrigin, PdfRasterizer, RawPage};
pub use pipeline::{DocumentPipeline, SUPPORTED_EXTENSIONS};

#[cfg(feature = "tesseract")]
pub use ocr::TesseractRecognizer;
