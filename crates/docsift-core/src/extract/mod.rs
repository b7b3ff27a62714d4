//! Per-category field extraction.
//!
//! Raw recognized text goes in; a fully-shaped [`DocumentRecord`] comes
//! out. Every category extractor is best-effort per field: an unmatched or
//! unconvertible field stays at its unknown sentinel, and only empty input
//! text is an error.

pub mod amounts;
pub mod cascade;
pub mod dates;
pub mod patterns;

mod insurance;
mod invoice;
mod personal;
mod safety;

pub use insurance::extract_insurance;
pub use invoice::extract_invoice;
pub use personal::extract_personal;
pub use safety::extract_safety;

use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;
use crate::models::record::DocumentRecord;
use patterns::{SNIFF_INSURANCE, SNIFF_INVOICE, SNIFF_PERSONAL, SNIFF_SAFETY};

/// Document category handled by the extraction pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Invoice,
    Safety,
    Insurance,
    Personal,
}

impl DocumentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::Invoice => "invoice",
            DocumentKind::Safety => "safety",
            DocumentKind::Insurance => "insurance",
            DocumentKind::Personal => "personal",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lightweight keyword sniffing used when no category hint is supplied.
/// The most distinctive vocabularies are checked first; `None` means the
/// caller's default category applies.
pub fn sniff_kind(text: &str) -> Option<DocumentKind> {
    if SNIFF_PERSONAL.is_match(text) {
        Some(DocumentKind::Personal)
    } else if SNIFF_INSURANCE.is_match(text) {
        Some(DocumentKind::Insurance)
    } else if SNIFF_SAFETY.is_match(text) {
        Some(DocumentKind::Safety)
    } else if SNIFF_INVOICE.is_match(text) {
        Some(DocumentKind::Invoice)
    } else {
        None
    }
}

/// Run the category extractor for `kind` over `text`.
///
/// Fails only on empty input; otherwise always returns a fully-shaped
/// record with unmatched fields at their unknown sentinel.
pub fn extract_record(text: &str, kind: DocumentKind) -> Result<DocumentRecord, ExtractionError> {
    if text.trim().is_empty() {
        return Err(ExtractionError::EmptyInput);
    }

    Ok(match kind {
        DocumentKind::Invoice => DocumentRecord::Invoice(extract_invoice(text)),
        DocumentKind::Safety => DocumentRecord::Safety(extract_safety(text)),
        DocumentKind::Insurance => DocumentRecord::Insurance(extract_insurance(text)),
        DocumentKind::Personal => DocumentRecord::Personal(extract_personal(text, None)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sniffing_picks_the_most_distinctive_category() {
        assert_eq!(
            sniff_kind("UNITED STATES PASSPORT\nPassport No: 1"),
            Some(DocumentKind::Personal)
        );
        assert_eq!(
            sniff_kind("Policy Number: P-9\nPremium: 10.00"),
            Some(DocumentKind::Insurance)
        );
        assert_eq!(
            sniff_kind("Safety Certificate\nInspection passed"),
            Some(DocumentKind::Safety)
        );
        assert_eq!(
            sniff_kind("Invoice #: 12\nSubtotal: 4.00"),
            Some(DocumentKind::Invoice)
        );
    }

    #[test]
    fn inconclusive_sniffing_returns_none() {
        assert_eq!(sniff_kind("quarterly performance review"), None);
    }

    #[test]
    fn empty_input_is_the_only_extraction_error() {
        assert!(matches!(
            extract_record("", DocumentKind::Invoice),
            Err(ExtractionError::EmptyInput)
        ));
        assert!(matches!(
            extract_record("   \n\t ", DocumentKind::Safety),
            Err(ExtractionError::EmptyInput)
        ));
        // Arbitrary non-empty text always yields a record.
        assert!(extract_record("gibberish", DocumentKind::Personal).is_ok());
    }

    #[test]
    fn dispatch_returns_the_requested_variant() {
        let record = extract_record("Total: 12.00", DocumentKind::Invoice).unwrap();
        assert_eq!(record.kind(), DocumentKind::Invoice);

        let record = extract_record("Total: 12.00", DocumentKind::Insurance).unwrap();
        assert_eq!(record.kind(), DocumentKind::Insurance);
    }
}
