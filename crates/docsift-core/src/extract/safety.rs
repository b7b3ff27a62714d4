//! Safety certificate field extraction.

use lazy_static::lazy_static;

use super::cascade::Cascade;
use super::dates::{SAFETY_DATE_FORMATS, parse_date};
use super::patterns::*;
use crate::models::record::SafetyRecord;

lazy_static! {
    static ref DOCUMENT_NUMBER: Cascade = Cascade::first(vec![
        &*CERTIFICATE_NUMBER,
        &*SAFETY_DOC_NUMBER,
        &*DOCUMENT_ID,
    ]);
    static ref ISSUE_DATE: Cascade =
        Cascade::first(vec![&*ISSUED_DATE_LABELED, &*DATE_LINE_NUMERIC]);
}

/// Extract a safety certificate record.
pub fn extract_safety(text: &str) -> SafetyRecord {
    let mut record = SafetyRecord::default();

    record.document_number = DOCUMENT_NUMBER.capture(text);

    // Expiry first; the generic date label is anchored to line starts so an
    // "Expiry Date:" line never doubles as the issue date.
    record.base.expiration_date = EXPIRY_DATE_LABELED
        .captures(text)
        .and_then(|c| parse_date(&c[1], SAFETY_DATE_FORMATS));
    record.base.issue_date = ISSUE_DATE
        .capture(text)
        .and_then(|s| parse_date(&s, SAFETY_DATE_FORMATS));

    record.base.issuing_authority = ISSUED_BY.captures(text).map(|c| c[1].trim().to_string());
    record.safety_category = CATEGORY_LABELED.captures(text).map(|c| c[1].trim().to_string());

    record.compliance_status = STATUS_LABELED.captures(text).map(|c| c[1].trim().to_string());
    record.base.status = record.compliance_status.clone();

    record.inspection_details = INSPECTION_BLOCK
        .captures(text)
        .map(|c| c[1].trim().to_string());

    record.safety_measures = extract_measures(text);

    record
}

/// Safety measures are bullet- or numbered-list lines; candidates shorter
/// than six characters are discarded as noise.
fn extract_measures(text: &str) -> Vec<String> {
    LIST_ITEM
        .captures_iter(text)
        .map(|c| c[1].trim().to_string())
        .filter(|measure| measure.len() > 5)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CERT: &str = "\
WORKPLACE SAFETY CERTIFICATE
Certificate No: WSC-2024-118
Date: 15/01/2024
Expiry: 15/01/2025
Issued By: National Safety Board
Category: Fire Safety
Status: Compliant
Inspection: Annual inspection of extinguishers and alarm panels
completed without findings.

Safety measures:
• Fire extinguishers serviced and tagged
• Emergency exits kept clear at all times
1. Alarm panel tested monthly
2. Ok
";

    #[test]
    fn certificate_fields_are_extracted() {
        let record = extract_safety(CERT);
        assert_eq!(record.document_number.as_deref(), Some("WSC-2024-118"));
        assert_eq!(record.base.issue_date.unwrap().to_string(), "2024-01-15");
        assert_eq!(record.base.expiration_date.unwrap().to_string(), "2025-01-15");
        assert_eq!(
            record.base.issuing_authority.as_deref(),
            Some("National Safety Board")
        );
        assert_eq!(record.safety_category.as_deref(), Some("Fire Safety"));
        assert_eq!(record.compliance_status.as_deref(), Some("Compliant"));
        assert_eq!(record.base.status.as_deref(), Some("Compliant"));
        assert!(record
            .inspection_details
            .as_deref()
            .unwrap()
            .starts_with("Annual inspection"));
    }

    #[test]
    fn short_list_entries_are_discarded_as_noise() {
        let record = extract_safety(CERT);
        assert_eq!(record.safety_measures.len(), 3);
        assert!(record.safety_measures.iter().all(|m| m.len() > 5));
        assert!(!record.safety_measures.iter().any(|m| m == "Ok"));
    }

    #[test]
    fn document_number_cascade_falls_through() {
        let record = extract_safety("Safety Doc: SD-77\nStatus: Pending");
        assert_eq!(record.document_number.as_deref(), Some("SD-77"));

        let record = extract_safety("Document ID: DOC-123");
        assert_eq!(record.document_number.as_deref(), Some("DOC-123"));
    }

    #[test]
    fn missing_fields_stay_unknown() {
        let record = extract_safety("nothing useful here");
        assert_eq!(record.document_number, None);
        assert_eq!(record.base.issue_date, None);
        assert!(record.safety_measures.is_empty());
    }
}
