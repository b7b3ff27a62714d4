//! Regex patterns for document field extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// Date-shaped token: numeric day/month/year forms plus "Month D, YYYY"
/// and "D Month YYYY".
pub const DATE_TOKEN: &str = r"\d{1,2}[-/]\d{1,2}[-/]\d{2,4}|\d{4}[-/]\d{1,2}[-/]\d{1,2}|[A-Za-z]{3,9}\.?\s+\d{1,2},?\s+\d{4}|\d{1,2}\s+[A-Za-z]{3,9}\.?\s+\d{4}";

/// Numeric-only date token used by categories whose accepted formats are
/// all numeric.
pub const NUM_DATE_TOKEN: &str = r"\d{1,2}[-/]\d{1,2}[-/]\d{2,4}|\d{4}[-/]\d{1,2}[-/]\d{1,2}";

fn date_re(label: &str, token: &str) -> Regex {
    Regex::new(&format!(r"(?i){label}\s*[:.]?\s*({token})")).unwrap()
}

lazy_static! {
    // ── invoice ──────────────────────────────────────────────────────────

    // Captured invoice numbers must carry a digit, so a label like
    // "Invoice Date" never yields "Date" as the number.
    pub static ref INVOICE_NUMBER_LABELED: Regex = Regex::new(
        r"(?i)\bInvoice\s*(?:No\.?|Number|#)\s*[:.]?\s*([A-Z0-9][A-Z0-9-]*)"
    ).unwrap();
    pub static ref INVOICE_NUMBER_BARE: Regex = Regex::new(
        r"(?i)\bInvoice\b\s*[:#.]?\s*([A-Z-]*\d[A-Z0-9-]*)"
    ).unwrap();
    pub static ref DOCUMENT_NUMBER_LABELED: Regex = Regex::new(
        r"(?i)\b(?:Bill|Receipt|Document)\s*(?:No\.?|Number|ID|#)\s*[:.]?\s*([A-Z0-9-]+)"
    ).unwrap();
    pub static ref NUMBER_SHORTHAND: Regex = Regex::new(
        r"(?i)\bNo[.:]\s*([A-Z-]*\d[A-Z0-9-]*)"
    ).unwrap();

    pub static ref INVOICE_ISSUE_DATE_LABELED: Regex =
        date_re(r"\b(?:Invoice|Issue)\s+Date", DATE_TOKEN);
    // Anchored to line start so "Due Date:" lines never feed the issue date.
    pub static ref INVOICE_DATE_LINE: Regex = Regex::new(&format!(
        r"(?im)^\s*Date\s*[:.]?\s*({DATE_TOKEN})"
    )).unwrap();
    pub static ref INVOICE_DUE_DATE: Regex =
        date_re(r"\b(?:Due\s*Date|Payment\s+Due)", DATE_TOKEN);
    pub static ref INVOICE_EXPIRATION: Regex =
        date_re(r"\b(?:Expiration\s*Date|Valid\s+Until)", DATE_TOKEN);

    pub static ref PO_NUMBER: Regex = Regex::new(
        r"(?i)\b(?:Purchase\s+Order|P\.?O\.?)\s*(?:No\.?|Number|#)?\s*[:.]?\s*([A-Z-]*\d[A-Z0-9-]*)"
    ).unwrap();
    pub static ref PAYMENT_TERMS_LABELED: Regex = Regex::new(
        r"(?i)\bPayment\s+Terms\s*[:.]?\s*([^\n]+)"
    ).unwrap();
    pub static ref TERMS_LINE: Regex = Regex::new(
        r"(?im)^\s*Terms\s*[:.]?\s*([^.\n]+)"
    ).unwrap();

    pub static ref TOTAL_AMOUNT: Regex = Regex::new(
        r"(?i)\b(?:total|amount|sum)\b[^0-9\n]*?([\d,]+(?:\.\d+)?)"
    ).unwrap();
    pub static ref SUBTOTAL_AMOUNT: Regex = Regex::new(
        r"(?i)\b(?:sub\s*total|net\s+(?:total|amount))\b[^0-9\n]*?([\d,]+(?:\.\d+)?)"
    ).unwrap();
    // Rate-parenthesized form first: "Tax (21%): 21.00" must not yield 21.
    pub static ref TAX_AFTER_RATE: Regex = Regex::new(
        r"(?i)\b(?:tax|vat|gst)\b[^)\n]*\)[^0-9\n]*?([\d,]+(?:\.\d+)?)"
    ).unwrap();
    pub static ref TAX_LABELED: Regex = Regex::new(
        r"(?i)\b(?:tax|vat|gst)\b[^0-9\n]*?([\d,]+(?:\.\d+)?)"
    ).unwrap();

    pub static ref CURRENCY_SYMBOL: Regex = Regex::new(
        r"([$€£])\s*[\d,]+(?:\.\d+)?"
    ).unwrap();

    pub static ref BILL_TO_BLOCK: Regex = Regex::new(
        r"(?i)\b(?:Bill|Sold)\s*To\s*[:.]?\s*([^\n]+(?:\n[^\n]+)*)"
    ).unwrap();
    pub static ref SEND_TO_BLOCK: Regex = Regex::new(
        r"(?i)\b(?:Send|Ship)\s*To\s*[:.]?\s*([^\n]+(?:\n[^\n]+)*)"
    ).unwrap();
    pub static ref ADDRESS_LABEL_PREFIX: Regex = Regex::new(
        r"(?i)^(?:Bill\s+To|Send\s+To|Ship\s+To|Sold\s+To)[:.]?\s*"
    ).unwrap();
    // Keywords that mark the start of the next section after an address.
    pub static ref ADDRESS_SECTION_BREAK: Regex = Regex::new(
        r"(?i)\b(?:Invoice|Date|Total)\b|P\.O\."
    ).unwrap();

    pub static ref ITEM_LINE: Regex = Regex::new(
        r"^(.*?)\s+(\d+)\s+\$?([\d,]+(?:\.\d+)?)\s+\$?([\d,]+(?:\.\d+)?)$"
    ).unwrap();

    pub static ref NOTES_LINE: Regex = Regex::new(
        r"(?i)\bNotes?\s*[:.]?\s*([^\n]+)"
    ).unwrap();

    pub static ref VENDOR_LABELED: Regex = Regex::new(
        r"(?i)\b(?:Vendor|Seller|Supplier|Company)(?:\s+Name)?\s*[:.]?\s*([^\n]+)"
    ).unwrap();
    pub static ref ALL_CAPS_LINE: Regex = Regex::new(
        r"(?m)^\s*([A-Z][A-Z\s&.,'-]{2,})\s*$"
    ).unwrap();
    pub static ref SUPPLIER_STOPWORDS: Regex = Regex::new(
        r"(?i)\b(?:invoice|bill|ship|sold|total|subtotal|date|notes?|terms)\b"
    ).unwrap();

    // ── safety ───────────────────────────────────────────────────────────

    pub static ref CERTIFICATE_NUMBER: Regex = Regex::new(
        r"(?i)\bCertificate\s*(?:No|Number)\.?\s*[:.]?\s*([A-Z0-9-]+)"
    ).unwrap();
    pub static ref SAFETY_DOC_NUMBER: Regex = Regex::new(
        r"(?i)\bSafety\s*Doc(?:ument)?\.?\s*[:.]?\s*([A-Z0-9-]+)"
    ).unwrap();
    pub static ref DOCUMENT_ID: Regex = Regex::new(
        r"(?i)\bDocument\s*ID\s*[:.]?\s*([A-Z0-9-]+)"
    ).unwrap();

    pub static ref ISSUED_DATE_LABELED: Regex =
        date_re(r"\b(?:Issued|Issue\s+Date|Date\s+of\s+Issue)", NUM_DATE_TOKEN);
    pub static ref DATE_LINE_NUMERIC: Regex = Regex::new(&format!(
        r"(?im)^\s*Date\s*[:.]?\s*({NUM_DATE_TOKEN})"
    )).unwrap();
    pub static ref EXPIRY_DATE_LABELED: Regex =
        date_re(r"\b(?:Expiry|Expiration|Valid\s+Until)\s*(?:Date)?", NUM_DATE_TOKEN);

    pub static ref ISSUED_BY: Regex = Regex::new(
        r"(?i)\b(?:Issued\s+By|Certifier)\s*[:.]?\s*([^\n]+)"
    ).unwrap();
    pub static ref CATEGORY_LABELED: Regex = Regex::new(
        r"(?i)\b(?:Category|Type)\s*[:.]?\s*([^\n]+)"
    ).unwrap();
    pub static ref STATUS_LABELED: Regex = Regex::new(
        r"(?i)\b(?:Status|Compliance)\s*[:.]?\s*([^\n]+)"
    ).unwrap();
    pub static ref INSPECTION_BLOCK: Regex = Regex::new(
        r"(?i)\b(?:Inspection|Assessment)\s*[:.]?\s*([^\n]+(?:\n[^\n]+)*)"
    ).unwrap();
    pub static ref LIST_ITEM: Regex = Regex::new(
        r"(?m)^\s*(?:•|\d+\.)\s*([^\n]+)"
    ).unwrap();

    // ── insurance ────────────────────────────────────────────────────────

    pub static ref POLICY_NUMBER: Regex = Regex::new(
        r"(?i)\bPolicy\s*(?:No|Number)\.?\s*[:.]?\s*([A-Z0-9-]+)"
    ).unwrap();
    pub static ref INSURANCE_ID: Regex = Regex::new(
        r"(?i)\bInsurance\s*ID\s*[:.]?\s*([A-Z0-9-]+)"
    ).unwrap();

    pub static ref INSURER_LABELED: Regex = Regex::new(
        r"(?i)\b(?:Insurer|Insurance\s+Company)\s*[:.]?\s*([^\n]+)"
    ).unwrap();
    // Anchored to line start so "Sum Insured: 500,000" never names a party.
    pub static ref INSURED_LINE: Regex = Regex::new(
        r"(?im)^\s*(?:Insured|Policy\s*Holder)\s*[:.]?\s*([^\n]+)"
    ).unwrap();
    pub static ref COVERAGE_TYPE_LABELED: Regex = Regex::new(
        r"(?i)\b(?:Coverage|Insurance)\s+Type\s*[:.]?\s*([^\n]+)"
    ).unwrap();
    // Mandatory separator keeps "Coverage Amount" out of the type field.
    pub static ref COVERAGE_BARE: Regex = Regex::new(
        r"(?i)\bCoverage\s*[:.]\s*([^\n]+)"
    ).unwrap();

    pub static ref START_DATE_LABELED: Regex =
        date_re(r"\b(?:Start\s+Date|Effective\s+(?:From|Date))", NUM_DATE_TOKEN);
    pub static ref END_DATE_LABELED: Regex =
        date_re(r"\b(?:End\s+Date|Valid\s+Until|Expiry)", NUM_DATE_TOKEN);

    pub static ref PREMIUM_AMOUNT: Regex = Regex::new(
        r"(?i)\bPremium\s*[:.]?\s*[$€£]?\s*([\d,]+(?:\.\d+)?)"
    ).unwrap();
    pub static ref COVERAGE_AMOUNT: Regex = Regex::new(
        r"(?i)\b(?:Coverage\s+Amount|Sum\s+Insured)\s*[:.]?\s*[$€£]?\s*([\d,]+(?:\.\d+)?)"
    ).unwrap();

    pub static ref BENEFICIARIES_BLOCK: Regex = Regex::new(
        r"(?is)\bBeneficiaries\s*:\s*(.*?)(?:\n\s*\n|\z)"
    ).unwrap();
    pub static ref TERMS_BLOCK: Regex = Regex::new(
        r"(?is)\b(?:Terms\s+and\s+Conditions|Terms|Conditions)\s*:\s*(.*?)(?:\n\s*\n|\z)"
    ).unwrap();
    pub static ref ENUMERATED_ITEM: Regex = Regex::new(
        r"(?m)^\s*[\d.\-*•)]+\s*([^\n]+)"
    ).unwrap();

    // ── personal identification ──────────────────────────────────────────

    pub static ref PASSPORT_KEYWORD: Regex = Regex::new(r"(?i)\bpassport\b").unwrap();
    pub static ref DRIVER_LICENSE_KEYWORD: Regex =
        Regex::new(r"(?i)driver'?s?\s*licen[cs]e").unwrap();
    pub static ref STATE_ID_KEYWORD: Regex =
        Regex::new(r"(?i)identification\s*card|\bID\s*card\b").unwrap();

    pub static ref PASSPORT_NUMBER: Regex = Regex::new(
        r"(?i)\bPassport\s*(?:No|Number)\.?\s*[:.]?\s*([A-Z0-9]+)"
    ).unwrap();
    pub static ref LICENSE_NUMBER: Regex = Regex::new(
        r"(?i)\b(?:DL|Licen[cs]e)\s*(?:No|Number|#)\.?\s*[:.]?\s*([A-Z0-9-]+)"
    ).unwrap();
    pub static ref STATE_ID_NUMBER: Regex = Regex::new(
        r"(?i)\bID\s*(?:No|Number|#)\.?\s*[:.]?\s*([A-Z0-9-]+)"
    ).unwrap();

    pub static ref LAST_NAME_LABELED: Regex = Regex::new(
        r"(?i)\b(?:Last|Family|Sur)[-\s]?name\s*[:.]?\s*([^\n,]+)"
    ).unwrap();
    pub static ref FIRST_NAME_LABELED: Regex = Regex::new(
        r"(?i)\b(?:First|Given)[-\s]?name\s*[:.]?\s*([^\n,]+)"
    ).unwrap();
    // "SURNAME, GIVEN [MIDDLE]" on a line of its own.
    pub static ref NAME_COMMA_LINE: Regex = Regex::new(
        r"(?m)^\s*([A-Z]{2,}),\s+([A-Z]{2,})(?:\s+([A-Z]{2,}))?\s*$"
    ).unwrap();

    pub static ref DATE_OF_BIRTH: Regex =
        date_re(r"\b(?:Date\s+of\s+Birth|Birth\s+Date|DOB)", DATE_TOKEN);
    pub static ref ID_ISSUE_DATE: Regex =
        date_re(r"\b(?:Issue|Issued)\s*(?:Date|On)?", DATE_TOKEN);
    pub static ref ID_EXPIRATION_DATE: Regex =
        date_re(r"\b(?:Expiration|Expiry|Expires|EXP)\b\s*(?:Date)?", DATE_TOKEN);

    pub static ref ISSUING_AUTHORITY: Regex = Regex::new(
        r"(?i)\b(?:Issued\s+By|Issuing\s+Authority)\s*[:.]?\s*([^\n]+)"
    ).unwrap();
    pub static ref NATIONALITY: Regex = Regex::new(
        r"(?i)\bNationality\s*[:.]?\s*([^\n]+)"
    ).unwrap();
    pub static ref GENDER: Regex = Regex::new(
        r"(?i)\b(?:Gender|Sex)\s*[:.]?\s*(M|F|Male|Female)\b"
    ).unwrap();
    pub static ref ADDRESS_BLOCK: Regex = Regex::new(
        r"(?i)\b(?:Address|ADD)\s*[:.]\s*([^\n]+(?:\n[^\n]+)*)"
    ).unwrap();
    // Labels that end a multi-line address capture on ID cards.
    pub static ref ID_LABEL_LINE: Regex = Regex::new(
        r"(?i)^\s*(?:HGT|WGT|EYES?|HAIR|REST|END|EXP|DOB|SEX|CLASS|ISS)\b"
    ).unwrap();
    pub static ref HEIGHT: Regex = Regex::new(
        r#"(?i)\bHGT\s*[:.]?\s*(\d{1,2}'?\s*\d{1,2}"?|\d{3}\s*cm)"#
    ).unwrap();
    pub static ref EYE_COLOR: Regex = Regex::new(
        r"(?i)\b(?:Eyes|Eye\s+Color)\s*[:.]?\s*([A-Za-z]{3,})"
    ).unwrap();
    // Mandatory separator: "REST" and "END" are prefixes of ordinary words.
    pub static ref RESTRICTIONS_LINE: Regex = Regex::new(
        r"(?i)\bREST\s*[:.]\s*([^\n]+)"
    ).unwrap();
    pub static ref ENDORSEMENTS_LINE: Regex = Regex::new(
        r"(?i)\bEND\s*[:.]\s*([^\n]+)"
    ).unwrap();

    // ── category sniffing ────────────────────────────────────────────────

    pub static ref SNIFF_PERSONAL: Regex = Regex::new(
        r"(?i)\bpassport\b|driver'?s?\s*licen[cs]e|identification\s*card|\bID\s*card\b"
    ).unwrap();
    pub static ref SNIFF_INSURANCE: Regex = Regex::new(
        r"(?i)\bpolicy\s*(?:number|no)\b|\binsurer\b|\binsured\b|\bpremium\b|\bbeneficiar"
    ).unwrap();
    pub static ref SNIFF_SAFETY: Regex = Regex::new(
        r"(?i)\bsafety\b|\bcompliance\b|\binspection\b|\bcertificate\b"
    ).unwrap();
    pub static ref SNIFF_INVOICE: Regex = Regex::new(
        r"(?i)\binvoice\b|\bbill\s+to\b|\bsubtotal\b"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_number_needs_a_digit_in_bare_form() {
        assert!(INVOICE_NUMBER_BARE.captures("Invoice Date: 2024-01-01").is_none());
        let caps = INVOICE_NUMBER_BARE.captures("INVOICE INV-2024-07").unwrap();
        assert_eq!(&caps[1], "INV-2024-07");
    }

    #[test]
    fn date_line_anchor_skips_due_date() {
        let text = "Due Date: 02/01/2024\nDate: 2024-07-01";
        let caps = INVOICE_DATE_LINE.captures(text).unwrap();
        assert_eq!(&caps[1], "2024-07-01");
    }

    #[test]
    fn tax_rate_form_skips_the_rate() {
        let caps = TAX_AFTER_RATE.captures("Tax (21%): 105.00").unwrap();
        assert_eq!(&caps[1], "105.00");
    }

    #[test]
    fn insured_line_ignores_sum_insured() {
        assert!(INSURED_LINE.captures("Sum Insured: 500,000").is_none());
        let caps = INSURED_LINE.captures("Insured: Jane Roe").unwrap();
        assert_eq!(caps[1].trim(), "Jane Roe");
    }

    #[test]
    fn endorsements_need_a_separator() {
        assert!(ENDORSEMENTS_LINE.captures("ENDORSEMENTS PAGE").is_none());
        let caps = ENDORSEMENTS_LINE.captures("END: M, T").unwrap();
        assert_eq!(caps[1].trim(), "M, T");
    }
}
