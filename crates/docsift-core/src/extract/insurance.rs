//! Insurance policy field extraction.

use lazy_static::lazy_static;

use super::amounts::parse_amount;
use super::cascade::Cascade;
use super::dates::{INSURANCE_DATE_FORMATS, parse_date};
use super::patterns::*;
use crate::models::record::InsuranceRecord;

lazy_static! {
    static ref POLICY: Cascade = Cascade::first(vec![
        &*POLICY_NUMBER,
        &*INSURANCE_ID,
        &*CERTIFICATE_NUMBER,
    ]);
    static ref COVERAGE_TYPE: Cascade =
        Cascade::first(vec![&*COVERAGE_TYPE_LABELED, &*COVERAGE_BARE]);
}

/// Extract an insurance policy record. The policy start and end dates map
/// onto the base issue and expiration dates; the insurer is the issuer.
pub fn extract_insurance(text: &str) -> InsuranceRecord {
    let mut record = InsuranceRecord::default();

    record.policy_number = POLICY.capture(text);

    record.base.supplier_or_issuer_name =
        INSURER_LABELED.captures(text).map(|c| c[1].trim().to_string());
    record.insured = INSURED_LINE.captures(text).map(|c| c[1].trim().to_string());
    record.coverage_type = COVERAGE_TYPE.capture(text);

    record.base.issue_date = START_DATE_LABELED
        .captures(text)
        .and_then(|c| parse_date(&c[1], INSURANCE_DATE_FORMATS));
    record.base.expiration_date = END_DATE_LABELED
        .captures(text)
        .and_then(|c| parse_date(&c[1], INSURANCE_DATE_FORMATS));

    record.premium = PREMIUM_AMOUNT
        .captures(text)
        .and_then(|c| parse_amount(&c[1]));
    record.coverage_amount = COVERAGE_AMOUNT
        .captures(text)
        .and_then(|c| parse_amount(&c[1]));

    record.beneficiaries = extract_beneficiaries(text);
    record.terms = extract_terms(text);

    record
}

/// The "Beneficiaries:" block is split on lines and commas.
fn extract_beneficiaries(text: &str) -> Vec<String> {
    let Some(caps) = BENEFICIARIES_BLOCK.captures(text) else {
        return Vec::new();
    };
    caps[1]
        .split([',', '\n'])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Terms come from the "Terms/Conditions" block, one entry per leading
/// enumeration marker.
fn extract_terms(text: &str) -> Vec<String> {
    let Some(caps) = TERMS_BLOCK.captures(text) else {
        return Vec::new();
    };
    ENUMERATED_ITEM
        .captures_iter(&caps[1])
        .map(|c| c[1].trim().to_string())
        .filter(|term| !term.is_empty())
        .collect()
}
