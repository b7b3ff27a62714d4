//! Personal identification document extraction.
//!
//! Passports, driver's licenses, and state IDs share one record shape; the
//! concrete sub-type is inferred from keywords unless the caller already
//! knows it, and drives which ID-number pattern applies.

use super::dates::{PERSONAL_DATE_FORMATS, parse_date};
use super::patterns::*;
use crate::models::record::{PersonalIdKind, PersonalRecord};

/// Extract a personal ID record. `kind_hint` skips sub-type inference.
pub fn extract_personal(text: &str, kind_hint: Option<PersonalIdKind>) -> PersonalRecord {
    let mut record = PersonalRecord::default();

    let kind = kind_hint.or_else(|| infer_kind(text));
    record.id_kind = kind;

    record.id_number = match kind {
        Some(PersonalIdKind::Passport) => PASSPORT_NUMBER.captures(text),
        Some(PersonalIdKind::DriverLicense) => LICENSE_NUMBER.captures(text),
        Some(PersonalIdKind::StateId) => STATE_ID_NUMBER.captures(text),
        None => None,
    }
    .map(|c| c[1].trim().to_string());

    extract_names(text, &mut record);

    record.date_of_birth = DATE_OF_BIRTH
        .captures(text)
        .and_then(|c| parse_date(&c[1], PERSONAL_DATE_FORMATS));
    record.base.issue_date = ID_ISSUE_DATE
        .captures(text)
        .and_then(|c| parse_date(&c[1], PERSONAL_DATE_FORMATS));
    record.base.expiration_date = ID_EXPIRATION_DATE
        .captures(text)
        .and_then(|c| parse_date(&c[1], PERSONAL_DATE_FORMATS));

    record.base.issuing_authority = ISSUING_AUTHORITY
        .captures(text)
        .map(|c| c[1].trim().to_string());
    record.nationality = NATIONALITY.captures(text).map(|c| c[1].trim().to_string());
    record.gender = GENDER.captures(text).and_then(|c| normalize_gender(&c[1]));

    record.address = ADDRESS_BLOCK.captures(text).and_then(|c| {
        // The capture runs to the end of the block; physical-descriptor
        // labels mark where the address actually stops.
        let lines: Vec<&str> = c[1]
            .lines()
            .take_while(|line| !ID_LABEL_LINE.is_match(line))
            .collect();
        let joined = lines.join(" ").split_whitespace().collect::<Vec<_>>().join(" ");
        if joined.is_empty() { None } else { Some(joined) }
    });
    record.height = HEIGHT.captures(text).map(|c| c[1].trim().to_string());
    record.eye_color = EYE_COLOR
        .captures(text)
        .map(|c| c[1].trim().to_uppercase());

    // Restriction and endorsement codes only exist on driver's licenses.
    if kind == Some(PersonalIdKind::DriverLicense) {
        record.restrictions = comma_list(RESTRICTIONS_LINE.captures(text));
        record.endorsements = comma_list(ENDORSEMENTS_LINE.captures(text));
    }

    record
}

fn infer_kind(text: &str) -> Option<PersonalIdKind> {
    if PASSPORT_KEYWORD.is_match(text) {
        Some(PersonalIdKind::Passport)
    } else if DRIVER_LICENSE_KEYWORD.is_match(text) {
        Some(PersonalIdKind::DriverLicense)
    } else if STATE_ID_KEYWORD.is_match(text) {
        Some(PersonalIdKind::StateId)
    } else {
        None
    }
}

/// Names come from explicit labels when present, otherwise from a
/// "SURNAME, GIVEN [MIDDLE]" line. The first strategy that matches wins.
fn extract_names(text: &str, record: &mut PersonalRecord) {
    let last = LAST_NAME_LABELED.captures(text);
    let first = FIRST_NAME_LABELED.captures(text);

    if let (Some(last), Some(first)) = (last, first) {
        record.last_name = Some(last[1].trim().to_string());
        record.first_name = Some(first[1].trim().to_string());
        return;
    }

    if let Some(caps) = NAME_COMMA_LINE.captures(text) {
        record.last_name = Some(caps[1].to_string());
        record.first_name = Some(caps[2].to_string());
        record.middle_name = caps.get(3).map(|m| m.as_str().to_string());
    }
}

fn normalize_gender(raw: &str) -> Option<String> {
    match raw.to_uppercase().as_str() {
        "M" | "MALE" => Some("M".to_string()),
        "F" | "FEMALE" => Some("F".to_string()),
        _ => None,
    }
}

fn comma_list(caps: Option<regex::Captures<'_>>) -> Vec<String> {
    caps.map(|c| {
        c[1].split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
