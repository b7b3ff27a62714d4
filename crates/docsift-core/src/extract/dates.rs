//! Date parsing with per-category format priority.
//!
//! Each category accepts a fixed, ordered list of literal formats; the
//! first format that parses wins and the rest are not attempted. An
//! unparseable string yields `None`, never an error.

use chrono::NaiveDate;

/// Invoice date formats, most specific first.
pub const INVOICE_DATE_FORMATS: &[&str] = &[
    "%B %d, %Y",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%m-%d-%Y",
    "%m-%d-%y",
    "%Y-%m-%d",
    "%d %b %Y",
    "%d %B %Y",
];

/// Safety certificate date formats (day-first).
pub const SAFETY_DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y",
    "%Y-%m-%d",
    "%d-%m-%Y",
    "%d/%m/%y",
    "%y-%m-%d",
    "%d-%m-%y",
];

/// Insurance policy date formats (day-first preferred).
pub const INSURANCE_DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d/%m/%y",
    "%d-%m-%y",
    "%m/%d/%y",
    "%m-%d-%y",
];

/// Personal ID date formats (US month-first preferred).
pub const PERSONAL_DATE_FORMATS: &[&str] = &[
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%Y/%m/%d",
    "%Y-%m-%d",
    "%m/%d/%y",
    "%d/%m/%y",
];

/// Try each format in order; first successful parse wins.
pub fn parse_date(value: &str, formats: &[&str]) -> Option<NaiveDate> {
    let value = value.trim();
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn invoice_formats_produce_iso_dates() {
        for (input, expected) in [
            ("January 7, 2025", "2025-01-07"),
            ("01/15/2024", "2024-01-15"),
            ("01/15/24", "2024-01-15"),
            ("2024-07-01", "2024-07-01"),
            ("07 Jan 2025", "2025-01-07"),
            ("07 January 2025", "2025-01-07"),
        ] {
            let parsed = parse_date(input, INVOICE_DATE_FORMATS).unwrap();
            assert_eq!(parsed.to_string(), expected, "input {input:?}");
        }
    }

    #[test]
    fn priority_order_decides_ambiguous_dates() {
        // 03/04 is March 4th for invoices (month-first) but April 3rd for
        // insurance (day-first).
        let invoice = parse_date("03/04/2024", INVOICE_DATE_FORMATS).unwrap();
        assert_eq!(invoice.to_string(), "2024-03-04");
        let insurance = parse_date("03/04/2024", INSURANCE_DATE_FORMATS).unwrap();
        assert_eq!(insurance.to_string(), "2024-04-03");
    }

    #[test]
    fn safety_formats_are_day_first() {
        let parsed = parse_date("15/01/2024", SAFETY_DATE_FORMATS).unwrap();
        assert_eq!(parsed.to_string(), "2024-01-15");
    }

    #[test]
    fn unparseable_input_is_the_unknown_sentinel() {
        assert_eq!(parse_date("not a date", INVOICE_DATE_FORMATS), None);
        assert_eq!(parse_date("15.01.2024", INVOICE_DATE_FORMATS), None);
        assert_eq!(parse_date("", PERSONAL_DATE_FORMATS), None);
        // 31/02 is day-first but February has no 31st.
        assert_eq!(parse_date("31/02/2024", SAFETY_DATE_FORMATS), None);
    }

    #[test]
    fn personal_formats_accept_month_names() {
        let parsed = parse_date("Mar 5, 1990", PERSONAL_DATE_FORMATS).unwrap();
        assert_eq!(parsed.to_string(), "1990-03-05");
    }
}
