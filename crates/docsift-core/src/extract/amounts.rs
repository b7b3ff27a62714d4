//! Numeric amount parsing.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a money-like token, stripping thousands separators and currency
/// symbols. A failed conversion yields `None`; extraction is best-effort
/// per field and one bad number must never abort the record.
pub fn parse_amount(value: &str) -> Option<Decimal> {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn plain_and_comma_separated_amounts() {
        assert_eq!(parse_amount("250.00"), Some(dec("250.00")));
        assert_eq!(parse_amount("1,234.56"), Some(dec("1234.56")));
        assert_eq!(parse_amount("12,345,678.90"), Some(dec("12345678.90")));
        assert_eq!(parse_amount("42"), Some(dec("42")));
    }

    #[test]
    fn currency_symbols_are_stripped() {
        assert_eq!(parse_amount("$99.95"), Some(dec("99.95")));
        assert_eq!(parse_amount("€ 1,000.00"), Some(dec("1000.00")));
    }

    #[test]
    fn unconvertible_input_is_none() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("N/A"), None);
        // European decimal-comma collapses to an ambiguous token; left unset.
        assert_eq!(parse_amount("1.234.56"), None);
    }
}
