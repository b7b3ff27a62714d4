//! Invoice field extraction.

use lazy_static::lazy_static;

use super::amounts::parse_amount;
use super::cascade::Cascade;
use super::dates::{INVOICE_DATE_FORMATS, parse_date};
use super::patterns::*;
use crate::models::record::{InvoiceRecord, LineItem};

lazy_static! {
    static ref INVOICE_NUMBER: Cascade = Cascade::first(vec![
        &*INVOICE_NUMBER_LABELED,
        &*INVOICE_NUMBER_BARE,
        &*DOCUMENT_NUMBER_LABELED,
        &*NUMBER_SHORTHAND,
    ]);
    static ref ISSUE_DATE: Cascade =
        Cascade::first(vec![&*INVOICE_ISSUE_DATE_LABELED, &*INVOICE_DATE_LINE]);
    static ref PAYMENT_TERMS: Cascade =
        Cascade::first(vec![&*PAYMENT_TERMS_LABELED, &*TERMS_LINE]);
    // Documents commonly print a line total followed by a grand total; the
    // grand total is expected later in reading order.
    static ref TOTAL: Cascade = Cascade::last(vec![&*TOTAL_AMOUNT]);
    static ref TAX: Cascade = Cascade::first(vec![&*TAX_AFTER_RATE, &*TAX_LABELED]);
}

/// Extract an invoice record. Best-effort per field: an unmatched field
/// stays at its unknown sentinel.
pub fn extract_invoice(text: &str) -> InvoiceRecord {
    let mut record = InvoiceRecord::default();

    record.invoice_number = INVOICE_NUMBER.capture(text);

    // Due-date labels rank above the generic date label; both feed the same
    // format priority list.
    record.due_date = INVOICE_DUE_DATE
        .captures(text)
        .and_then(|c| parse_date(&c[1], INVOICE_DATE_FORMATS));
    record.base.expiration_date = INVOICE_EXPIRATION
        .captures(text)
        .and_then(|c| parse_date(&c[1], INVOICE_DATE_FORMATS));
    record.base.issue_date = ISSUE_DATE
        .capture(text)
        .and_then(|s| parse_date(&s, INVOICE_DATE_FORMATS));

    record.po_number = PO_NUMBER.captures(text).map(|c| c[1].trim().to_string());
    record.payment_terms = PAYMENT_TERMS.capture(text);

    record.total = TOTAL.capture(text).and_then(|s| parse_amount(&s));
    record.subtotal = SUBTOTAL_AMOUNT
        .captures(text)
        .and_then(|c| parse_amount(&c[1]));
    record.tax = TAX.capture(text).and_then(|s| parse_amount(&s));
    record.currency = detect_currency(text, record.total.is_some());

    record.bill_to = BILL_TO_BLOCK
        .captures(text)
        .and_then(|c| clean_address(&c[1]));
    record.send_to = SEND_TO_BLOCK
        .captures(text)
        .and_then(|c| clean_address(&c[1]));

    record.line_items = extract_line_items(text);

    record.base.notes = NOTES_LINE.captures(text).map(|c| c[1].trim().to_string());
    record.base.supplier_or_issuer_name = extract_supplier(text);

    record
}

/// Clean a captured address block: collapse whitespace runs, strip stray
/// backtick/tilde recognition artifacts, strip the originating label, and
/// truncate at the first keyword that opens a following section.
fn clean_address(raw: &str) -> Option<String> {
    let stripped: String = raw.chars().filter(|c| *c != '`' && *c != '~').collect();
    let cleaned = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    let cleaned = ADDRESS_LABEL_PREFIX.replace(&cleaned, "");
    let cleaned = ADDRESS_SECTION_BREAK
        .split(&cleaned)
        .next()
        .unwrap_or("")
        .trim()
        .to_string();

    if cleaned.is_empty() { None } else { Some(cleaned) }
}

/// Line items come from lines shaped `<description> <qty> <unit> <total>`.
/// Candidate lines whose description mentions a summary row keyword are
/// excluded so totals never masquerade as items.
fn extract_line_items(text: &str) -> Vec<LineItem> {
    let mut items = Vec::new();

    for line in text.lines() {
        let Some(caps) = ITEM_LINE.captures(line.trim()) else {
            continue;
        };
        let description = caps[1].trim().to_string();
        if description.is_empty() || !description.chars().any(|c| c.is_alphabetic()) {
            continue;
        }
        let lowered = description.to_lowercase();
        if ["total", "subtotal", "tax"].iter().any(|k| lowered.contains(k)) {
            continue;
        }

        let (Ok(quantity), Some(unit_price), Some(total)) = (
            caps[2].parse::<u32>(),
            parse_amount(&caps[3]),
            parse_amount(&caps[4]),
        ) else {
            continue;
        };

        items.push(LineItem {
            description,
            quantity,
            unit_price,
            total,
        });
    }

    items
}

fn detect_currency(text: &str, has_total: bool) -> Option<String> {
    if let Some(caps) = CURRENCY_SYMBOL.captures(text) {
        let code = match &caps[1] {
            "€" => "EUR",
            "£" => "GBP",
            _ => "USD",
        };
        return Some(code.to_string());
    }
    // An amount with no symbol still gets the default currency so the
    // record maps cleanly onto storage.
    if has_total { Some("USD".to_string()) } else { None }
}

fn extract_supplier(text: &str) -> Option<String> {
    if let Some(caps) = VENDOR_LABELED.captures(text) {
        return Some(caps[1].trim().to_string());
    }
    // Fall back to the first all-caps letterhead-style line.
    for caps in ALL_CAPS_LINE.captures_iter(text) {
        let candidate = caps[1].trim();
        if candidate.len() < 3 || SUPPLIER_STOPWORDS.is_match(candidate) {
            continue;
        }
        return Some(candidate.to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn last_total_wins_over_earlier_totals() {
        let record = extract_invoice("Total: 100.00 shipping and handling Total: 250.00");
        assert_eq!(record.total, Some(dec("250.00")));
    }

    #[test]
    fn single_total_is_used_as_is() {
        let record = extract_invoice("Total: 99.50");
        assert_eq!(record.total, Some(dec("99.50")));
    }

    #[test]
    fn labeled_header_fields() {
        let record =
            extract_invoice("Bill To: Acme Corp\nInvoice #: INV-2024-07\nDate: 2024-07-01");
        assert_eq!(record.bill_to.as_deref(), Some("Acme Corp"));
        assert_eq!(record.invoice_number.as_deref(), Some("INV-2024-07"));
        assert_eq!(record.base.issue_date.unwrap().to_string(), "2024-07-01");
    }

    #[test]
    fn due_date_does_not_leak_into_issue_date() {
        let record = extract_invoice("Due Date: 01/31/2024\nDate: 01/02/2024");
        assert_eq!(record.due_date.unwrap().to_string(), "2024-01-31");
        assert_eq!(record.base.issue_date.unwrap().to_string(), "2024-01-02");
    }

    #[test]
    fn month_name_dates_parse() {
        let record = extract_invoice("Invoice Date: January 7, 2025");
        assert_eq!(record.base.issue_date.unwrap().to_string(), "2025-01-07");
    }

    #[test]
    fn line_items_parse_and_summary_rows_are_excluded() {
        let text = "Widget A  3  $10.00  $30.00\nSubtotal 1 30.00 30.00\nTax 1 2.40 2.40";
        let items = extract_line_items(text);
        assert_eq!(items.len(), 1);
        assert_eq!(
            items[0],
            LineItem {
                description: "Widget A".into(),
                quantity: 3,
                unit_price: dec("10.00"),
                total: dec("30.00"),
            }
        );
    }

    #[test]
    fn duplicate_line_items_are_preserved_in_order() {
        let text = "Widget A  3  10.00  30.00\nGadget B  1  5.00  5.00\nWidget A  3  10.00  30.00";
        let items = extract_line_items(text);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], items[2]);
        assert_eq!(items[1].description, "Gadget B");
    }

    #[test]
    fn address_cleanup_strips_artifacts_and_following_sections() {
        let cleaned = clean_address("Acme ` Corp\n12 Ocean   Ave\nInvoice #: 9").unwrap();
        assert_eq!(cleaned, "Acme Corp 12 Ocean Ave");
    }

    #[test]
    fn subtotal_and_tax_are_captured() {
        let record = extract_invoice("Subtotal: $45.00\nTax (8%): $3.60\nTotal: $48.60");
        assert_eq!(record.subtotal, Some(dec("45.00")));
        assert_eq!(record.tax, Some(dec("3.60")));
        assert_eq!(record.total, Some(dec("48.60")));
        assert_eq!(record.currency.as_deref(), Some("USD"));
    }

    #[test]
    fn po_number_and_payment_terms() {
        let record = extract_invoice("P.O. #: PO-4471\nPayment Terms: Net 30");
        assert_eq!(record.po_number.as_deref(), Some("PO-4471"));
        assert_eq!(record.payment_terms.as_deref(), Some("Net 30"));
    }

    #[test]
    fn supplier_from_label_or_letterhead_line() {
        let labeled = extract_invoice("Vendor: Blue Harbor Supply\nTotal: 10.00");
        assert_eq!(
            labeled.base.supplier_or_issuer_name.as_deref(),
            Some("Blue Harbor Supply")
        );

        let letterhead = extract_invoice("BLUE HARBOR SUPPLY\nInvoice #: 7\nTotal: 10.00");
        assert_eq!(
            letterhead.base.supplier_or_issuer_name.as_deref(),
            Some("BLUE HARBOR SUPPLY")
        );
    }

    #[test]
    fn unmatched_fields_stay_at_the_sentinel() {
        let record = extract_invoice("completely unrelated text");
        assert_eq!(record.invoice_number, None);
        assert_eq!(record.total, None);
        assert_eq!(record.currency, None);
        assert!(record.line_items.is_empty());
    }

    #[test]
    fn malformed_amount_leaves_field_unset() {
        // 32 digits overflow the decimal type; the field is left unset
        // instead of aborting the rest of the record.
        let record =
            extract_invoice("Subtotal: 45.00\nTotal: 99,999,999,999,999,999,999,999,999,999,999");
        assert_eq!(record.total, None);
        assert_eq!(record.subtotal, Some(dec("45.00")));
    }
}
