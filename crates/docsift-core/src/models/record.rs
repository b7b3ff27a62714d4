//! Structured records produced by the extraction pipeline.
//!
//! One closed sum type, [`DocumentRecord`], tagged by document category.
//! Every variant embeds the cross-category [`RecordBase`] so downstream
//! consumers (export, storage) always see the same base schema, with
//! unmatched fields left at their explicit unknown sentinel (`None` /
//! empty list) rather than being omitted.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::extract::DocumentKind;

/// Fields shared by every document category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordBase {
    /// Name of the supplier or issuing party.
    pub supplier_or_issuer_name: Option<String>,

    /// Date the document was issued.
    pub issue_date: Option<NaiveDate>,

    /// Date the document expires or stops being valid.
    pub expiration_date: Option<NaiveDate>,

    /// Authority that issued the document.
    pub issuing_authority: Option<String>,

    /// Document status (e.g. compliance status on certificates).
    pub status: Option<String>,

    /// Free-text notes captured from the document.
    pub notes: Option<String>,
}

/// A category-tagged structured extraction result.
///
/// Serialized with an internal `document_type` tag so the JSON form carries
/// the category alongside the flattened field set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "document_type", rename_all = "snake_case")]
pub enum DocumentRecord {
    Invoice(InvoiceRecord),
    Safety(SafetyRecord),
    Insurance(InsuranceRecord),
    Personal(PersonalRecord),
}

impl DocumentRecord {
    /// Category of this record.
    pub fn kind(&self) -> DocumentKind {
        match self {
            DocumentRecord::Invoice(_) => DocumentKind::Invoice,
            DocumentRecord::Safety(_) => DocumentKind::Safety,
            DocumentRecord::Insurance(_) => DocumentKind::Insurance,
            DocumentRecord::Personal(_) => DocumentKind::Personal,
        }
    }

    /// Shared base fields.
    pub fn base(&self) -> &RecordBase {
        match self {
            DocumentRecord::Invoice(r) => &r.base,
            DocumentRecord::Safety(r) => &r.base,
            DocumentRecord::Insurance(r) => &r.base,
            DocumentRecord::Personal(r) => &r.base,
        }
    }

    /// Mutable shared base fields.
    pub fn base_mut(&mut self) -> &mut RecordBase {
        match self {
            DocumentRecord::Invoice(r) => &mut r.base,
            DocumentRecord::Safety(r) => &mut r.base,
            DocumentRecord::Insurance(r) => &mut r.base,
            DocumentRecord::Personal(r) => &mut r.base,
        }
    }

    /// Line items, if this category carries them (invoices only).
    pub fn line_items(&self) -> &[LineItem] {
        match self {
            DocumentRecord::Invoice(r) => &r.line_items,
            _ => &[],
        }
    }
}

/// Invoice extraction result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    #[serde(flatten)]
    pub base: RecordBase,

    /// Invoice number / identifier.
    pub invoice_number: Option<String>,

    /// Payment due date.
    pub due_date: Option<NaiveDate>,

    /// Purchase order number referenced by the invoice.
    pub po_number: Option<String>,

    /// Payment terms as printed (e.g. "Net 30").
    pub payment_terms: Option<String>,

    /// Currency code inferred from the amount symbols.
    pub currency: Option<String>,

    /// Subtotal before tax.
    pub subtotal: Option<Decimal>,

    /// Tax amount.
    pub tax: Option<Decimal>,

    /// Grand total. When the text prints more than one total-like amount,
    /// the last occurrence in reading order wins.
    pub total: Option<Decimal>,

    /// Billing address block.
    pub bill_to: Option<String>,

    /// Shipping/delivery address block.
    pub send_to: Option<String>,

    /// Itemized lines, in reading order. Duplicates are legitimate.
    pub line_items: Vec<LineItem>,
}

/// A single invoice line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total: Decimal,
}

/// Safety certificate extraction result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SafetyRecord {
    #[serde(flatten)]
    pub base: RecordBase,

    /// Certificate / document number.
    pub document_number: Option<String>,

    /// Safety category or certificate type.
    pub safety_category: Option<String>,

    /// Compliance status as printed. Mirrored into `base.status`.
    pub compliance_status: Option<String>,

    /// Free-text inspection narrative.
    pub inspection_details: Option<String>,

    /// Itemized safety measures from bullet or numbered lists.
    pub safety_measures: Vec<String>,
}

/// Insurance policy extraction result.
///
/// Policy start and end dates map onto the base `issue_date` and
/// `expiration_date`; the insurer maps onto `supplier_or_issuer_name`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsuranceRecord {
    #[serde(flatten)]
    pub base: RecordBase,

    /// Policy number.
    pub policy_number: Option<String>,

    /// Insured party / policy holder.
    pub insured: Option<String>,

    /// Coverage type (e.g. "Comprehensive Auto").
    pub coverage_type: Option<String>,

    /// Total sum insured.
    pub coverage_amount: Option<Decimal>,

    /// Premium amount.
    pub premium: Option<Decimal>,

    /// Named beneficiaries.
    pub beneficiaries: Vec<String>,

    /// Enumerated terms and conditions.
    pub terms: Vec<String>,
}

/// Concrete kind of a personal identification document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalIdKind {
    Passport,
    DriverLicense,
    StateId,
}

/// Personal identification document extraction result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalRecord {
    #[serde(flatten)]
    pub base: RecordBase,

    /// Concrete sub-type, inferred from keywords when not supplied.
    pub id_kind: Option<PersonalIdKind>,

    /// Document number, matched with a sub-type-specific pattern.
    pub id_number: Option<String>,

    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,

    pub date_of_birth: Option<NaiveDate>,
    pub nationality: Option<String>,

    /// Gender normalized to "M" / "F".
    pub gender: Option<String>,

    pub address: Option<String>,
    pub height: Option<String>,
    pub eye_color: Option<String>,

    /// Driver's-license restrictions; empty for other sub-types.
    pub restrictions: Vec<String>,

    /// Driver's-license endorsements; empty for other sub-types.
    pub endorsements: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn invoice_record_json_round_trip() {
        let record = DocumentRecord::Invoice(InvoiceRecord {
            base: RecordBase {
                supplier_or_issuer_name: Some("Acme Corp".into()),
                issue_date: NaiveDate::from_ymd_opt(2024, 7, 1),
                ..RecordBase::default()
            },
            invoice_number: Some("INV-2024-07".into()),
            total: Some(Decimal::from_str("250.00").unwrap()),
            line_items: vec![LineItem {
                description: "Widget A".into(),
                quantity: 3,
                unit_price: Decimal::from_str("10.00").unwrap(),
                total: Decimal::from_str("30.00").unwrap(),
            }],
            ..InvoiceRecord::default()
        });

        let json = serde_json::to_string(&record).unwrap();
        let parsed: DocumentRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn record_tagged_with_document_type() {
        let record = DocumentRecord::Safety(SafetyRecord::default());
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["document_type"], "safety");
    }

    #[test]
    fn unknown_fields_serialize_as_null() {
        let record = DocumentRecord::Personal(PersonalRecord::default());
        let value = serde_json::to_value(&record).unwrap();
        // The full field set is always present, just possibly empty.
        assert!(value.as_object().unwrap().contains_key("id_number"));
        assert_eq!(value["id_number"], serde_json::Value::Null);
        assert_eq!(value["restrictions"], serde_json::json!([]));
    }

    #[test]
    fn base_accessors_cover_all_variants() {
        let mut record = DocumentRecord::Insurance(InsuranceRecord::default());
        record.base_mut().supplier_or_issuer_name = Some("Allied Mutual".into());
        assert_eq!(record.kind(), DocumentKind::Insurance);
        assert_eq!(
            record.base().supplier_or_issuer_name.as_deref(),
            Some("Allied Mutual")
        );
        assert!(record.line_items().is_empty());
    }
}
