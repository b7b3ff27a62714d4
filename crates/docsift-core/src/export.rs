//! Record serialization: JSON tree form and flattened tabular form.
//!
//! Flattening is recursive and stable: nested fields become `parent_child`
//! columns, a list of structures expands by index (`field_0_subfield`), and
//! a list of scalars joins into one comma-separated cell. Line items are
//! emitted as a separate table keyed by position, since flattening a
//! variable-length item list would give every record a different schema.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::DocsiftError;
use crate::models::record::{DocumentRecord, LineItem};

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

/// In-memory export payload; callers decide where it goes.
#[derive(Debug, Clone)]
pub enum ExportPayload {
    Json(String),
    Csv(CsvExport),
}

/// Tabular export: the record table plus, when any record carries line
/// items, a positional items table with four fixed columns.
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub table: String,
    pub items: Option<String>,
}

/// Serialize one or more records to the requested format.
pub fn export(records: &[DocumentRecord], format: ExportFormat) -> Result<ExportPayload, DocsiftError> {
    match format {
        ExportFormat::Json => {
            let json = match records {
                [single] => to_json(single)?,
                many => serde_json::to_string_pretty(many)
                    .map_err(|e| DocsiftError::Export(e.to_string()))?,
            };
            Ok(ExportPayload::Json(json))
        }
        ExportFormat::Csv => Ok(ExportPayload::Csv(to_csv(records)?)),
    }
}

/// Structurally faithful JSON serialization of a single record.
pub fn to_json(record: &DocumentRecord) -> Result<String, DocsiftError> {
    serde_json::to_string_pretty(record).map_err(|e| DocsiftError::Export(e.to_string()))
}

/// Flattened tabular serialization.
pub fn to_csv(records: &[DocumentRecord]) -> Result<CsvExport, DocsiftError> {
    let mut rows: Vec<Vec<(String, String)>> = Vec::with_capacity(records.len());
    let mut items: Vec<LineItem> = Vec::new();

    for record in records {
        let mut value =
            serde_json::to_value(record).map_err(|e| DocsiftError::Export(e.to_string()))?;
        if let Value::Object(map) = &mut value {
            // Line items go to the positional items table instead.
            map.remove("line_items");
        }

        let mut flat = Vec::new();
        flatten_value("", &value, &mut flat);
        rows.push(flat);

        items.extend_from_slice(record.line_items());
    }

    // Column order: first-seen across records, so identical input always
    // produces identical headers.
    let mut columns: Vec<String> = Vec::new();
    for row in &rows {
        for (key, _) in row {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&columns)
        .map_err(|e| DocsiftError::Export(e.to_string()))?;
    for row in &rows {
        let lookup: HashMap<&str, &str> = row
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let cells: Vec<&str> = columns
            .iter()
            .map(|c| lookup.get(c.as_str()).copied().unwrap_or(""))
            .collect();
        writer
            .write_record(&cells)
            .map_err(|e| DocsiftError::Export(e.to_string()))?;
    }

    let table = finish(writer)?;
    let items = if items.is_empty() {
        None
    } else {
        Some(items_table(&items)?)
    };

    Ok(CsvExport { table, items })
}

fn items_table(items: &[LineItem]) -> Result<String, DocsiftError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["description", "quantity", "unit_price", "total"])
        .map_err(|e| DocsiftError::Export(e.to_string()))?;
    for item in items {
        writer
            .write_record([
                item.description.as_str(),
                &item.quantity.to_string(),
                &item.unit_price.to_string(),
                &item.total.to_string(),
            ])
            .map_err(|e| DocsiftError::Export(e.to_string()))?;
    }
    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, DocsiftError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| DocsiftError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| DocsiftError::Export(e.to_string()))
}

/// Recursive flattening of a JSON tree into `(column, cell)` pairs.
fn flatten_value(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let column = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}_{key}")
                };
                flatten_value(&column, child, out);
            }
        }
        Value::Array(list) => {
            if !list.is_empty() && list.iter().all(Value::is_object) {
                for (index, child) in list.iter().enumerate() {
                    flatten_value(&format!("{prefix}_{index}"), child, out);
                }
            } else {
                let joined = list.iter().map(scalar_cell).collect::<Vec<_>>().join(",");
                out.push((prefix.to_string(), joined));
            }
        }
        scalar => out.push((prefix.to_string(), scalar_cell(scalar))),
    }
}

fn scalar_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{InsuranceRecord, InvoiceRecord, RecordBase};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn sample_invoice() -> DocumentRecord {
        DocumentRecord::Invoice(InvoiceRecord {
            base: RecordBase {
                supplier_or_issuer_name: Some("Acme Corp".into()),
                ..RecordBase::default()
            },
            invoice_number: Some("INV-1".into()),
            total: Some(Decimal::from_str("48.60").unwrap()),
            line_items: vec![
                LineItem {
                    description: "Widget A".into(),
                    quantity: 3,
                    unit_price: Decimal::from_str("10.00").unwrap(),
                    total: Decimal::from_str("30.00").unwrap(),
                },
                LineItem {
                    description: "Gadget B".into(),
                    quantity: 1,
                    unit_price: Decimal::from_str("18.60").unwrap(),
                    total: Decimal::from_str("18.60").unwrap(),
                },
            ],
            ..InvoiceRecord::default()
        })
    }

    #[test]
    fn json_export_round_trips() {
        let record = sample_invoice();
        let ExportPayload::Json(json) = export(&[record.clone()], ExportFormat::Json).unwrap()
        else {
            panic!("expected JSON payload");
        };
        let parsed: DocumentRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn items_table_has_one_row_per_item_and_four_columns() {
        let csv = to_csv(&[sample_invoice()]).unwrap();
        let items = csv.items.unwrap();
        let lines: Vec<&str> = items.lines().collect();
        assert_eq!(lines[0], "description,quantity,unit_price,total");
        assert_eq!(lines.len(), 3, "header plus one row per item");
        assert_eq!(lines[1], "Widget A,3,10.00,30.00");
    }

    #[test]
    fn record_table_excludes_line_item_columns() {
        let csv = to_csv(&[sample_invoice()]).unwrap();
        let header = csv.table.lines().next().unwrap();
        assert!(header.contains("document_type"));
        assert!(header.contains("invoice_number"));
        assert!(!header.contains("line_items"));
    }

    #[test]
    fn scalar_lists_join_into_one_cell() {
        let record = DocumentRecord::Insurance(InsuranceRecord {
            beneficiaries: vec!["Jane Roe".into(), "Roe Estate".into()],
            ..InsuranceRecord::default()
        });
        let csv = to_csv(&[record]).unwrap();
        assert!(csv.table.contains("\"Jane Roe,Roe Estate\""));
        assert!(csv.items.is_none());
    }

    #[test]
    fn nested_lists_of_structures_expand_by_index() {
        let value = serde_json::json!({
            "field": [
                {"subfield": 1},
                {"subfield": 2},
            ]
        });
        let mut flat = Vec::new();
        flatten_value("", &value, &mut flat);
        assert_eq!(
            flat,
            vec![
                ("field_0_subfield".to_string(), "1".to_string()),
                ("field_1_subfield".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn flattening_is_stable_across_calls() {
        let records = [sample_invoice()];
        let a = to_csv(&records).unwrap();
        let b = to_csv(&records).unwrap();
        assert_eq!(a.table, b.table);
        assert_eq!(a.items.unwrap(), b.items.unwrap());
    }

    #[test]
    fn multiple_records_share_the_header_union() {
        let invoice = sample_invoice();
        let insurance = DocumentRecord::Insurance(InsuranceRecord::default());
        let csv = to_csv(&[invoice, insurance]).unwrap();
        let lines: Vec<&str> = csv.table.lines().collect();
        assert_eq!(lines.len(), 3, "header plus one row per record");
        let header = lines[0];
        assert!(header.contains("invoice_number"));
        assert!(header.contains("policy_number"));
    }
}
