//! Document records produced by extraction and consumed by reconciliation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Raw text recovered from a PDF, with provenance.
///
/// Distinguishes "extraction was attempted and yielded nothing"
/// (`method: Some(..)`, empty text) from "extraction could not be attempted
/// at all" (`method: None`, e.g. the bytes were not a parseable PDF). The
/// pipeline never raises either case to the caller; empty text is a
/// legitimate, if unfortunate, outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedText {
    /// Extracted text, concatenated in page order. May be empty.
    pub text: String,

    /// How the text was recovered, if extraction ran at all.
    pub method: Option<ExtractionMethod>,

    /// Number of pages in the source document (0 if unknown).
    pub pages: u32,
}

impl ExtractedText {
    /// An extraction that could not be attempted.
    pub fn not_attempted() -> Self {
        Self {
            text: String::new(),
            method: None,
            pages: 0,
        }
    }

    /// True if no non-whitespace text was recovered.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Method used to recover text from a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Embedded text extracted directly from the PDF content streams.
    Embedded,
    /// Optical character recognition over page images.
    Ocr,
}

/// A single line item on a proforma, purchase order, or receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Item name as it appeared in the source document.
    pub name: String,

    /// Ordered quantity. Always positive.
    pub quantity: u32,

    /// Price per unit. Kept as a decimal to preserve the source scale,
    /// so `9.99` round-trips as `9.99` in discrepancy messages.
    pub unit_price: Decimal,
}

impl LineItem {
    /// Case-insensitive name comparison used for receipt matching.
    pub fn name_matches(&self, other: &str) -> bool {
        self.name.to_lowercase() == other.to_lowercase()
    }
}

/// Semi-structured fields extracted from one document.
///
/// Produced fresh on every parse; never mutated afterwards. Absent fields
/// are `None`, not errors - downstream reconciliation treats them as
/// mismatches rather than failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Vendor name, trimmed. `None` if no vendor label was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,

    /// Line items in document order. Duplicate names are preserved.
    #[serde(default)]
    pub items: Vec<LineItem>,

    /// Total amount as the literal comma-stripped numeric string from the
    /// source, preserving its formatting ambiguity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<String>,
}

/// Input to purchase order rendering: an extracted record plus the
/// payment terms finance attaches at approval time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    #[serde(flatten)]
    pub record: DocumentRecord,

    /// Optional payment terms line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms: Option<String>,
}

/// Outcome of validating a receipt against a purchase order.
///
/// The discrepancy list is the designed reporting channel; reconciliation
/// never fails on well-formed records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True iff no discrepancies were found.
    pub valid: bool,

    /// Human-readable mismatch descriptions, in check order.
    pub discrepancies: Vec<String>,
}

impl ValidationResult {
    /// Build a result from a discrepancy list, keeping `valid` consistent
    /// with the list being empty.
    pub fn from_discrepancies(discrepancies: Vec<String>) -> Self {
        Self {
            valid: discrepancies.is_empty(),
            discrepancies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_validation_result_invariant() {
        let ok = ValidationResult::from_discrepancies(vec![]);
        assert!(ok.valid);

        let bad = ValidationResult::from_discrepancies(vec!["Vendor mismatch: A != B".into()]);
        assert!(!bad.valid);
        assert_eq!(bad.discrepancies.len(), 1);
    }

    #[test]
    fn test_line_item_name_matching() {
        let item = LineItem {
            name: "Widget".to_string(),
            quantity: 2,
            unit_price: Decimal::from_str("9.99").unwrap(),
        };

        assert!(item.name_matches("widget"));
        assert!(item.name_matches("WIDGET"));
        assert!(!item.name_matches("widgets"));
    }

    #[test]
    fn test_purchase_order_json_is_flat() {
        let po = PurchaseOrder {
            record: DocumentRecord {
                vendor: Some("Acme".to_string()),
                items: vec![],
                total_amount: Some("19.98".to_string()),
            },
            terms: Some("Net 30".to_string()),
        };

        let json = serde_json::to_value(&po).unwrap();
        assert_eq!(json["vendor"], "Acme");
        assert_eq!(json["terms"], "Net 30");
    }

    #[test]
    fn test_document_record_ignores_terms_field() {
        // A purchase order JSON deserializes as a plain record too.
        let json = r#"{"vendor":"Acme","items":[],"total_amount":"10","terms":"Net 30"}"#;
        let record: DocumentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.vendor.as_deref(), Some("Acme"));
    }
}
