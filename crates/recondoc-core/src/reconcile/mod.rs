//! Receipt-against-purchase-order reconciliation.
//!
//! The discrepancy list is the error channel: reconciliation never fails on
//! well-formed records, it reports problems as human-readable strings.

use tracing::debug;

use crate::models::record::{DocumentRecord, ValidationResult};

/// Validate a receipt record against the purchase order it should fulfil.
///
/// Vendor comparison is exact string equality after parser-level trimming.
/// Item checks are driven by the purchase order list: for each PO item the
/// first receipt item with a case-insensitively matching name is compared,
/// and items that appear only on the receipt are never reported. That
/// asymmetry is documented behavior, not an oversight.
pub fn validate(receipt: &DocumentRecord, po: &DocumentRecord) -> ValidationResult {
    let mut discrepancies = Vec::new();

    if receipt.vendor != po.vendor {
        discrepancies.push(format!(
            "Vendor mismatch: {} != {}",
            vendor_label(&receipt.vendor),
            vendor_label(&po.vendor)
        ));
    }

    for po_item in &po.items {
        match receipt.items.iter().find(|r| r.name_matches(&po_item.name)) {
            // First name match wins, even if a later duplicate would
            // compare more favorably.
            Some(receipt_item) => {
                if receipt_item.quantity != po_item.quantity
                    || receipt_item.unit_price != po_item.unit_price
                {
                    discrepancies.push(format!(
                        "Item {} mismatch: PO {} x {} != Receipt {} x {}",
                        po_item.name,
                        po_item.quantity,
                        po_item.unit_price,
                        receipt_item.quantity,
                        receipt_item.unit_price
                    ));
                }
            }
            None => {
                discrepancies.push(format!("Item {} missing in receipt", po_item.name));
            }
        }
    }

    debug!("reconciliation found {} discrepancies", discrepancies.len());

    ValidationResult::from_discrepancies(discrepancies)
}

fn vendor_label(vendor: &Option<String>) -> &str {
    vendor.as_deref().unwrap_or("(none)")
}
