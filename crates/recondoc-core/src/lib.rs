//! Core library for purchase document reconciliation.
//!
//! This crate provides:
//! - PDF text extraction with an OCR fallback for scanned documents
//! - Rule-based field extraction (vendor, line items, total)
//! - Purchase order PDF rendering
//! - Receipt-against-purchase-order reconciliation
//!
//! The pipeline is synchronous and stateless: extraction, parsing, and
//! reconciliation are pure functions of their inputs, safe to call from any
//! number of threads. Extraction deliberately never fails - unreadable input
//! degrades to empty text, and downstream reconciliation reports the damage
//! as discrepancies instead of errors.

pub mod error;
pub mod models;
pub mod parse;
pub mod pdf;
pub mod reconcile;

#[cfg(feature = "ocr")]
pub mod ocr;

pub use error::{RecondocError, Result};
pub use models::config::RecondocConfig;
pub use models::record::{
    DocumentRecord, ExtractedText, ExtractionMethod, LineItem, PurchaseOrder, ValidationResult,
};
pub use parse::{DocumentParser, PatternSet, parse_document};
pub use pdf::{TextExtractor, render_purchase_order};
pub use reconcile::validate;

#[cfg(feature = "ocr")]
pub use ocr::OcrEngine;
