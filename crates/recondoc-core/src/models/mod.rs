//! Data models for documents, purchase orders, and configuration.

pub mod config;
pub mod record;

pub use config::{OcrConfig, PatternConfig, PdfConfig, RecondocConfig};
pub use record::{
    DocumentRecord, ExtractedText, ExtractionMethod, LineItem, PurchaseOrder, ValidationResult,
};
