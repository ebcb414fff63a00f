//! PDF processing: text extraction and purchase order rendering.

mod extractor;
mod generator;

pub use extractor::TextExtractor;
pub use generator::render_purchase_order;
