//! Field extraction from raw document text.

mod parser;
pub mod patterns;

pub use parser::{DocumentParser, parse_document};
pub use patterns::PatternSet;
