//! Rule-based document parser: raw text in, semi-structured record out.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::models::config::PatternConfig;
use crate::models::record::{DocumentRecord, LineItem};

use super::patterns::PatternSet;

/// Extracts vendor, line items, and total from extracted document text.
///
/// Parsing never fails: fields with no match are absent, and a line item
/// match with a malformed quantity or price is skipped on its own. Duplicate
/// item names are preserved as separate entries in document order.
#[derive(Debug)]
pub struct DocumentParser {
    patterns: PatternSet,
}

impl DocumentParser {
    /// Create a parser with the default pattern set.
    pub fn new() -> Self {
        Self {
            patterns: PatternSet::default(),
        }
    }

    /// Create a parser with an explicit pattern set.
    pub fn with_patterns(patterns: PatternSet) -> Self {
        Self { patterns }
    }

    /// Create a parser from pattern configuration.
    pub fn from_config(config: &PatternConfig) -> crate::error::Result<Self> {
        Ok(Self {
            patterns: PatternSet::from_config(config)?,
        })
    }

    /// Parse document text into a record.
    pub fn parse(&self, text: &str) -> DocumentRecord {
        let vendor = self
            .patterns
            .vendor
            .captures(text)
            .map(|caps| caps[1].trim().to_string());

        let total_amount = self
            .patterns
            .total
            .captures(text)
            .map(|caps| caps[1].replace(',', ""));

        let mut items = Vec::new();
        for caps in self.patterns.line_item.captures_iter(text) {
            let quantity = match caps[1].parse::<u32>() {
                Ok(q) if q > 0 => q,
                _ => {
                    trace!("skipping item match with bad quantity: {}", &caps[0]);
                    continue;
                }
            };

            let unit_price = match Decimal::from_str(&caps[3].replace(',', "")) {
                Ok(p) => p,
                Err(_) => {
                    trace!("skipping item match with bad price: {}", &caps[0]);
                    continue;
                }
            };

            items.push(LineItem {
                name: caps[2].trim().to_string(),
                quantity,
                unit_price,
            });
        }

        debug!(
            "parsed record: vendor={:?}, {} items, total={:?}",
            vendor,
            items.len(),
            total_amount
        );

        DocumentRecord {
            vendor,
            items,
            total_amount,
        }
    }
}

impl Default for DocumentParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse document text with the default pattern set.
pub fn parse_document(text: &str) -> DocumentRecord {
    DocumentParser::new().parse(text)
}
