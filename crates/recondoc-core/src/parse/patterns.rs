//! Regex patterns for document field extraction.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ConfigError;
use crate::models::config::PatternConfig;

/// Default vendor label pattern. Group 1 is the rest of the line.
pub const DEFAULT_VENDOR_PATTERN: &str = r"(?i)Vendor[:\s]*(.*)";

/// Default total label pattern with optional currency symbol. Group 1 is the
/// amount with digits, commas, and decimal point.
pub const DEFAULT_TOTAL_PATTERN: &str = r"(?i)Total[:\s]*\$?([\d,.]+)";

/// Default line item pattern: `<qty> x <name> [@ ][$]<price>`.
pub const DEFAULT_LINE_ITEM_PATTERN: &str = r"(?i)(\d+)\s+x\s+(.+?)\s+@?\s*\$?([\d,.]+)";

lazy_static! {
    pub static ref VENDOR: Regex = Regex::new(DEFAULT_VENDOR_PATTERN).unwrap();
    pub static ref TOTAL: Regex = Regex::new(DEFAULT_TOTAL_PATTERN).unwrap();
    pub static ref LINE_ITEM: Regex = Regex::new(DEFAULT_LINE_ITEM_PATTERN).unwrap();
}

/// Compiled pattern set used by the parser.
#[derive(Debug, Clone)]
pub struct PatternSet {
    pub vendor: Regex,
    pub total: Regex,
    pub line_item: Regex,
}

impl Default for PatternSet {
    fn default() -> Self {
        Self {
            vendor: VENDOR.clone(),
            total: TOTAL.clone(),
            line_item: LINE_ITEM.clone(),
        }
    }
}

impl PatternSet {
    /// Compile a pattern set from configuration, falling back to nothing:
    /// a bad override is a configuration error, not a parse-time surprise.
    pub fn from_config(config: &PatternConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            vendor: compile(&config.vendor, "vendor")?,
            total: compile(&config.total, "total")?,
            line_item: compile(&config.line_item, "line_item")?,
        })
    }
}

fn compile(pattern: &str, name: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::Pattern {
        name: name.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_patterns_compile() {
        let set = PatternSet::default();
        assert!(set.vendor.is_match("Vendor: Acme"));
        assert!(set.total.is_match("Total: $19.98"));
        assert!(set.line_item.is_match("2 x Widget @ $9.99"));
    }

    #[test]
    fn test_vendor_capture_stops_at_line_end() {
        let caps = VENDOR.captures("Vendor: Acme Corp\nTotal: 10").unwrap();
        assert_eq!(&caps[1], "Acme Corp");
    }

    #[test]
    fn test_bad_override_is_config_error() {
        let config = PatternConfig {
            vendor: "(unclosed".to_string(),
            ..PatternConfig::default()
        };

        let err = PatternSet::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("vendor"));
    }
}
