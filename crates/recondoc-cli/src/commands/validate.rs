//! Validate command - reconcile a receipt against a purchase order.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::debug;

use recondoc_core::{validate, DocumentParser, DocumentRecord, RecondocConfig, TextExtractor};

use super::load_config;

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Receipt document (PDF) or extracted record (JSON)
    #[arg(short, long)]
    receipt: PathBuf,

    /// Purchase order document (PDF) or record (JSON)
    #[arg(short, long)]
    po: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: ReportFormat,

    /// Exit non-zero when discrepancies are found
    #[arg(long)]
    strict: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ReportFormat {
    /// Human-readable report
    Text,
    /// Machine-readable JSON
    Json,
}

pub async fn run(args: ValidateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let receipt = load_record(&args.receipt, &config)?;
    let po = load_record(&args.po, &config)?;

    debug!(
        "receipt: {} item(s); po: {} item(s)",
        receipt.items.len(),
        po.items.len()
    );

    let result = validate(&receipt, &po);

    match args.format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        ReportFormat::Text => {
            if result.valid {
                println!("{} Receipt matches purchase order", style("✓").green());
            } else {
                println!(
                    "{} {} discrepancy(ies) found:",
                    style("✗").red(),
                    result.discrepancies.len()
                );
                for discrepancy in &result.discrepancies {
                    println!("  - {discrepancy}");
                }
            }
        }
    }

    if args.strict && !result.valid {
        std::process::exit(1);
    }

    Ok(())
}

/// Load a record from either a PDF (extract + parse) or a JSON file.
///
/// Purchase order JSON with a `terms` field deserializes fine here; the
/// extra field is ignored and plays no part in reconciliation.
fn load_record(path: &Path, config: &RecondocConfig) -> anyhow::Result<DocumentRecord> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }

    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        let data = fs::read_to_string(path)?;
        let record = serde_json::from_str(&data)
            .map_err(|e| anyhow::anyhow!("Invalid record in {}: {}", path.display(), e))?;
        return Ok(record);
    }

    let extractor = TextExtractor::from_config(config)?;
    let extracted = extractor.extract_path(path);
    if extracted.method.is_none() {
        anyhow::bail!("{} could not be opened as a PDF", path.display());
    }

    let parser = DocumentParser::from_config(&config.patterns)?;
    Ok(parser.parse(&extracted.text))
}
