//! Extract command - pull structured fields from a single document.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use recondoc_core::{DocumentParser, DocumentRecord, TextExtractor};

use super::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print the raw extracted text instead of parsed fields
    #[arg(long)]
    raw: bool,

    /// OCR model directory (overrides config)
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Skip the OCR fallback and use embedded text only
    #[arg(long)]
    text_only: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per line item
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(model_dir) = &args.model_dir {
        config.ocr.model_dir = model_dir.clone();
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );

    pb.set_message("Extracting text...");
    let extractor = if args.text_only {
        TextExtractor::with_config(config.pdf.clone())
    } else {
        TextExtractor::from_config(&config)?
    };

    let extracted = extractor.extract_path(&args.input);
    pb.finish_and_clear();

    if extracted.method.is_none() {
        eprintln!(
            "{} {} could not be opened as a PDF; emitting an empty record",
            style("!").yellow(),
            args.input.display()
        );
    }

    debug!(
        "extracted {} chars from {} pages via {:?}",
        extracted.text.len(),
        extracted.pages,
        extracted.method
    );

    let output = if args.raw {
        extracted.text.clone()
    } else {
        let parser = DocumentParser::from_config(&config.patterns)?;
        let record = parser.parse(&extracted.text);
        format_record(&record, args.format)?
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_record(record: &DocumentRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_record_csv(record),
        OutputFormat::Text => Ok(format_record_text(record)),
    }
}

fn format_record_csv(record: &DocumentRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["vendor", "total_amount", "item_name", "quantity", "unit_price"])?;

    let vendor = record.vendor.clone().unwrap_or_default();
    let total = record.total_amount.clone().unwrap_or_default();

    if record.items.is_empty() {
        wtr.write_record([vendor.as_str(), total.as_str(), "", "", ""])?;
    } else {
        for item in &record.items {
            wtr.write_record([
                vendor.as_str(),
                total.as_str(),
                item.name.as_str(),
                &item.quantity.to_string(),
                &item.unit_price.to_string(),
            ])?;
        }
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_record_text(record: &DocumentRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Vendor: {}\n",
        record.vendor.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!(
        "Total:  {}\n",
        record.total_amount.as_deref().unwrap_or("-")
    ));
    output.push('\n');

    output.push_str("Items:\n");
    if record.items.is_empty() {
        output.push_str("  (none)\n");
    } else {
        for item in &record.items {
            output.push_str(&format!(
                "  {} x {} @ ${}\n",
                item.quantity, item.name, item.unit_price
            ));
        }
    }

    output
}
