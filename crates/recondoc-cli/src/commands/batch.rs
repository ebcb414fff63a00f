//! Batch command - extract fields from many documents in one run.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use recondoc_core::{DocumentParser, DocumentRecord, TextExtractor};

use super::load_config;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for input files (e.g. "invoices/*.pdf")
    #[arg(required = true)]
    pattern: String,

    /// Directory for per-document JSON output
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Write a one-row-per-item CSV summary to this path
    #[arg(short, long)]
    summary: Option<PathBuf>,

    /// OCR model directory (overrides config)
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Keep going when a document fails to produce any text
    #[arg(long)]
    continue_on_error: bool,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(model_dir) = &args.model_dir {
        config.ocr.model_dir = model_dir.clone();
    }

    let mut paths: Vec<PathBuf> = glob::glob(&args.pattern)?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    if paths.is_empty() {
        anyhow::bail!("No files matched pattern: {}", args.pattern);
    }

    if let Some(output_dir) = &args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    println!(
        "{} Processing {} document(s)",
        style("→").cyan(),
        paths.len()
    );

    let extractor = TextExtractor::from_config(&config)?;
    let parser = DocumentParser::from_config(&config.patterns)?;

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=> "),
    );

    let mut results: Vec<(PathBuf, DocumentRecord)> = Vec::new();
    let mut failed = 0usize;

    for path in &paths {
        pb.set_message(
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );

        let extracted = extractor.extract_path(path);
        if extracted.method.is_none() {
            failed += 1;
            warn!("{} could not be opened as a PDF", path.display());
            if !args.continue_on_error {
                pb.finish_and_clear();
                anyhow::bail!("Failed to extract text from {}", path.display());
            }
            pb.inc(1);
            continue;
        }

        let record = parser.parse(&extracted.text);
        debug!(
            "{}: {} item(s), vendor {:?}",
            path.display(),
            record.items.len(),
            record.vendor
        );

        if let Some(output_dir) = &args.output_dir {
            let stem = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "document".to_string());
            let output_path = output_dir.join(format!("{stem}.json"));
            fs::write(&output_path, serde_json::to_string_pretty(&record)?)?;
        }

        results.push((path.clone(), record));
        pb.inc(1);
    }

    pb.finish_and_clear();

    if let Some(summary_path) = &args.summary {
        write_summary(summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!(
        "{} Processed {} document(s), {} failed in {:.1}s",
        style("✓").green(),
        results.len(),
        failed,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

fn write_summary(path: &PathBuf, results: &[(PathBuf, DocumentRecord)]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "file",
        "vendor",
        "total_amount",
        "item_name",
        "quantity",
        "unit_price",
    ])?;

    for (file, record) in results {
        let file = file.display().to_string();
        let vendor = record.vendor.clone().unwrap_or_default();
        let total = record.total_amount.clone().unwrap_or_default();

        if record.items.is_empty() {
            wtr.write_record([file.as_str(), vendor.as_str(), total.as_str(), "", "", ""])?;
        } else {
            for item in &record.items {
                wtr.write_record([
                    file.as_str(),
                    vendor.as_str(),
                    total.as_str(),
                    item.name.as_str(),
                    &item.quantity.to_string(),
                    &item.unit_price.to_string(),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
