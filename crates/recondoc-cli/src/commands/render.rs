//! Render command - produce a purchase order PDF from a JSON record.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::debug;

use recondoc_core::{render_purchase_order, PurchaseOrder};

/// Arguments for the render command.
#[derive(Args)]
pub struct RenderArgs {
    /// Purchase order record (JSON)
    #[arg(required = true)]
    input: PathBuf,

    /// Output PDF path (default: input with .pdf extension)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: RenderArgs) -> anyhow::Result<()> {
    let data = fs::read_to_string(&args.input)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", args.input.display(), e))?;
    let po: PurchaseOrder = serde_json::from_str(&data)
        .map_err(|e| anyhow::anyhow!("Invalid purchase order record: {}", e))?;

    debug!(
        "rendering PO for vendor {:?} with {} item(s)",
        po.record.vendor,
        po.record.items.len()
    );

    let output_path = args
        .output
        .unwrap_or_else(|| args.input.with_extension("pdf"));

    let bytes = render_purchase_order(&po)?;
    fs::write(&output_path, &bytes)?;

    println!(
        "{} Purchase order written to {} ({} bytes)",
        style("✓").green(),
        output_path.display(),
        bytes.len()
    );

    Ok(())
}
