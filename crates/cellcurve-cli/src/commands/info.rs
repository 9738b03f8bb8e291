//! Info subcommand handler.

use std::path::Path;

use anyhow::Result;

use cellcurve_cli::output::{render_json, render_summary_text, OutputFormat};

use super::{emit, load_curves};

/// Handle `cellcurve info`.
pub fn handle_info(dataset: Option<&Path>, format: OutputFormat) -> Result<()> {
    let summary = load_curves(dataset)?.summary();
    match format {
        OutputFormat::Json => emit(&render_json(&summary)?),
        OutputFormat::Text => emit(&render_summary_text(&summary)),
    }
    Ok(())
}
