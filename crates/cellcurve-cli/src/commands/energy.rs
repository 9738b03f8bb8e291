//! Energy subcommand handler.

use std::path::Path;

use anyhow::{Context, Result};

use cellcurve_cli::output::{render_energy_text, render_json, OutputFormat};
use cellcurve_lib::{estimate_energy_change, parse_pack_config, EnergyRequest};

use super::{emit, load_curves};
use crate::EnergyArgs;

/// Handle `cellcurve energy`.
pub fn handle_energy(args: &EnergyArgs, dataset: Option<&Path>, format: OutputFormat) -> Result<()> {
    let pack = args
        .pack
        .as_deref()
        .map(parse_pack_config)
        .transpose()
        .context("invalid --pack value")?;
    let curves = load_curves(dataset)?;

    let request = EnergyRequest {
        rate: args.condition.rate,
        temperature_c: args.condition.temperature,
        initial_voltage: args.from,
        final_voltage: args.to,
        pack,
    };
    let estimate =
        estimate_energy_change(&curves, &request).context("failed to estimate energy change")?;

    match format {
        OutputFormat::Json => emit(&render_json(&estimate)?),
        OutputFormat::Text => emit(&render_energy_text(&estimate)),
    }
    Ok(())
}
