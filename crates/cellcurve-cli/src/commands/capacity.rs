//! Capacity subcommand handler.

use std::path::Path;

use anyhow::{Context, Result};

use cellcurve_cli::output::{render_capacity_text, render_json, CapacityReport, OutputFormat};
use cellcurve_lib::find_capacity_at_voltage;

use super::{emit, load_curves};
use crate::{CapacityArgs, ConditionArgs};

/// Handle `cellcurve capacity`.
pub fn handle_capacity(
    args: &CapacityArgs,
    dataset: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let curves = load_curves(dataset)?;
    let ConditionArgs { rate, temperature } = args.condition;
    let curve = curves
        .interpolate_curve(rate, temperature)
        .with_context(|| format!("failed to estimate the curve at {rate}C, {temperature} °C"))?;
    let capacity_mah = find_capacity_at_voltage(&curve, args.voltage)
        .with_context(|| format!("failed to look up capacity at {} V", args.voltage))?;

    let report = CapacityReport {
        rate,
        temperature_c: temperature,
        voltage: args.voltage,
        capacity_mah,
    };
    match format {
        OutputFormat::Json => emit(&render_json(&report)?),
        OutputFormat::Text => emit(&render_capacity_text(&report)),
    }
    Ok(())
}
