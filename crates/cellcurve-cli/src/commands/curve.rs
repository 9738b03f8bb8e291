//! Curve subcommand handler.

use std::path::Path;

use anyhow::{Context, Result};

use cellcurve_cli::output::{render_curve_csv, render_json, CurveReport, OutputFormat};
use cellcurve_lib::interpolate_curve;

use super::{emit, load_curves};
use crate::{ConditionArgs, CurveArgs};

/// Handle `cellcurve curve`.
pub fn handle_curve(args: &CurveArgs, dataset: Option<&Path>, format: OutputFormat) -> Result<()> {
    let curves = load_curves(dataset)?;
    let ConditionArgs { rate, temperature } = args.condition;
    let curve = interpolate_curve(&curves, rate, temperature)
        .with_context(|| format!("failed to estimate the curve at {rate}C, {temperature} °C"))?;

    let report = CurveReport::from_curve(rate, temperature, &curve, args.stride as usize);
    match format {
        OutputFormat::Json => emit(&render_json(&report)?),
        OutputFormat::Text => emit(&render_curve_csv(&report)),
    }
    Ok(())
}
