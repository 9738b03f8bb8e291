//! Output formatting for command results.
//!
//! Every renderer returns a `String` so the binary decides where it goes and
//! tests can check the exact text.

use std::fmt::Write as _;

use clap::ValueEnum;
use serde::Serialize;

use cellcurve_lib::{DatasetSummary, DischargeCurve, EnergyEstimate};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text (CSV for curves).
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// One `(capacity, voltage)` point of a rendered curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurveSample {
    pub capacity_mah: f64,
    pub voltage: f64,
}

/// Composed curve as emitted by the `curve` subcommand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveReport {
    pub rate: f64,
    pub temperature_c: f64,
    pub samples: Vec<CurveSample>,
}

impl CurveReport {
    /// Keep every `stride`-th sample; the last sample is always included.
    pub fn from_curve(rate: f64, temperature_c: f64, curve: &DischargeCurve, stride: usize) -> Self {
        let stride = stride.max(1);
        let last = curve.len().saturating_sub(1);
        let samples = curve
            .samples()
            .enumerate()
            .filter(|(index, _)| index % stride == 0 || *index == last)
            .map(|(_, (capacity_mah, voltage))| CurveSample {
                capacity_mah,
                voltage,
            })
            .collect();
        Self {
            rate,
            temperature_c,
            samples,
        }
    }
}

/// Result of the `capacity` subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CapacityReport {
    pub rate: f64,
    pub temperature_c: f64,
    pub voltage: f64,
    pub capacity_mah: f64,
}

/// Pretty-print any serializable result.
pub fn render_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

pub fn render_energy_text(estimate: &EnergyEstimate) -> String {
    let mut out = String::new();
    let pack = estimate
        .pack
        .map(|pack| format!(" ({pack})"))
        .unwrap_or_default();
    let _ = writeln!(
        out,
        "Energy change at {}C, {} °C{pack}:",
        estimate.rate, estimate.temperature_c
    );
    let _ = writeln!(
        out,
        "  {:<8} {:>9} {:>12} {:>10}",
        "", "V/cell", "Capacity", "Energy"
    );
    let _ = writeln!(
        out,
        "  {:<8} {:>9.3} {:>8.1} mAh {:>7.3} Wh",
        "initial",
        estimate.initial_cell_voltage,
        estimate.initial_capacity_mah,
        estimate.initial_energy_wh
    );
    let _ = writeln!(
        out,
        "  {:<8} {:>9.3} {:>8.1} mAh {:>7.3} Wh",
        "final", estimate.final_cell_voltage, estimate.final_capacity_mah, estimate.final_energy_wh
    );
    let _ = writeln!(out, "Delta: {:+.3} Wh", estimate.delta_wh);
    out
}

/// Curve samples as CSV with a header row.
pub fn render_curve_csv(report: &CurveReport) -> String {
    let mut out = String::from("capacity_mah,voltage\n");
    for sample in &report.samples {
        let _ = writeln!(out, "{},{:.6}", sample.capacity_mah, sample.voltage);
    }
    out
}

pub fn render_capacity_text(report: &CapacityReport) -> String {
    format!(
        "{} V at {}C, {} °C -> {:.1} mAh discharged\n",
        report.voltage, report.rate, report.temperature_c, report.capacity_mah
    )
}

pub fn render_summary_text(summary: &DatasetSummary) -> String {
    let mut out = String::new();
    if let Some(source) = &summary.source {
        let _ = writeln!(out, "Dataset: {source}");
    }
    let _ = writeln!(
        out,
        "Samples: {} ({} to {} mAh)",
        summary.samples, summary.capacity_min_mah, summary.capacity_max_mah
    );
    let _ = writeln!(out, "Rates (C): {}", join(&summary.rates));
    let _ = writeln!(out, "Temperatures (°C): {}", join(&summary.temperatures_c));
    let _ = writeln!(
        out,
        "Baseline voltage: {} to {} V",
        summary.baseline_voltage_min, summary.baseline_voltage_max
    );
    out
}

fn join(values: &[f64]) -> String {
    values
        .iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
