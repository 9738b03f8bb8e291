//! Energy change between two voltage setpoints.
//!
//! The estimated curve for the requested rate and temperature is used to look
//! up the discharged capacity at each setpoint. Each setpoint's energy is its
//! capacity (Ah) times the parallel cell count times its per-cell voltage, and
//! the result is `final - initial` in watt-hours.
//!
//! Sign convention: the value is a plain difference of capacity-voltage
//! products and is not normalised to "energy consumed". Callers that need a
//! positive consumption figure must take the sign into account themselves.

use serde::Serialize;
use tracing::debug;

use crate::capacity::find_capacity_at_voltage;
use crate::compose::interpolate_curve;
use crate::dataset::ReferenceCurveSet;
use crate::error::{Error, Result};
use crate::pack::{parse_pack_config, PackConfig};

/// Milliamp-hours per amp-hour.
const MAH_PER_AH: f64 = 1000.0;

/// Inputs for an energy-change estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyRequest {
    /// Discharge rate (C).
    pub rate: f64,
    /// Cell temperature (°C).
    pub temperature_c: f64,
    /// Starting voltage; a pack terminal voltage when `pack` is set.
    pub initial_voltage: f64,
    /// Ending voltage; a pack terminal voltage when `pack` is set.
    pub final_voltage: f64,
    pub pack: Option<PackConfig>,
}

/// Full breakdown of an energy-change estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyEstimate {
    pub rate: f64,
    pub temperature_c: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pack: Option<PackConfig>,
    pub parallel: u32,
    pub initial_cell_voltage: f64,
    pub final_cell_voltage: f64,
    pub initial_capacity_mah: f64,
    pub final_capacity_mah: f64,
    pub initial_energy_wh: f64,
    pub final_energy_wh: f64,
    /// `final_energy_wh - initial_energy_wh`.
    pub delta_wh: f64,
}

/// Estimate the energy change for `request`, keeping every intermediate value.
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] when the rate, temperature, or either
/// per-cell voltage is outside the supported range. Voltage errors name the
/// setpoint (`initial_voltage` / `final_voltage`) and report per-cell values.
pub fn estimate_energy_change(
    set: &ReferenceCurveSet,
    request: &EnergyRequest,
) -> Result<EnergyEstimate> {
    let (initial_cell_voltage, final_cell_voltage, parallel) = match request.pack {
        Some(pack) => (
            pack.cell_voltage(request.initial_voltage),
            pack.cell_voltage(request.final_voltage),
            pack.parallel,
        ),
        None => (request.initial_voltage, request.final_voltage, 1),
    };

    let curve = interpolate_curve(set, request.rate, request.temperature_c)?;
    let initial_capacity_mah = find_capacity_at_voltage(&curve, initial_cell_voltage)
        .map_err(|err| for_parameter(err, "initial_voltage"))?;
    let final_capacity_mah = find_capacity_at_voltage(&curve, final_cell_voltage)
        .map_err(|err| for_parameter(err, "final_voltage"))?;

    let parallel_factor = f64::from(parallel);
    let initial_energy_wh =
        initial_capacity_mah / MAH_PER_AH * parallel_factor * initial_cell_voltage;
    let final_energy_wh = final_capacity_mah / MAH_PER_AH * parallel_factor * final_cell_voltage;
    let delta_wh = final_energy_wh - initial_energy_wh;

    debug!(
        rate = request.rate,
        temperature = request.temperature_c,
        initial_capacity_mah,
        final_capacity_mah,
        delta_wh,
        "estimated energy change"
    );

    Ok(EnergyEstimate {
        rate: request.rate,
        temperature_c: request.temperature_c,
        pack: request.pack,
        parallel,
        initial_cell_voltage,
        final_cell_voltage,
        initial_capacity_mah,
        final_capacity_mah,
        initial_energy_wh,
        final_energy_wh,
        delta_wh,
    })
}

/// Net energy change (Wh) between two voltage setpoints.
///
/// `pack_config` is an optional `NsMp` token; when present the voltages are
/// pack terminal voltages. See the module docs for the sign convention.
///
/// # Errors
///
/// Returns [`Error::InvalidPackConfig`] for a malformed token and
/// [`Error::OutOfRange`] for any argument outside its supported range.
pub fn calculate_energy_change(
    set: &ReferenceCurveSet,
    rate: f64,
    temperature: f64,
    initial_voltage: f64,
    final_voltage: f64,
    pack_config: Option<&str>,
) -> Result<f64> {
    let pack = pack_config.map(parse_pack_config).transpose()?;
    let request = EnergyRequest {
        rate,
        temperature_c: temperature,
        initial_voltage,
        final_voltage,
        pack,
    };
    Ok(estimate_energy_change(set, &request)?.delta_wh)
}

/// Name the setpoint in a voltage range error; value and bounds stay per-cell.
fn for_parameter(err: Error, parameter: &'static str) -> Error {
    match err {
        Error::OutOfRange {
            value, min, max, ..
        } => Error::OutOfRange {
            parameter,
            value,
            min,
            max,
        },
        other => other,
    }
}
