//! Two-axis curve estimation.
//!
//! The rate axis and the temperature axis are interpolated independently and
//! then combined against the shared baseline curve. Each axis contributes a
//! per-sample scaling factor (its interpolated voltage divided by the baseline
//! voltage) and the factors are multiplied onto the baseline:
//!
//! ```text
//! v[i] = baseline[i] * (temp[i] / baseline[i]) * (rate[i] / baseline[i])
//! ```
//!
//! This assumes rate and temperature act on voltage as independent
//! multiplicative deviations from the reference condition (1C, 25 °C). It is
//! a modelling approximation inherited from how the reference data was
//! prepared, not a physical derivation, and is kept exactly as is. Oddly
//! shaped results point at the reference data, not at this composition.

use tracing::debug;

use crate::curve::DischargeCurve;
use crate::dataset::ReferenceCurveSet;
use crate::error::{Error, Result};
use crate::interpolate::interpolate_axis;

/// Combine per-axis curves against the baseline into one estimated curve.
///
/// # Errors
///
/// * [`Error::DatasetIntegrity`] if the curves are not on one capacity grid.
/// * [`Error::ZeroBaselineVoltage`] if any baseline sample is exactly zero,
///   since the scaling factors would be undefined there.
pub fn compose_curves(
    baseline: &DischargeCurve,
    from_rate: &DischargeCurve,
    from_temperature: &DischargeCurve,
) -> Result<DischargeCurve> {
    if !baseline.shares_grid_with(from_rate) || !baseline.shares_grid_with(from_temperature) {
        return Err(Error::integrity(
            "cannot compose curves sampled on different capacity grids",
        ));
    }

    let capacity = baseline.capacity_mah();
    let voltage = baseline
        .voltage()
        .iter()
        .zip(from_rate.voltage())
        .zip(from_temperature.voltage())
        .enumerate()
        .map(|(index, ((&base, &rate), &temperature))| {
            if base == 0.0 {
                return Err(Error::ZeroBaselineVoltage {
                    index,
                    capacity_mah: capacity[index],
                });
            }
            let rate_factor = rate / base;
            let temp_factor = temperature / base;
            Ok(base * temp_factor * rate_factor)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(DischargeCurve::on_grid(baseline.grid().clone(), voltage))
}

/// Estimate the discharge curve at an arbitrary rate (C) and temperature (°C).
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] when `rate` or `temperature` lies outside
/// its reference axis, plus any error from [`compose_curves`].
///
/// # Examples
///
/// ```
/// use cellcurve_lib::{interpolate_curve, ReferenceCurveSet};
///
/// let data = "capacity_mah,rate_0.2,rate_0.5,rate_1,rate_2,temp_-20,temp_-10,temp_0,temp_25,temp_40\n\
///             0,4.2,4.15,4.1,4.0,3.6,3.75,3.9,4.1,4.12\n\
///             100,3.6,3.55,3.5,3.4,3.0,3.15,3.3,3.5,3.52\n";
/// let set = ReferenceCurveSet::from_reader(data.as_bytes()).unwrap();
///
/// let curve = interpolate_curve(&set, 1.0, 25.0).unwrap();
/// assert_eq!(curve.voltage(), set.baseline().voltage());
/// assert!(interpolate_curve(&set, 2.5, 25.0).is_err());
/// ```
pub fn interpolate_curve(
    set: &ReferenceCurveSet,
    rate: f64,
    temperature: f64,
) -> Result<DischargeCurve> {
    let from_rate = interpolate_axis(set.rate_axis(), rate)?;
    let from_temperature = interpolate_axis(set.temperature_axis(), temperature)?;
    let curve = compose_curves(set.baseline(), &from_rate, &from_temperature)?;
    debug!(rate, temperature, samples = curve.len(), "composed discharge curve");
    Ok(curve)
}

impl ReferenceCurveSet {
    /// Method form of [`interpolate_curve`].
    pub fn interpolate_curve(&self, rate: f64, temperature: f64) -> Result<DischargeCurve> {
        interpolate_curve(self, rate, temperature)
    }
}
