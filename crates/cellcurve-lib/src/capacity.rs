//! Discharged-capacity lookup by voltage.

use crate::curve::DischargeCurve;
use crate::error::{ensure_within, Result};

/// Find the discharged capacity (mAh) at which `curve` reaches `voltage`.
///
/// Discharge curves usually climb briefly out of a start transient before
/// their main decline, so the same voltage can appear twice. Only samples
/// from the global voltage peak onward are searched, and the capacity of the
/// sample with the nearest voltage is returned (no interpolation between
/// samples). Equally near samples resolve to the lowest capacity.
///
/// # Errors
///
/// Returns [`crate::Error::OutOfRange`] for parameter `voltage` when it lies
/// outside the lowest and highest voltage anywhere on the curve.
pub fn find_capacity_at_voltage(curve: &DischargeCurve, voltage: f64) -> Result<f64> {
    let (min, max) = curve.voltage_range();
    ensure_within("voltage", voltage, min, max)?;

    let peak = curve.peak_index();
    let declining = &curve.voltage()[peak..];

    let mut nearest = 0;
    let mut best = (declining[0] - voltage).abs();
    for (offset, &v) in declining.iter().enumerate().skip(1) {
        let distance = (v - voltage).abs();
        if distance < best {
            nearest = offset;
            best = distance;
        }
    }

    Ok(curve.capacity_mah()[peak + nearest])
}
