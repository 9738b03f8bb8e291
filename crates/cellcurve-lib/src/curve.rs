//! Voltage-vs-discharged-capacity curves.
//!
//! Every curve derived from a reference dataset shares the dataset's capacity
//! grid. The grid is stored once behind an [`Arc`] so interpolated and composed
//! curves only own their voltage samples.

use std::sync::Arc;

use crate::error::{Error, Result};

/// Voltage samples taken along a strictly increasing capacity grid (mAh).
#[derive(Debug, Clone, PartialEq)]
pub struct DischargeCurve {
    capacity_mah: Arc<[f64]>,
    voltage: Vec<f64>,
}

impl DischargeCurve {
    /// Build a curve from a capacity grid and matching voltage samples.
    ///
    /// The grid must be non-empty, finite, and strictly increasing, and the
    /// voltages must be finite and exactly as many as the grid points.
    pub fn new(capacity_mah: impl Into<Arc<[f64]>>, voltage: Vec<f64>) -> Result<Self> {
        let capacity_mah = capacity_mah.into();
        validate_grid(&capacity_mah)?;
        let curve = Self {
            capacity_mah,
            voltage,
        };
        curve.validate_voltage()?;
        Ok(curve)
    }

    /// Build a curve on an already validated grid.
    pub(crate) fn on_grid(capacity_mah: Arc<[f64]>, voltage: Vec<f64>) -> Self {
        debug_assert_eq!(capacity_mah.len(), voltage.len());
        Self {
            capacity_mah,
            voltage,
        }
    }

    /// Build a curve on an already validated grid, checking only the voltages.
    pub(crate) fn on_shared_grid(capacity_mah: Arc<[f64]>, voltage: Vec<f64>) -> Result<Self> {
        let curve = Self {
            capacity_mah,
            voltage,
        };
        curve.validate_voltage()?;
        Ok(curve)
    }

    /// New curve on the same capacity grid with different voltages.
    pub fn with_voltage(&self, voltage: Vec<f64>) -> Result<Self> {
        Self::on_shared_grid(Arc::clone(&self.capacity_mah), voltage)
    }

    pub fn len(&self) -> usize {
        self.voltage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voltage.is_empty()
    }

    pub fn capacity_mah(&self) -> &[f64] {
        &self.capacity_mah
    }

    pub fn voltage(&self) -> &[f64] {
        &self.voltage
    }

    pub(crate) fn grid(&self) -> &Arc<[f64]> {
        &self.capacity_mah
    }

    /// Iterate `(capacity_mah, voltage)` pairs in grid order.
    pub fn samples(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.capacity_mah
            .iter()
            .copied()
            .zip(self.voltage.iter().copied())
    }

    /// Lowest and highest voltage found anywhere on the curve.
    pub fn voltage_range(&self) -> (f64, f64) {
        self.voltage
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Index of the first sample holding the curve's global maximum voltage.
    pub fn peak_index(&self) -> usize {
        let mut peak = 0;
        for (index, &v) in self.voltage.iter().enumerate() {
            if v > self.voltage[peak] {
                peak = index;
            }
        }
        peak
    }

    /// True when both curves are sampled on an identical capacity grid.
    pub fn shares_grid_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.capacity_mah, &other.capacity_mah)
            || self.capacity_mah == other.capacity_mah
    }

    fn validate_voltage(&self) -> Result<()> {
        if self.voltage.len() != self.capacity_mah.len() {
            return Err(Error::integrity(format!(
                "curve has {} voltage samples for {} capacity points",
                self.voltage.len(),
                self.capacity_mah.len()
            )));
        }
        if let Some(index) = self.voltage.iter().position(|v| !v.is_finite()) {
            return Err(Error::integrity(format!(
                "voltage at sample {index} is not a finite number"
            )));
        }
        Ok(())
    }
}

/// Check that a capacity grid is non-empty, finite, and strictly increasing.
pub(crate) fn validate_grid(capacity_mah: &[f64]) -> Result<()> {
    if capacity_mah.is_empty() {
        return Err(Error::integrity("capacity grid is empty"));
    }
    if let Some(index) = capacity_mah.iter().position(|c| !c.is_finite()) {
        return Err(Error::integrity(format!(
            "capacity at sample {index} is not a finite number"
        )));
    }
    if let Some(index) = capacity_mah.windows(2).position(|w| w[1] <= w[0]) {
        return Err(Error::integrity(format!(
            "capacity grid is not strictly increasing at sample {}",
            index + 1
        )));
    }
    Ok(())
}
