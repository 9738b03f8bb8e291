//! Linear interpolation along a single reference axis.
//!
//! A reference axis is an ordered list of condition values (discharge rates
//! at the reference temperature, or temperatures at the reference rate), each
//! paired with the curve measured under that condition. Interpolating at a
//! target value blends the two bracketing curves sample by sample.

use std::fmt;

use serde::Serialize;

use crate::curve::DischargeCurve;
use crate::error::{ensure_within, Error, Result};

/// Which operating condition an [`Axis`] varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisKind {
    Rate,
    Temperature,
}

impl AxisKind {
    /// Parameter name used in range errors.
    pub fn parameter(self) -> &'static str {
        match self {
            AxisKind::Rate => "rate",
            AxisKind::Temperature => "temperature",
        }
    }

    /// Prefix used for this axis' columns in the dataset file.
    pub fn column_prefix(self) -> &'static str {
        match self {
            AxisKind::Rate => "rate_",
            AxisKind::Temperature => "temp_",
        }
    }
}

impl fmt::Display for AxisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.parameter())
    }
}

/// Reference curves ordered by a strictly increasing condition value.
#[derive(Debug, Clone)]
pub struct Axis {
    kind: AxisKind,
    values: Vec<f64>,
    curves: Vec<DischargeCurve>,
}

impl Axis {
    /// Build an axis from `(value, curve)` points in any order.
    ///
    /// Points are sorted by value. At least two points are required, values
    /// must be finite and distinct, and every curve must share one grid.
    pub fn new(kind: AxisKind, mut points: Vec<(f64, DischargeCurve)>) -> Result<Self> {
        if points.len() < 2 {
            return Err(Error::integrity(format!(
                "{kind} axis needs at least two reference curves, found {}",
                points.len()
            )));
        }
        if let Some((value, _)) = points.iter().find(|(v, _)| !v.is_finite()) {
            return Err(Error::integrity(format!(
                "{kind} axis value {value} is not finite"
            )));
        }
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        if let Some(pair) = points.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(Error::integrity(format!(
                "{kind} axis lists value {} more than once",
                pair[0].0
            )));
        }
        let first = &points[0].1;
        if points.iter().any(|(_, c)| !c.shares_grid_with(first)) {
            return Err(Error::integrity(format!(
                "{kind} axis curves are not sampled on the same capacity grid"
            )));
        }

        let (values, curves) = points.into_iter().unzip();
        Ok(Self {
            kind,
            values,
            curves,
        })
    }

    pub fn kind(&self) -> AxisKind {
        self.kind
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn curves(&self) -> &[DischargeCurve] {
        &self.curves
    }

    /// Lowest and highest value on this axis.
    pub fn bounds(&self) -> (f64, f64) {
        (self.values[0], self.values[self.values.len() - 1])
    }

    /// Reference curve stored at exactly `value`, if any.
    pub fn curve_at(&self, value: f64) -> Option<&DischargeCurve> {
        self.values
            .iter()
            .position(|&v| v == value)
            .map(|index| &self.curves[index])
    }

    pub(crate) fn replace_curve(&mut self, index: usize, curve: DischargeCurve) {
        self.curves[index] = curve;
    }

    /// Index of the axis value nearest to `target`; ties go to the lower index.
    fn nearest_index(&self, target: f64) -> usize {
        let mut nearest = 0;
        let mut best = (self.values[0] - target).abs();
        for (index, &value) in self.values.iter().enumerate().skip(1) {
            let distance = (value - target).abs();
            if distance < best {
                nearest = index;
                best = distance;
            }
        }
        nearest
    }
}

/// Interpolate a curve at `target` along `axis`.
///
/// A target equal to an axis value returns that reference curve unchanged.
/// Anything else is a per-sample linear blend of the two bracketing curves;
/// the capacity grid is carried over as is.
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] naming the axis parameter when `target` lies
/// outside the axis bounds (or is NaN).
pub fn interpolate_axis(axis: &Axis, target: f64) -> Result<DischargeCurve> {
    let (min, max) = axis.bounds();
    // Must run before bracket selection so the neighbour lookup stays in bounds.
    ensure_within(axis.kind.parameter(), target, min, max)?;

    let nearest = axis.nearest_index(target);
    let nearest_value = axis.values[nearest];
    if target == nearest_value {
        return Ok(axis.curves[nearest].clone());
    }

    let (lower, upper) = if target > nearest_value {
        (nearest, nearest + 1)
    } else {
        (nearest - 1, nearest)
    };

    let lower_value = axis.values[lower];
    let t = (target - lower_value) / (axis.values[upper] - lower_value);
    let lower_curve = &axis.curves[lower];
    let upper_curve = &axis.curves[upper];

    let voltage = lower_curve
        .voltage()
        .iter()
        .zip(upper_curve.voltage())
        .map(|(&lo, &hi)| lo + t * (hi - lo))
        .collect();

    Ok(DischargeCurve::on_grid(
        lower_curve.grid().clone(),
        voltage,
    ))
}
