//! cellcurve library entry points.
//!
//! This crate loads a fixed set of measured battery discharge curves, estimates
//! the voltage-vs-capacity curve for any discharge rate and temperature within
//! the measured range, and computes the energy change between two voltage
//! setpoints for a single cell or an `NsMp` pack. Higher-level consumers (the
//! CLI) should only depend on the functions exported here instead of
//! reimplementing behavior.
//!

#![deny(warnings)]

pub mod capacity;
pub mod compose;
pub mod curve;
pub mod dataset;
pub mod energy;
pub mod error;
pub mod interpolate;
pub mod pack;

pub use capacity::find_capacity_at_voltage;
pub use compose::{compose_curves, interpolate_curve};
pub use curve::DischargeCurve;
pub use dataset::{
    default_dataset_path, load_reference_curves, resolve_dataset_path, DatasetSummary,
    ReferenceCurveSet, DATASET_ENV_VAR, REFERENCE_RATE, REFERENCE_TEMPERATURE_C,
};
pub use energy::{calculate_energy_change, estimate_energy_change, EnergyEstimate, EnergyRequest};
pub use error::{Error, Result};
pub use interpolate::{interpolate_axis, Axis, AxisKind};
pub use pack::{parse_pack_config, PackConfig};
