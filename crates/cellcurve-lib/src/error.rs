use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the cellcurve library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A rate, temperature, or voltage argument falls outside the supported range.
    #[error("{parameter} {value} is outside the supported range [{min}, {max}]")]
    OutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Raised when a pack configuration token does not match `<series>s<parallel>p`.
    #[error("invalid pack configuration '{token}'; expected <series>s<parallel>p, e.g. 2s3p")]
    InvalidPackConfig { token: String },

    /// Raised when the reference dataset is missing a curve or its sampling grids disagree.
    #[error("reference dataset integrity check failed: {message}")]
    DatasetIntegrity { message: String },

    /// Dataset could not be located at the resolved path.
    #[error("dataset not found at {path}")]
    DatasetNotFound { path: PathBuf },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for the reference dataset")]
    DataDirsUnavailable,

    /// Curve composition would divide by a zero baseline voltage.
    #[error("baseline voltage is zero at sample {index} ({capacity_mah} mAh); scaling factors are undefined")]
    ZeroBaselineVoltage { index: usize, capacity_mah: f64 },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn integrity(message: impl Into<String>) -> Self {
        Error::DatasetIntegrity {
            message: message.into(),
        }
    }
}

/// Fail with [`Error::OutOfRange`] unless `value` lies within `[min, max]`.
///
/// NaN never lies within a range and is always rejected.
pub(crate) fn ensure_within(parameter: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(Error::OutOfRange {
            parameter,
            value,
            min,
            max,
        })
    }
}
