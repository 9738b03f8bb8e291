//! Reference curve store: loading, validation, and dataset path resolution.
//!
//! The reference dataset is a CSV file with one capacity column and nine
//! voltage columns:
//!
//! ```text
//! capacity_mah,rate_0.2,rate_0.5,rate_1,rate_2,temp_-20,temp_-10,temp_0,temp_25,temp_40
//! ```
//!
//! `rate_*` columns are measured at the reference temperature and `temp_*`
//! columns at the reference rate, so `rate_1` and `temp_25` describe the same
//! baseline condition and must agree.

use std::env;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use csv::{ReaderBuilder, Trim};
use directories::ProjectDirs;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::curve::{validate_grid, DischargeCurve};
use crate::error::{Error, Result};
use crate::interpolate::{Axis, AxisKind};

/// Discharge rate (C) of the baseline curve.
pub const REFERENCE_RATE: f64 = 1.0;

/// Temperature (°C) of the baseline curve.
pub const REFERENCE_TEMPERATURE_C: f64 = 25.0;

/// Rates expected on the rate axis of the dataset file.
pub const RATE_AXIS_VALUES: [f64; 4] = [0.2, 0.5, 1.0, 2.0];

/// Temperatures (°C) expected on the temperature axis of the dataset file.
pub const TEMPERATURE_AXIS_VALUES: [f64; 5] = [-20.0, -10.0, 0.0, 25.0, 40.0];

/// Largest per-sample difference tolerated between the two baseline columns.
pub const BASELINE_TOLERANCE_V: f64 = 1e-9;

/// Environment variable overriding the dataset location.
pub const DATASET_ENV_VAR: &str = "CELLCURVE_DATASET";

/// Default filename for the reference dataset.
const DATASET_FILENAME: &str = "discharge_curves.csv";

const CAPACITY_COLUMN: &str = "capacity_mah";

/// Immutable set of reference discharge curves along the rate and temperature axes.
///
/// Loaded once and shared by reference; every query is a pure function of the
/// set and its arguments, so a `&ReferenceCurveSet` can be used from many
/// threads at once.
#[derive(Debug, Clone)]
pub struct ReferenceCurveSet {
    capacity_mah: Arc<[f64]>,
    rate_axis: Axis,
    temperature_axis: Axis,
    baseline: DischargeCurve,
    source: Option<PathBuf>,
}

/// Serializable overview of a loaded dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub samples: usize,
    pub capacity_min_mah: f64,
    pub capacity_max_mah: f64,
    pub rates: Vec<f64>,
    pub temperatures_c: Vec<f64>,
    pub baseline_voltage_min: f64,
    pub baseline_voltage_max: f64,
}

impl ReferenceCurveSet {
    /// Build a curve set from in-memory voltage columns.
    ///
    /// `rate_curves` are `(rate, voltages)` measured at the reference
    /// temperature; `temperature_curves` are `(temperature, voltages)` measured
    /// at the reference rate. Both must contain the baseline condition, and
    /// every column must match the capacity grid in length.
    pub fn new(
        capacity_mah: Vec<f64>,
        rate_curves: Vec<(f64, Vec<f64>)>,
        temperature_curves: Vec<(f64, Vec<f64>)>,
    ) -> Result<Self> {
        validate_grid(&capacity_mah)?;
        let grid: Arc<[f64]> = capacity_mah.into();

        let rate_axis = build_axis(AxisKind::Rate, &grid, rate_curves)?;
        let mut temperature_axis =
            build_axis(AxisKind::Temperature, &grid, temperature_curves)?;

        let baseline = rate_axis
            .curve_at(REFERENCE_RATE)
            .cloned()
            .ok_or_else(|| {
                Error::integrity(format!(
                    "rate axis is missing the baseline curve at {REFERENCE_RATE}C"
                ))
            })?;
        let temperature_index = temperature_axis
            .values()
            .iter()
            .position(|&t| t == REFERENCE_TEMPERATURE_C)
            .ok_or_else(|| {
                Error::integrity(format!(
                    "temperature axis is missing the baseline curve at {REFERENCE_TEMPERATURE_C}°C"
                ))
            })?;

        let deviation = baseline
            .voltage()
            .iter()
            .zip(temperature_axis.curves()[temperature_index].voltage())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0_f64, f64::max);
        if deviation > BASELINE_TOLERANCE_V {
            return Err(Error::integrity(format!(
                "baseline curves disagree: rate {REFERENCE_RATE}C and temperature \
                 {REFERENCE_TEMPERATURE_C}°C differ by up to {deviation} V"
            )));
        }
        if deviation > 0.0 {
            warn!(
                deviation,
                "baseline columns differ within tolerance; using the rate-axis curve"
            );
        }
        // Both axes resolve the baseline condition to the very same samples.
        temperature_axis.replace_curve(temperature_index, baseline.clone());

        Ok(Self {
            capacity_mah: grid,
            rate_axis,
            temperature_axis,
            baseline,
            source: None,
        })
    }

    /// Load the reference dataset from a CSV file.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::DatasetNotFound {
                path: path.to_path_buf(),
            });
        }
        debug!(path = %path.display(), "loading reference dataset");
        let file = fs::File::open(path)?;
        let mut set = Self::from_reader(file)?;
        set.source = Some(path.to_path_buf());
        info!(
            path = %path.display(),
            samples = set.capacity_mah.len(),
            "reference dataset loaded"
        );
        Ok(set)
    }

    /// Load the reference dataset from a reader (e.g., file or in-memory buffer).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::Fields).from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|err| Error::integrity(format!("failed to read dataset headers: {err}")))?
            .clone();
        let layout = ColumnLayout::from_headers(headers.iter())?;

        let mut capacity = Vec::new();
        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); layout.curves.len()];

        let mut row_num: usize = 1;
        for result in csv_reader.records() {
            row_num += 1;
            let record = result.map_err(|err| Error::integrity(err.to_string()))?;

            let cell = |index: usize, name: &str| -> Result<f64> {
                let raw = record.get(index).ok_or_else(|| {
                    Error::integrity(format!("missing {name} at row {row_num}"))
                })?;
                let value = raw.parse::<f64>().map_err(|err| {
                    Error::integrity(format!("invalid {name} at row {row_num}: {err}"))
                })?;
                if !value.is_finite() {
                    return Err(Error::integrity(format!(
                        "{name} at row {row_num} is not a finite number"
                    )));
                }
                Ok(value)
            };

            capacity.push(cell(layout.capacity, CAPACITY_COLUMN)?);
            for (column, spec) in columns.iter_mut().zip(&layout.curves) {
                column.push(cell(spec.index, &spec.name)?);
            }
        }

        let mut rate_curves = Vec::new();
        let mut temperature_curves = Vec::new();
        for (spec, voltages) in layout.curves.into_iter().zip(columns) {
            match spec.kind {
                AxisKind::Rate => rate_curves.push((spec.value, voltages)),
                AxisKind::Temperature => temperature_curves.push((spec.value, voltages)),
            }
        }

        Self::new(capacity, rate_curves, temperature_curves)
    }

    pub fn rate_axis(&self) -> &Axis {
        &self.rate_axis
    }

    pub fn temperature_axis(&self) -> &Axis {
        &self.temperature_axis
    }

    /// Curve at the reference rate and temperature, shared by both axes.
    pub fn baseline(&self) -> &DischargeCurve {
        &self.baseline
    }

    pub fn capacity_grid(&self) -> &[f64] {
        &self.capacity_mah
    }

    /// Get the source path if the set was loaded from a file.
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn summary(&self) -> DatasetSummary {
        let (baseline_voltage_min, baseline_voltage_max) = self.baseline.voltage_range();
        DatasetSummary {
            source: self.source.as_ref().map(|p| p.display().to_string()),
            samples: self.capacity_mah.len(),
            capacity_min_mah: self.capacity_mah[0],
            capacity_max_mah: self.capacity_mah[self.capacity_mah.len() - 1],
            rates: self.rate_axis.values().to_vec(),
            temperatures_c: self.temperature_axis.values().to_vec(),
            baseline_voltage_min,
            baseline_voltage_max,
        }
    }
}

fn build_axis(
    kind: AxisKind,
    grid: &Arc<[f64]>,
    columns: Vec<(f64, Vec<f64>)>,
) -> Result<Axis> {
    let points = columns
        .into_iter()
        .map(|(value, voltage)| {
            let curve = DischargeCurve::on_shared_grid(grid.clone(), voltage).map_err(|err| {
                Error::integrity(format!("{}{value}: {err}", kind.column_prefix()))
            })?;
            Ok((value, curve))
        })
        .collect::<Result<Vec<_>>>()?;
    Axis::new(kind, points)
}

/// Where each expected column lives in the dataset header.
struct ColumnLayout {
    capacity: usize,
    curves: Vec<CurveColumn>,
}

struct CurveColumn {
    name: String,
    index: usize,
    kind: AxisKind,
    value: f64,
}

impl ColumnLayout {
    fn from_headers<'a>(headers: impl Iterator<Item = &'a str>) -> Result<Self> {
        let mut capacity = None;
        let mut curves: Vec<CurveColumn> = Vec::new();

        for (index, header) in headers.enumerate() {
            let name = header.trim().to_ascii_lowercase();
            if name == CAPACITY_COLUMN {
                if capacity.replace(index).is_some() {
                    return Err(Error::integrity(format!(
                        "duplicate column '{CAPACITY_COLUMN}'"
                    )));
                }
                continue;
            }

            let (kind, value) = parse_curve_header(&name).ok_or_else(|| {
                Error::integrity(format!("unexpected column '{}'", header.trim()))
            })?;
            if curves.iter().any(|c| c.kind == kind && c.value == value) {
                return Err(Error::integrity(format!("duplicate column '{name}'")));
            }
            curves.push(CurveColumn {
                name,
                index,
                kind,
                value,
            });
        }

        let capacity = capacity.ok_or_else(|| {
            Error::integrity(format!("missing required column '{CAPACITY_COLUMN}'"))
        })?;

        let expected = RATE_AXIS_VALUES
            .iter()
            .map(|&v| (AxisKind::Rate, v))
            .chain(
                TEMPERATURE_AXIS_VALUES
                    .iter()
                    .map(|&v| (AxisKind::Temperature, v)),
            );
        let missing: Vec<String> = expected
            .filter(|(kind, value)| !curves.iter().any(|c| c.kind == *kind && c.value == *value))
            .map(|(kind, value)| format!("{}{value}", kind.column_prefix()))
            .collect();
        if !missing.is_empty() {
            return Err(Error::integrity(format!(
                "dataset missing required columns: {}",
                missing.join(", ")
            )));
        }

        if let Some(extra) = curves.iter().find(|c| {
            let known: &[f64] = match c.kind {
                AxisKind::Rate => &RATE_AXIS_VALUES,
                AxisKind::Temperature => &TEMPERATURE_AXIS_VALUES,
            };
            !known.contains(&c.value)
        }) {
            return Err(Error::integrity(format!(
                "unexpected column '{}'",
                extra.name
            )));
        }

        Ok(Self { capacity, curves })
    }
}

/// Parse `rate_<C>` or `temp_<°C>` into an axis point.
fn parse_curve_header(name: &str) -> Option<(AxisKind, f64)> {
    [AxisKind::Rate, AxisKind::Temperature]
        .into_iter()
        .find_map(|kind| {
            let value = name.strip_prefix(kind.column_prefix())?.parse::<f64>().ok()?;
            value.is_finite().then_some((kind, value))
        })
}

/// Resolve the default dataset location using platform-specific project directories.
pub fn default_dataset_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("org", "cellcurve", "cellcurve").ok_or(Error::DataDirsUnavailable)?;
    Ok(dirs.data_dir().join(DATASET_FILENAME))
}

/// Resolve where the reference dataset should be read from.
///
/// The resolution order is:
/// 1. Explicit `target` argument when provided.
/// 2. `CELLCURVE_DATASET` environment variable.
/// 3. Platform-specific project data directory.
///
/// A directory target resolves to the default filename inside it.
pub fn resolve_dataset_path(target: Option<&Path>) -> Result<PathBuf> {
    let resolved = if let Some(explicit) = target {
        explicit.to_path_buf()
    } else if let Some(env_path) = env::var_os(DATASET_ENV_VAR) {
        PathBuf::from(env_path)
    } else {
        default_dataset_path()?
    };

    let resolved = if resolved.is_dir() {
        resolved.join(DATASET_FILENAME)
    } else {
        resolved
    };
    debug!(path = %resolved.display(), "resolved reference dataset path");

    if resolved.exists() {
        Ok(resolved)
    } else {
        Err(Error::DatasetNotFound { path: resolved })
    }
}

/// Resolve the dataset location and load it.
pub fn load_reference_curves(target: Option<&Path>) -> Result<ReferenceCurveSet> {
    let path = resolve_dataset_path(target)?;
    ReferenceCurveSet::from_path(&path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "capacity_mah,rate_0.2,rate_0.5,rate_1,rate_2,temp_-20,temp_-10,temp_0,temp_25,temp_40\n";

    fn csv(rows: &[&str]) -> String {
        let mut out = HEADER.to_string();
        for row in rows {
            out.push_str(row);
            out.push('\n');
        }
        out
    }

    fn valid_rows() -> Vec<&'static str> {
        vec![
            "0,4.20,4.15,4.10,4.00,3.60,3.75,3.90,4.10,4.12",
            "100,4.00,3.95,3.90,3.80,3.40,3.55,3.70,3.90,3.92",
            "200,3.60,3.55,3.50,3.40,3.00,3.15,3.30,3.50,3.52",
        ]
    }

    #[test]
    fn parses_curve_headers() {
        assert_eq!(parse_curve_header("rate_0.2"), Some((AxisKind::Rate, 0.2)));
        assert_eq!(
            parse_curve_header("temp_-20"),
            Some((AxisKind::Temperature, -20.0))
        );
        assert_eq!(parse_curve_header("voltage"), None);
        assert_eq!(parse_curve_header("rate_inf"), None);
    }

    #[test]
    fn loads_nine_column_dataset() {
        let set = ReferenceCurveSet::from_reader(csv(&valid_rows()).as_bytes()).expect("loads");
        assert_eq!(set.rate_axis().values(), &RATE_AXIS_VALUES);
        assert_eq!(set.temperature_axis().values(), &TEMPERATURE_AXIS_VALUES);
        assert_eq!(set.capacity_grid(), &[0.0, 100.0, 200.0]);
        assert_eq!(set.baseline().voltage(), &[4.10, 3.90, 3.50]);
    }

    #[test]
    fn accepts_reordered_columns() {
        let data = "temp_40,rate_1,capacity_mah,rate_0.2,rate_0.5,rate_2,temp_-20,temp_-10,temp_0,temp_25\n\
                    4.12,4.10,0,4.20,4.15,4.00,3.60,3.75,3.90,4.10\n\
                    3.92,3.90,100,4.00,3.95,3.80,3.40,3.55,3.70,3.90\n";
        let set = ReferenceCurveSet::from_reader(data.as_bytes()).expect("loads");
        assert_eq!(set.baseline().voltage(), &[4.10, 3.90]);
    }

    #[test]
    fn rejects_missing_curve() {
        let data = "capacity_mah,rate_0.2,rate_1,rate_2,temp_-20,temp_-10,temp_0,temp_25,temp_40\n\
                    0,4.2,4.1,4.0,3.6,3.75,3.9,4.1,4.12\n";
        let err = ReferenceCurveSet::from_reader(data.as_bytes()).expect_err("missing rate_0.5");
        match err {
            Error::DatasetIntegrity { message } => assert!(message.contains("rate_0.5")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_column() {
        let data = HEADER.trim_end().to_string() + ",rate_3\n0,4.2,4.15,4.1,4.0,3.6,3.75,3.9,4.1,4.12,3.9\n";
        let err = ReferenceCurveSet::from_reader(data.as_bytes()).expect_err("rate_3 is unknown");
        assert!(err.to_string().contains("rate_3"));
    }

    #[test]
    fn rejects_unparsable_cell_with_row_number() {
        let mut rows = valid_rows();
        rows[1] = "100,4.00,oops,3.90,3.80,3.40,3.55,3.70,3.90,3.92";
        let err = ReferenceCurveSet::from_reader(csv(&rows).as_bytes()).expect_err("bad cell");
        let message = err.to_string();
        assert!(message.contains("rate_0.5"), "{message}");
        assert!(message.contains("row 3"), "{message}");
    }

    #[test]
    fn rejects_non_increasing_capacity() {
        let mut rows = valid_rows();
        rows[2] = "100,3.60,3.55,3.50,3.40,3.00,3.15,3.30,3.50,3.52";
        let err = ReferenceCurveSet::from_reader(csv(&rows).as_bytes()).expect_err("grid");
        assert!(matches!(err, Error::DatasetIntegrity { .. }));
    }

    #[test]
    fn rejects_disagreeing_baseline_columns() {
        let mut rows = valid_rows();
        rows[0] = "0,4.20,4.15,4.10,4.00,3.60,3.75,3.90,4.11,4.12";
        let err = ReferenceCurveSet::from_reader(csv(&rows).as_bytes()).expect_err("baseline");
        assert!(err.to_string().contains("baseline curves disagree"));
    }

    #[test]
    fn baseline_is_shared_by_both_axes() {
        let set = ReferenceCurveSet::from_reader(csv(&valid_rows()).as_bytes()).expect("loads");
        let from_temperature = set
            .temperature_axis()
            .curve_at(REFERENCE_TEMPERATURE_C)
            .expect("baseline on temperature axis");
        assert_eq!(from_temperature, set.baseline());
    }

    #[test]
    fn summary_reports_axes_and_bounds() {
        let set = ReferenceCurveSet::from_reader(csv(&valid_rows()).as_bytes()).expect("loads");
        let summary = set.summary();
        assert_eq!(summary.samples, 3);
        assert_eq!(summary.capacity_max_mah, 200.0);
        assert_eq!(summary.baseline_voltage_min, 3.50);
        assert_eq!(summary.baseline_voltage_max, 4.10);
        assert!(summary.source.is_none());
    }

    #[test]
    fn resolve_reports_missing_explicit_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("absent.csv");
        match resolve_dataset_path(Some(&missing)) {
            Err(Error::DatasetNotFound { path }) => assert_eq!(path, missing),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn resolve_directory_uses_default_filename() {
        let dir = tempfile::tempdir().expect("temp dir");
        let file = dir.path().join(DATASET_FILENAME);
        fs::write(&file, csv(&valid_rows())).expect("write dataset");
        let resolved = resolve_dataset_path(Some(dir.path())).expect("resolves");
        assert_eq!(resolved, file);
    }
}
