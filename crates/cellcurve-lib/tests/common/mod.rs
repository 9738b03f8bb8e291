//! Common test utilities and fixture helpers.

use std::path::PathBuf;

use cellcurve_lib::ReferenceCurveSet;

/// Path to fixtures directory used by tests.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Path to the reduced-resolution reference dataset.
pub fn fixture_dataset_path() -> PathBuf {
    fixtures_dir().join("discharge_curves.csv")
}

/// Load the fixture reference dataset.
#[allow(dead_code)]
pub fn fixture_curves() -> ReferenceCurveSet {
    ReferenceCurveSet::from_path(&fixture_dataset_path()).expect("fixture dataset loads")
}
