mod common;

use std::fs;

use cellcurve_lib::{load_reference_curves, Error, ReferenceCurveSet};
use tempfile::tempdir;

use common::{fixture_curves, fixture_dataset_path};

#[test]
fn loads_fixture_dataset() {
    let set = fixture_curves();

    assert_eq!(set.rate_axis().values(), &[0.2, 0.5, 1.0, 2.0]);
    assert_eq!(
        set.temperature_axis().values(),
        &[-20.0, -10.0, 0.0, 25.0, 40.0]
    );
    assert_eq!(set.capacity_grid().len(), 33);
    assert_eq!(set.capacity_grid()[0], 0.0);
    assert_eq!(set.capacity_grid()[32], 3200.0);
    assert_eq!(set.source_path(), Some(fixture_dataset_path().as_path()));
}

#[test]
fn every_curve_shares_the_capacity_grid() {
    let set = fixture_curves();
    let baseline = set.baseline();
    for curve in set
        .rate_axis()
        .curves()
        .iter()
        .chain(set.temperature_axis().curves())
    {
        assert!(curve.shares_grid_with(baseline));
    }
}

#[test]
fn summary_describes_baseline() {
    let summary = fixture_curves().summary();
    assert_eq!(summary.samples, 33);
    assert_eq!(summary.baseline_voltage_min, 3.06);
    assert_eq!(summary.baseline_voltage_max, 4.1061);

    let json = serde_json::to_value(&summary).expect("serializes");
    assert_eq!(json["rates"], serde_json::json!([0.2, 0.5, 1.0, 2.0]));
}

#[test]
fn explicit_path_wins_over_environment() {
    let set = load_reference_curves(Some(&fixture_dataset_path())).expect("loads");
    assert_eq!(set.capacity_grid().len(), 33);
}

#[test]
fn missing_file_is_reported_with_path() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("nope.csv");
    match ReferenceCurveSet::from_path(&path) {
        Err(Error::DatasetNotFound { path: reported }) => assert_eq!(reported, path),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn truncated_column_is_an_integrity_error() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("discharge_curves.csv");
    let mut content = fs::read_to_string(fixture_dataset_path()).expect("read fixture");
    content.push_str("3300.00,3.1\n");
    fs::write(&path, content).expect("write dataset");

    let err = ReferenceCurveSet::from_path(&path).expect_err("short row rejected");
    assert!(matches!(err, Error::DatasetIntegrity { .. }), "{err:?}");
}
