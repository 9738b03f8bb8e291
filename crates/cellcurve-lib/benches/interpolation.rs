use cellcurve_lib::{
    calculate_energy_change, find_capacity_at_voltage, interpolate_curve, DischargeCurve,
    ReferenceCurveSet,
};
use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;
use std::hint::black_box;
use std::path::PathBuf;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/discharge_curves.csv")
}

static CURVES: Lazy<ReferenceCurveSet> =
    Lazy::new(|| ReferenceCurveSet::from_path(&fixture_path()).expect("fixture loads"));
static OFF_GRID_CURVE: Lazy<DischargeCurve> =
    Lazy::new(|| interpolate_curve(&CURVES, 0.75, 10.0).expect("in range"));

fn benchmark_interpolation(c: &mut Criterion) {
    let set = &*CURVES;

    c.bench_function("interpolate_baseline", |b| {
        b.iter(|| {
            let curve = interpolate_curve(set, black_box(1.0), black_box(25.0)).expect("in range");
            black_box(curve.len())
        });
    });

    c.bench_function("interpolate_off_grid", |b| {
        b.iter(|| {
            let curve = interpolate_curve(set, black_box(0.75), black_box(10.0)).expect("in range");
            black_box(curve.voltage_range())
        });
    });

    c.bench_function("capacity_lookup", |b| {
        let curve = &*OFF_GRID_CURVE;
        b.iter(|| find_capacity_at_voltage(curve, black_box(3.5)).expect("in range"));
    });

    c.bench_function("energy_change_2s3p", |b| {
        b.iter(|| {
            calculate_energy_change(set, 1.5, 0.0, black_box(7.2), black_box(6.0), Some("2s3p"))
                .expect("in range")
        });
    });
}

criterion_group!(benches, benchmark_interpolation);
criterion_main!(benches);
