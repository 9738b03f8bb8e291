// Handlers for the CLI subcommands. main.rs parses arguments and dispatches
// here; each handler loads the dataset, runs one library operation and prints
// the result in the selected format.

pub mod capacity;
pub mod curve;
pub mod energy;
pub mod info;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use cellcurve_lib::{load_reference_curves, Error as LibError, ReferenceCurveSet, DATASET_ENV_VAR};

/// Load the reference curves for a command.
///
/// Resolution follows the library order (`--dataset`, `CELLCURVE_DATASET`,
/// platform data dir). Debug builds fall back to the bundled fixture when the
/// platform data file is missing and nothing was configured explicitly.
pub fn load_curves(dataset: Option<&Path>) -> Result<ReferenceCurveSet> {
    match load_reference_curves(dataset) {
        Err(LibError::DatasetNotFound { path })
            if dataset.is_none()
                && std::env::var_os(DATASET_ENV_VAR).is_none()
                && cfg!(debug_assertions) =>
        {
            let fixture = fixture_dataset();
            debug!(
                missing = %path.display(),
                fixture = %fixture.display(),
                "falling back to fixture dataset"
            );
            load_reference_curves(Some(&fixture)).with_context(|| {
                format!("failed to load fixture dataset from {}", fixture.display())
            })
        }
        result => result.context(
            "failed to load the reference dataset; pass --dataset or set CELLCURVE_DATASET",
        ),
    }
}

fn fixture_dataset() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/discharge_curves.csv")
}

/// Print rendered output, adding a trailing newline only when missing.
pub fn emit(rendered: &str) {
    if rendered.ends_with('\n') {
        print!("{rendered}");
    } else {
        println!("{rendered}");
    }
}
