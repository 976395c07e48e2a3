//! Persistence of reconciled places
//!
//! Two outputs are produced:
//!
//! - [`snapshot`] - bincode-encoded [`Snapshot`] of every place, read back by
//!   the `places` command
//! - [`legacy_csv`] - the wide `time_series_*.csv` files in the layout of the
//!   original CSSE time series, one file per metric
//!
//! [`write_outputs`] writes whatever the [`OutputConfig`] asks for.

use crate::app::models::time_series::DateRange;
use crate::app::models::{Place, PlaceKey};
use crate::config::OutputConfig;
use crate::Result;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;

pub mod legacy_csv;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use legacy_csv::{write_legacy_csvs, write_metric_csv};
pub use snapshot::Snapshot;

/// Files written by [`write_outputs`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WrittenOutputs {
    pub snapshot_path: PathBuf,
    pub csv_paths: Vec<PathBuf>,
    /// Places that made it into the CSV files
    pub csv_rows: usize,
}

impl WrittenOutputs {
    pub fn all_paths(&self) -> impl Iterator<Item = &PathBuf> {
        std::iter::once(&self.snapshot_path).chain(&self.csv_paths)
    }
}

/// Write the snapshot and, when enabled, the legacy CSV files
pub fn write_outputs(
    places: &BTreeMap<PlaceKey, Place>,
    date_range: DateRange,
    output: &OutputConfig,
) -> Result<WrittenOutputs> {
    let snapshot = Snapshot::new(date_range, places.clone());
    snapshot.save(&output.snapshot_path)?;
    info!(
        "Wrote snapshot of {} places to {}",
        snapshot.len(),
        output.snapshot_path.display()
    );

    let mut written = WrittenOutputs {
        snapshot_path: output.snapshot_path.clone(),
        ..WrittenOutputs::default()
    };
    if output.write_csvs {
        let paths = output.csv_paths();
        written.csv_rows = write_legacy_csvs(places, &date_range, &paths)?;
        written.csv_paths = paths.to_vec();
    }
    Ok(written)
}
