//! Wide per-metric CSV files
//!
//! One row per province- or country-level place with at least one confirmed
//! case: `Province/State, Country/Region, Lat, Long` followed by one column
//! per date.

use crate::app::models::time_series::DateRange;
use crate::app::models::{Metric, Place, PlaceKey};
use crate::constants::{LEGACY_CSV_DATE_FORMAT, LEGACY_CSV_HEADERS};
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Places that belong in the legacy files
fn exported(places: &BTreeMap<PlaceKey, Place>) -> impl Iterator<Item = &Place> {
    places
        .values()
        .filter(|p| !p.key().is_district() && p.total_confirmed() != 0)
}

/// Write one metric for every exported place to `writer`
///
/// Returns the number of place rows written.
pub fn write_metric_csv<W: Write>(
    writer: W,
    places: &BTreeMap<PlaceKey, Place>,
    metric: Metric,
    dates: &DateRange,
) -> Result<usize> {
    let source_name = format!("{} CSV", metric);
    let write_failed =
        |e: csv::Error| Error::csv_parsing(source_name.as_str(), "Failed to write record", Some(e));
    let mut csv_writer = csv::Writer::from_writer(writer);

    let header: Vec<String> = LEGACY_CSV_HEADERS
        .iter()
        .map(|h| h.to_string())
        .chain(dates.iter().map(|d| d.format(LEGACY_CSV_DATE_FORMAT).to_string()))
        .collect();
    csv_writer.write_record(&header).map_err(write_failed)?;

    let mut rows = 0;
    for place in exported(places) {
        let key = place.key();
        let series = place.series(metric);
        let mut record = vec![
            key.province.clone(),
            key.country.clone(),
            place.latitude.map(|v| v.to_string()).unwrap_or_default(),
            place.longitude.map(|v| v.to_string()).unwrap_or_default(),
        ];
        for date in dates.iter() {
            let value = series.get(date).copied().unwrap_or_default();
            record.push(value.to_string());
        }
        csv_writer.write_record(&record).map_err(write_failed)?;
        rows += 1;
    }

    csv_writer
        .flush()
        .map_err(|e| Error::io(format!("Failed to flush {}", source_name), e))?;
    Ok(rows)
}

/// Write the confirmed, deaths and recovered files to `paths`, in that order
pub fn write_legacy_csvs(
    places: &BTreeMap<PlaceKey, Place>,
    dates: &DateRange,
    paths: &[PathBuf; 3],
) -> Result<usize> {
    let mut rows = 0;
    for (metric, path) in Metric::ALL.into_iter().zip(paths) {
        rows = write_metric_file(path, places, metric, dates)?;
        debug!("Wrote {} {} rows to {}", rows, metric, path.display());
    }
    Ok(rows)
}

fn write_metric_file(
    path: &Path,
    places: &BTreeMap<PlaceKey, Place>,
    metric: Metric,
    dates: &DateRange,
) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| Error::io(format!("Failed to create directory {}", parent.display()), e))?;
    }
    let file = fs::File::create(path)
        .map_err(|e| Error::io(format!("Failed to create {}", path.display()), e))?;
    write_metric_csv(std::io::BufWriter::new(file), places, metric, dates)
}
