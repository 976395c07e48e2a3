//! Places command: report on the places in a saved snapshot

use super::shared::{load_configuration, setup_logging};
use crate::app::models::{Metric, Place};
use crate::app::services::output_writer::Snapshot;
use crate::cli::args::{OutputFormat, PlacesArgs};
use crate::{Error, Result};
use colored::*;
use serde::Serialize;
use std::io::Write;
use tracing::{debug, info};

/// One line of the place listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceSummary {
    pub country: String,
    pub province: String,
    pub district: String,
    pub population: Option<u64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Values on the last day of the snapshot
    pub confirmed: i64,
    pub deaths: i64,
    pub recovered: i64,
    /// Latest intervention, `None` when the place only has the unknown sentinel
    pub intervention: Option<String>,
}

impl PlaceSummary {
    pub fn from_place(place: &Place) -> Self {
        let latest = |metric: Metric| place.series(metric).values().last().copied().unwrap_or(0);
        let key = place.key();
        Self {
            country: key.country.clone(),
            province: key.province.clone(),
            district: key.district.clone(),
            population: place.population,
            latitude: place.latitude,
            longitude: place.longitude,
            confirmed: latest(Metric::Confirmed),
            deaths: latest(Metric::Deaths),
            recovered: latest(Metric::Recovered),
            intervention: (!place.interventions.is_unknown())
                .then(|| place.interventions.series().values().last().cloned())
                .flatten(),
        }
    }
}

/// Places command runner
pub fn run_places(args: PlacesArgs) -> Result<()> {
    setup_logging(args.get_log_level(), false)?;
    args.validate()?;

    let snapshot_path = match &args.snapshot_path {
        Some(path) => path.clone(),
        None => load_configuration(args.config_file.as_deref())?.output.snapshot_path,
    };
    info!("Reading snapshot {}", snapshot_path.display());
    let snapshot = Snapshot::load(&snapshot_path)?;
    debug!(
        "Snapshot created {} with {} places",
        snapshot.created_at,
        snapshot.len()
    );

    let summaries = select_places(&snapshot, &args);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.output_format {
        OutputFormat::Human => write_human(&mut out, &snapshot, &summaries),
        OutputFormat::Json => write_json(&mut out, &summaries),
        OutputFormat::Csv => write_csv(&mut out, &summaries),
    }
}

/// Apply the country filter and the `--top` limit
pub fn select_places(snapshot: &Snapshot, args: &PlacesArgs) -> Vec<PlaceSummary> {
    let mut summaries: Vec<PlaceSummary> = snapshot
        .places
        .values()
        .filter(|p| {
            args.country
                .as_deref()
                .is_none_or(|country| p.key().country.eq_ignore_ascii_case(country))
        })
        .map(PlaceSummary::from_place)
        .collect();

    if let Some(top) = args.top {
        summaries.sort_by(|a, b| b.confirmed.cmp(&a.confirmed));
        summaries.truncate(top);
    }
    summaries
}

fn write_failed(e: std::io::Error) -> Error {
    Error::io("Failed to write place listing", e)
}

fn write_human<W: Write>(out: &mut W, snapshot: &Snapshot, summaries: &[PlaceSummary]) -> Result<()> {
    writeln!(
        out,
        "{} ({} to {}, created {})",
        "Places".bright_green().bold(),
        snapshot.date_range.start(),
        snapshot.date_range.last(),
        snapshot.created_at.format("%Y-%m-%d %H:%M")
    )
    .map_err(write_failed)?;

    for place in summaries {
        let name = [&place.district, &place.province, &place.country]
            .into_iter()
            .filter(|part| !part.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let population = place
            .population
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "  {:<45} {:>10} confirmed {:>8} deaths  population {}",
            name.bright_cyan(),
            place.confirmed.to_string().bright_white(),
            place.deaths,
            population
        )
        .map_err(write_failed)?;
    }
    writeln!(out, "{} places", summaries.len()).map_err(write_failed)?;
    Ok(())
}

fn write_json<W: Write>(out: &mut W, summaries: &[PlaceSummary]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, summaries)
        .map_err(|e| Error::data_validation(format!("Failed to encode place listing: {}", e)))?;
    writeln!(out).map_err(write_failed)
}

fn write_csv<W: Write>(out: &mut W, summaries: &[PlaceSummary]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for place in summaries {
        writer
            .serialize(place)
            .map_err(|e| Error::csv_parsing("place listing", "Failed to write record", Some(e)))?;
    }
    writer.flush().map_err(write_failed)
}
