//! Source table parsing
//!
//! Turns the downloaded CSV bodies into typed tables: daily case reports
//! grouped by date, the population table, the intervention table and the
//! mobility report. Keys in these tables are still raw; canonicalisation
//! happens in the reconciler.

use crate::app::services::source_fetcher::RawSources;
use crate::{Error, Result};
use std::collections::HashMap;
use tracing::info;

pub mod case_reports;
pub mod field_parsers;
pub mod interventions;
pub mod mobility;
pub mod population;

#[cfg(test)]
mod tests;

pub use case_reports::{CaseRecord, CaseReports};
pub use interventions::InterventionTable;
pub use mobility::MobilityTable;
pub use population::PopulationTable;

/// One CSV row keyed by column name
pub type RawRow = HashMap<String, String>;

/// Header and rows of a parsed CSV body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl CsvTable {
    /// Parse a CSV body, stripping a UTF-8 byte-order mark
    ///
    /// Short rows are padded with blanks; cells beyond the header are ignored.
    pub fn parse(source_name: &str, body: &str) -> Result<Self> {
        let body = body.strip_prefix('\u{feff}').unwrap_or(body);
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(body.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| Error::csv_parsing(source_name, "Failed to read header row", Some(e)))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|e| {
                Error::csv_parsing(
                    source_name,
                    format!("Failed to read row {}", index + 2),
                    Some(e),
                )
            })?;
            let row: RawRow = headers
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    let cell = record.get(i).unwrap_or("").to_string();
                    (header.clone(), cell)
                })
                .collect();
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    /// Fail unless every column in `columns` is present
    pub fn require_columns(&self, source_name: &str, columns: &[&str]) -> Result<()> {
        match columns.iter().find(|c| !self.has_column(c)) {
            Some(missing) => Err(Error::missing_column(source_name, *missing)),
            None => Ok(()),
        }
    }
}

/// Every source, parsed
#[derive(Debug, Clone)]
pub struct SourceTables {
    pub case_reports: CaseReports,
    pub population: PopulationTable,
    pub interventions: InterventionTable,
    pub mobility: MobilityTable,
}

impl SourceTables {
    /// Parse the raw downloads
    pub fn parse(raw: &RawSources) -> Result<Self> {
        let case_reports = CaseReports::parse(&raw.case_reports)?;
        let population = PopulationTable::parse(&raw.population)?;
        let interventions = InterventionTable::parse(&raw.interventions)?;
        let mobility = MobilityTable::parse(&raw.mobility)?;

        info!(
            "Parsed {} report rows over {} days, {} population rows, {} intervention rows, {} mobility rows",
            case_reports.row_count(),
            case_reports.day_count(),
            population.len(),
            interventions.len(),
            mobility.len()
        );

        Ok(Self {
            case_reports,
            population,
            interventions,
            mobility,
        })
    }
}
