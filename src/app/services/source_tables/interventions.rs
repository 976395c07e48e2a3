//! Intervention table
//!
//! One row per place and one column per day. A blank cell means "no change
//! since the previous day", so each row is expanded into a dense series by
//! carrying the last value forward.

use super::field_parsers::parse_header_date;
use super::{CsvTable, RawRow};
use crate::app::models::time_series::TimeSeries;
use crate::app::models::{Interventions, PlaceKey};
use crate::constants::{NO_INTERVENTION, sheet_columns};
use crate::{Error, Result};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

const SOURCE_NAME: &str = "intervention table";

/// Intervention history per raw province-level key, in table order
#[derive(Debug, Clone, PartialEq)]
pub struct InterventionTable {
    start_date: NaiveDate,
    days: usize,
    entries: Vec<(PlaceKey, TimeSeries<String>)>,
}

impl InterventionTable {
    /// Parse the intervention sheet
    ///
    /// # Errors
    /// `NonConsecutiveDates` when the date columns have a gap and
    /// `DuplicateInterventionRow` when a place appears twice.
    pub fn parse(body: &str) -> Result<Self> {
        let table = CsvTable::parse(SOURCE_NAME, body)?;
        table.require_columns(SOURCE_NAME, &[sheet_columns::COUNTRY, sheet_columns::PROVINCE])?;

        let mut date_columns: Vec<(NaiveDate, &str)> = table
            .headers
            .iter()
            .filter_map(|h| parse_header_date(h).map(|d| (d, h.as_str())))
            .collect();
        date_columns.sort();
        debug!("{} date columns in {}", date_columns.len(), SOURCE_NAME);

        let (start_date, _) = *date_columns.first().ok_or_else(|| {
            Error::data_validation(format!("The {} has no date columns", SOURCE_NAME))
        })?;
        for pair in date_columns.windows(2) {
            let (previous, next) = (pair[0].0, pair[1].0);
            if previous.succ_opt() != Some(next) {
                return Err(Error::NonConsecutiveDates { previous, next });
            }
        }

        let mut seen = BTreeSet::new();
        let mut entries = Vec::with_capacity(table.rows.len());
        for row in &table.rows {
            let key = PlaceKey::province_level(
                cell(row, sheet_columns::COUNTRY),
                cell(row, sheet_columns::PROVINCE),
            );
            if !seen.insert(key.clone()) {
                return Err(Error::DuplicateInterventionRow { place: key });
            }
            let cells = date_columns.iter().map(|(_, column)| cell(row, column));
            entries.push((key, TimeSeries::new(start_date, carry_forward(cells))));
        }

        Ok(Self {
            start_date,
            days: date_columns.len(),
            entries,
        })
    }

    pub fn from_entries(
        start_date: NaiveDate,
        days: usize,
        entries: Vec<(PlaceKey, TimeSeries<String>)>,
    ) -> Self {
        Self {
            start_date,
            days,
            entries,
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Number of date columns
    pub fn days(&self) -> usize {
        self.days
    }

    pub fn entries(&self) -> &[(PlaceKey, TimeSeries<String>)] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<(PlaceKey, TimeSeries<String>)> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Shared `"Unknown"` series over the table's dates
    pub fn unknown_sentinel(&self) -> Arc<TimeSeries<String>> {
        Interventions::unknown_sentinel(self.start_date, self.days)
    }
}

fn cell<'a>(row: &'a RawRow, column: &str) -> &'a str {
    row.get(column).map(|v| v.trim()).unwrap_or("")
}

/// Replace blank cells with the last non-blank value, or `"No Intervention"`
pub fn carry_forward<'a>(cells: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut previous = NO_INTERVENTION.to_string();
    cells
        .into_iter()
        .map(|cell| {
            if !cell.is_empty() {
                previous = cell.to_string();
            }
            previous.clone()
        })
        .collect()
}
