//! Daily case report rows
//!
//! The feed changed its column names and added a county column over time, so
//! every field is looked up through an ordered alias list.

use super::field_parsers::{Cell, first_present, parse_coordinate, parse_count};
use super::{CsvTable, RawRow};
use crate::Result;
use crate::app::models::{Metric, PlaceKey};
use crate::constants::field_aliases;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

/// Daily report rows grouped by report date
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseReports {
    days: BTreeMap<NaiveDate, Vec<RawRow>>,
}

impl CaseReports {
    /// Parse every downloaded daily report
    pub fn parse(bodies: &BTreeMap<NaiveDate, String>) -> Result<Self> {
        let mut days = BTreeMap::new();
        for (date, body) in bodies {
            let source_name = format!("daily report {}", date);
            let table = CsvTable::parse(&source_name, body)?;
            debug!("{}: {} rows", source_name, table.rows.len());
            days.insert(*date, table.rows);
        }
        Ok(Self { days })
    }

    pub fn from_rows(days: BTreeMap<NaiveDate, Vec<RawRow>>) -> Self {
        Self { days }
    }

    /// Days in date order with their rows
    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &Vec<RawRow>)> {
        self.days.iter()
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn row_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }
}

/// Fields extracted from one daily report row
#[derive(Debug, Clone, PartialEq)]
pub struct CaseRecord {
    /// Raw, uncanonicalised key
    pub key: PlaceKey,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub confirmed: Option<i64>,
    pub deaths: Option<i64>,
    pub recovered: Option<i64>,
    /// Count or coordinate cells that held unparsable text
    pub invalid_cells: usize,
}

impl CaseRecord {
    /// Extract a record from a row; `None` when the row names no country
    pub fn from_row(row: &RawRow) -> Option<Self> {
        let country = first_present(row, field_aliases::COUNTRY)?.trim();
        if country.is_empty() {
            return None;
        }
        let province = first_present(row, field_aliases::PROVINCE).unwrap_or("").trim();
        let district = first_present(row, field_aliases::DISTRICT).unwrap_or("").trim();

        let cells = [
            parse_count(first_present(row, field_aliases::CONFIRMED)),
            parse_count(first_present(row, field_aliases::DEATHS)),
            parse_count(first_present(row, field_aliases::RECOVERED)),
        ];
        let latitude = parse_coordinate(first_present(row, field_aliases::LATITUDE));
        let longitude = parse_coordinate(first_present(row, field_aliases::LONGITUDE));

        let invalid_cells = cells.iter().filter(|c| c.is_invalid()).count()
            + usize::from(latitude.is_invalid())
            + usize::from(longitude.is_invalid());
        let [confirmed, deaths, recovered] = cells.map(Cell::value);

        Some(Self {
            key: PlaceKey::new(country, province, district),
            latitude: latitude.value(),
            longitude: longitude.value(),
            confirmed,
            deaths,
            recovered,
            invalid_cells,
        })
    }

    pub fn count(&self, metric: Metric) -> Option<i64> {
        match metric {
            Metric::Confirmed => self.confirmed,
            Metric::Deaths => self.deaths,
            Metric::Recovered => self.recovered,
        }
    }

    /// Both coordinates, only when both parsed
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}
