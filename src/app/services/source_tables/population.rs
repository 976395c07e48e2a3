//! Population table

use super::{CsvTable, RawRow};
use super::field_parsers::parse_population;
use crate::Result;
use crate::app::models::PlaceKey;
use crate::constants::sheet_columns;
use tracing::warn;

const SOURCE_NAME: &str = "population table";

fn cell<'a>(row: &'a RawRow, column: &str) -> &'a str {
    row.get(column).map(|v| v.trim()).unwrap_or("")
}

/// Population per raw province-level key, in table order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopulationTable {
    entries: Vec<(PlaceKey, u64)>,
    skipped_rows: usize,
}

impl PopulationTable {
    /// Parse the population sheet; rows with unreadable figures are skipped
    pub fn parse(body: &str) -> Result<Self> {
        let table = CsvTable::parse(SOURCE_NAME, body)?;
        table.require_columns(
            SOURCE_NAME,
            &[
                sheet_columns::COUNTRY,
                sheet_columns::PROVINCE,
                sheet_columns::POPULATION,
            ],
        )?;

        let mut entries = Vec::with_capacity(table.rows.len());
        let mut skipped_rows = 0;
        for row in &table.rows {
            let key = PlaceKey::province_level(
                cell(row, sheet_columns::COUNTRY),
                cell(row, sheet_columns::PROVINCE),
            );
            let population = cell(row, sheet_columns::POPULATION);
            match parse_population(population) {
                Some(population) => entries.push((key, population)),
                None => {
                    warn!(
                        "Skipping population row for {}: unreadable population '{}'",
                        key, population
                    );
                    skipped_rows += 1;
                }
            }
        }

        Ok(Self {
            entries,
            skipped_rows,
        })
    }

    pub fn from_entries(entries: Vec<(PlaceKey, u64)>) -> Self {
        Self {
            entries,
            skipped_rows: 0,
        }
    }

    pub fn entries(&self) -> &[(PlaceKey, u64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }
}
