//! Mobility report
//!
//! Carried through unprocessed; only its size and coverage are reported.

use super::{CsvTable, RawRow};
use crate::Result;
use std::collections::BTreeSet;

const SOURCE_NAME: &str = "mobility report";
const COUNTRY_COLUMN: &str = "country_region";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MobilityTable {
    table: CsvTable,
}

impl MobilityTable {
    pub fn parse(body: &str) -> Result<Self> {
        Ok(Self {
            table: CsvTable::parse(SOURCE_NAME, body)?,
        })
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.table.rows
    }

    pub fn len(&self) -> usize {
        self.table.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.rows.is_empty()
    }

    /// Distinct country names in the report
    pub fn countries(&self) -> BTreeSet<&str> {
        self.table
            .rows
            .iter()
            .filter_map(|row| row.get(COUNTRY_COLUMN))
            .map(String::as_str)
            .filter(|c| !c.is_empty())
            .collect()
    }
}
