//! Field parsing utilities for source table cells
//!
//! Every cell arrives as text. These helpers turn the cells into counts,
//! coordinates, populations and header dates, treating blank cells as
//! missing rather than as errors.

use super::RawRow;
use crate::constants::{ISO_DATE_FORMAT, US_DATE_FORMAT, US_SHORT_DATE_FORMAT};
use chrono::NaiveDate;

/// Outcome of parsing an optional numeric cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<T> {
    Value(T),
    Blank,
    Invalid,
}

impl<T> Cell<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Cell::Value(v) => Some(v),
            Cell::Blank | Cell::Invalid => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Cell::Invalid)
    }
}

/// Value of the first alias present as a column in `row`, blank or not
pub fn first_present<'a>(row: &'a RawRow, aliases: &[&str]) -> Option<&'a str> {
    aliases
        .iter()
        .find_map(|alias| row.get(*alias))
        .map(String::as_str)
}

/// Parse a case count; decimals such as `"12.0"` are truncated toward zero
pub fn parse_count(value: Option<&str>) -> Cell<i64> {
    let Some(text) = value.map(str::trim).filter(|t| !t.is_empty()) else {
        return Cell::Blank;
    };
    if let Ok(count) = text.parse::<i64>() {
        return Cell::Value(count);
    }
    match text.parse::<f64>() {
        Ok(decimal) if decimal.is_finite() => Cell::Value(decimal.trunc() as i64),
        _ => Cell::Invalid,
    }
}

/// Parse a latitude or longitude
pub fn parse_coordinate(value: Option<&str>) -> Cell<f64> {
    let Some(text) = value.map(str::trim).filter(|t| !t.is_empty()) else {
        return Cell::Blank;
    };
    match text.parse::<f64>() {
        Ok(coordinate) if coordinate.is_finite() => Cell::Value(coordinate),
        _ => Cell::Invalid,
    }
}

/// Parse a population written with thousands separators, e.g. `"1,234,567"`
pub fn parse_population(text: &str) -> Option<u64> {
    let digits: String = text.trim().chars().filter(|c| *c != ',').collect();
    digits.parse::<u64>().ok()
}

/// Parse an intervention table header as a date, if it is one
///
/// Accepts `YYYY-MM-DD`, `M/D/YYYY` and `M/D/YY`.
pub fn parse_header_date(header: &str) -> Option<NaiveDate> {
    let header = header.trim();
    if header.contains('-') {
        return NaiveDate::parse_from_str(header, ISO_DATE_FORMAT).ok();
    }
    let year = header.rsplit('/').next()?;
    let format = match year.len() {
        4 => US_DATE_FORMAT,
        2 => US_SHORT_DATE_FORMAT,
        _ => return None,
    };
    NaiveDate::parse_from_str(header, format).ok()
}
