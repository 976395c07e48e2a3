//! Data models for place reconciliation
//!
//! This module contains the core data structures: the composite key that
//! identifies a geographic place across every source, and the per-place
//! record that accumulates population, intervention history and case counts.

pub mod audit;
pub mod time_series;

use crate::constants::UNKNOWN_INTERVENTION;
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use time_series::{DateRange, TimeSeries};

// =============================================================================
// Place Key
// =============================================================================

/// Identity of a geographic place: (country, province, district)
///
/// An empty province or district means the key addresses an aggregate
/// level, so `("Canada", "", "")` is the whole country and
/// `("United States", "Washington", "")` is the state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlaceKey {
    pub country: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub district: String,
}

impl PlaceKey {
    pub fn new(
        country: impl Into<String>,
        province: impl Into<String>,
        district: impl Into<String>,
    ) -> Self {
        Self {
            country: country.into(),
            province: province.into(),
            district: district.into(),
        }
    }

    /// Key of a whole country
    pub fn country_level(country: impl Into<String>) -> Self {
        Self::new(country, "", "")
    }

    /// Key of a province or state
    pub fn province_level(country: impl Into<String>, province: impl Into<String>) -> Self {
        Self::new(country, province, "")
    }

    /// County-level key (district present)
    pub fn is_district(&self) -> bool {
        !self.district.is_empty()
    }

    /// Province-level key (province present, no district)
    pub fn is_province(&self) -> bool {
        !self.province.is_empty() && self.district.is_empty()
    }

    /// Country-level key (neither province nor district)
    pub fn is_country(&self) -> bool {
        self.province.is_empty() && self.district.is_empty()
    }

    /// The province-level key this key rolls up into
    pub fn province_key(&self) -> PlaceKey {
        Self::province_level(self.country.clone(), self.province.clone())
    }

    /// The country-level key this key rolls up into
    pub fn country_key(&self) -> PlaceKey {
        Self::country_level(self.country.clone())
    }

    /// Build a key from a `(country, province, district)` tuple of string slices
    pub fn from_parts(parts: (&str, &str, &str)) -> Self {
        Self::new(parts.0, parts.1, parts.2)
    }
}

impl fmt::Display for PlaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} --- {} --- {}",
            self.country, self.province, self.district
        )
    }
}

// =============================================================================
// Metrics
// =============================================================================

/// Case count series carried by every place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Confirmed,
    Deaths,
    Recovered,
}

impl Metric {
    /// All metrics in output order
    pub const ALL: [Metric; 3] = [Metric::Confirmed, Metric::Deaths, Metric::Recovered];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Confirmed => "confirmed",
            Metric::Deaths => "deaths",
            Metric::Recovered => "recovered",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "confirmed" => Ok(Metric::Confirmed),
            "deaths" => Ok(Metric::Deaths),
            "recovered" => Ok(Metric::Recovered),
            other => Err(Error::data_validation(format!(
                "Unknown metric '{}'. Expected confirmed, deaths or recovered",
                other
            ))),
        }
    }
}

// =============================================================================
// Interventions
// =============================================================================

/// Intervention history attached to a place
///
/// Places without a row in the intervention table all point at one shared
/// series of `"Unknown"` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Interventions {
    /// History taken from the intervention table
    Recorded(TimeSeries<String>),
    /// Shared sentinel series
    Unknown(Arc<TimeSeries<String>>),
}

impl Interventions {
    /// Build the shared sentinel covering the intervention table's dates
    pub fn unknown_sentinel(start_date: NaiveDate, len: usize) -> Arc<TimeSeries<String>> {
        Arc::new(TimeSeries::new(
            start_date,
            vec![UNKNOWN_INTERVENTION.to_string(); len],
        ))
    }

    pub fn series(&self) -> &TimeSeries<String> {
        match self {
            Interventions::Recorded(series) => series,
            Interventions::Unknown(series) => series,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Interventions::Unknown(_))
    }
}

// =============================================================================
// Place Record
// =============================================================================

/// Reconciled record for one geographic place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    key: PlaceKey,

    /// Population, if any source supplied one
    pub population: Option<u64>,

    /// Latitude of the most recent report row that carried coordinates
    pub latitude: Option<f64>,

    /// Longitude of the most recent report row that carried coordinates
    pub longitude: Option<f64>,

    /// Intervention history or the shared unknown sentinel
    pub interventions: Interventions,

    pub confirmed: TimeSeries<i64>,
    pub deaths: TimeSeries<i64>,
    pub recovered: TimeSeries<i64>,
}

impl Place {
    /// Create an empty place with zeroed count series over `dates`
    pub fn new(key: PlaceKey, dates: &DateRange, interventions: Interventions) -> Self {
        Self {
            key,
            population: None,
            latitude: None,
            longitude: None,
            interventions,
            confirmed: TimeSeries::zeros(dates),
            deaths: TimeSeries::zeros(dates),
            recovered: TimeSeries::zeros(dates),
        }
    }

    pub fn key(&self) -> &PlaceKey {
        &self.key
    }

    pub fn series(&self, metric: Metric) -> &TimeSeries<i64> {
        match metric {
            Metric::Confirmed => &self.confirmed,
            Metric::Deaths => &self.deaths,
            Metric::Recovered => &self.recovered,
        }
    }

    pub fn series_mut(&mut self, metric: Metric) -> &mut TimeSeries<i64> {
        match metric {
            Metric::Confirmed => &mut self.confirmed,
            Metric::Deaths => &mut self.deaths,
            Metric::Recovered => &mut self.recovered,
        }
    }

    /// Set `metric` at `date`; a missing value keeps whatever was there
    pub fn update(&mut self, metric: Metric, date: NaiveDate, value: Option<i64>) -> Result<()> {
        if let Some(value) = value {
            self.series_mut(metric).set(date, value)?;
        }
        Ok(())
    }

    /// Record coordinates from a report row
    pub fn set_coordinates(&mut self, latitude: f64, longitude: f64) {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
    }

    /// Add another place's case counts into this one
    pub fn absorb(&mut self, child: &Place) -> Result<()> {
        for metric in Metric::ALL {
            self.series_mut(metric).accumulate(child.series(metric))?;
        }
        Ok(())
    }

    pub fn total_confirmed(&self) -> i64 {
        self.confirmed.total()
    }
}
