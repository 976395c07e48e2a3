//! Test utilities for the reconciler

use crate::app::models::time_series::DateRange;
use crate::app::models::PlaceKey;
use crate::app::services::country_codes::CountryCodeLookup;
use crate::app::services::place_recon::PlaceRecon;
use crate::app::services::source_tables::{
    CaseReports, InterventionTable, MobilityTable, PopulationTable, RawRow, SourceTables,
};
use crate::config::ReconciliationConfig;
use crate::{Error, Result};
use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::{ReconciliationResult, Reconciler};


pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 3, d).unwrap()
}

/// 2020-03-01 to 2020-03-03
pub fn dates() -> DateRange {
    DateRange::inclusive(day(1), day(3)).unwrap()
}

pub fn key(country: &str, province: &str, district: &str) -> PlaceKey {
    PlaceKey::new(country, province, district)
}

/// Country code table that can also be told to fail for some names
pub struct FixedCodes {
    codes: Vec<(&'static str, &'static str)>,
    failing: Vec<&'static str>,
}

impl FixedCodes {
    pub fn new(codes: &[(&'static str, &'static str)]) -> Self {
        Self {
            codes: codes.to_vec(),
            failing: Vec::new(),
        }
    }

    pub fn failing_for(mut self, name: &'static str) -> Self {
        self.failing.push(name);
        self
    }
}

impl CountryCodeLookup for FixedCodes {
    fn lookup(&self, name: &str) -> Result<Option<String>> {
        if self.failing.contains(&name) {
            return Err(Error::data_validation("country code service offline"));
        }
        Ok(self
            .codes
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, code)| code.to_string()))
    }
}

/// Settings without any consolidation or corrections
pub fn plain_settings() -> ReconciliationConfig {
    ReconciliationConfig {
        county_to_state: Vec::new(),
        state_to_country: Vec::new(),
        corrections: Vec::new(),
        silenced_population_warnings: Vec::new(),
        ..ReconciliationConfig::default()
    }
}

pub fn reconciler(settings: ReconciliationConfig) -> Reconciler {
    reconciler_with_codes(settings, FixedCodes::new(&[]))
}

pub fn reconciler_with_codes(settings: ReconciliationConfig, codes: FixedCodes) -> Reconciler {
    Reconciler::new(
        PlaceRecon::with_default_rules().unwrap(),
        Box::new(codes),
        settings,
        dates(),
    )
}

/// Daily report row in the later column layout
pub fn row(country: &str, province: &str, district: &str, confirmed: &str, deaths: &str) -> RawRow {
    [
        ("Country_Region", country),
        ("Province_State", province),
        ("Admin2", district),
        ("Confirmed", confirmed),
        ("Deaths", deaths),
        ("Recovered", ""),
    ]
    .into_iter()
    .map(|(column, value)| (column.to_string(), value.to_string()))
    .collect()
}

pub fn reports(days: Vec<(u32, Vec<RawRow>)>) -> CaseReports {
    CaseReports::from_rows(days.into_iter().map(|(d, rows)| (day(d), rows)).collect::<BTreeMap<_, _>>())
}

pub fn no_interventions() -> InterventionTable {
    InterventionTable::from_entries(day(1), 3, Vec::new())
}

pub fn population(entries: &[(PlaceKey, u64)]) -> PopulationTable {
    PopulationTable::from_entries(entries.to_vec())
}

/// Run every stage with the given inputs
pub fn reconcile(
    settings: ReconciliationConfig,
    case_reports: CaseReports,
    population: PopulationTable,
    interventions: InterventionTable,
) -> ReconciliationResult {
    reconciler(settings)
        .run(SourceTables {
            case_reports,
            population,
            interventions,
            mobility: MobilityTable::default(),
        })
        .unwrap()
}

/// Run every stage over case reports alone
pub fn reconcile_reports(settings: ReconciliationConfig, case_reports: CaseReports) -> ReconciliationResult {
    reconcile(settings, case_reports, PopulationTable::default(), no_interventions())
}
