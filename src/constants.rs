//! Application constants for the reconciliation pipeline
//!
//! This module contains default source locations, cache lifetimes, column
//! names and the fixed place lists used by the reconciliation stages.

// =============================================================================
// Source Locations
// =============================================================================

/// Spreadsheet holding both the intervention and population sheets
pub const DEFAULT_SHEETS_DOC: &str = "1-tj7Cjx3e3eSfFGhhhJTGikaydIclFG1QrD06Eh9oDM";

/// Sheet name of the intervention table
pub const DEFAULT_INTERVENTIONS_SHEET: &str = "Interventions";

/// Sheet name of the population table
pub const DEFAULT_POPULATION_SHEET: &str = "population";

/// CSV export endpoint for a spreadsheet sheet (`{doc}` and `{sheet}` are substituted)
pub const DEFAULT_SHEETS_CSV_FETCHER: &str =
    "https://docs.google.com/spreadsheets/d/{doc}/gviz/tq?tqx=out:csv&sheet={sheet}";

/// Daily report URL, formatted with strftime-style date specifiers
pub const DEFAULT_CASE_REPORT_URL_FORMAT: &str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_daily_reports/%m-%d-%Y.csv";

/// Community mobility report
pub const DEFAULT_MOBILITY_URL: &str =
    "https://www.gstatic.com/covid19/mobility/Global_Mobility_Report.csv";

/// First date published by the daily report feed
pub const DEFAULT_START_DATE: (i32, u32, u32) = (2020, 1, 22);

/// Directory and file name of the default configuration file
pub const CONFIG_DIR_NAME: &str = "covid_recon";
pub const CONFIG_FILE_NAME: &str = "config.toml";

// =============================================================================
// Cache Configuration
// =============================================================================

/// Root directory for downloaded source files
pub const DEFAULT_DOWNLOAD_DIR: &str = "downloads";

/// Subdirectory holding one file per daily report
pub const CASE_REPORT_CACHE_SUBDIR: &str = "JHU";

/// Cache file names for the spreadsheet-sourced tables
pub const POPULATION_CACHE_FILE: &str = "population.csv";
pub const INTERVENTIONS_CACHE_FILE: &str = "interventions.csv";
pub const MOBILITY_CACHE_FILE: &str = "google_mobility.csv";

/// Spreadsheet tables are refreshed when the cached copy is older than this
pub const DEFAULT_SHEET_MAX_AGE_SECS: u64 = 60 * 60;

// =============================================================================
// Output Configuration
// =============================================================================

/// Snapshot of the reconciled place collection
pub const DEFAULT_SNAPSHOT_FILENAME: &str = "places.bin";

/// Legacy wide CSV file names
pub const CONFIRMED_CSV_FILENAME: &str = "time_series_confirmed.csv";
pub const DEATHS_CSV_FILENAME: &str = "time_series_deaths.csv";
pub const RECOVERED_CSV_FILENAME: &str = "time_series_recovered.csv";

/// Date format of the legacy CSV date columns
pub const LEGACY_CSV_DATE_FORMAT: &str = "%m/%d/%y";

/// Leading columns of the legacy CSV layout
pub const LEGACY_CSV_HEADERS: &[&str] = &["Province/State", "Country/Region", "Lat", "Long"];

// =============================================================================
// Intervention Series
// =============================================================================

/// Value of the sentinel series attached to places without intervention data
pub const UNKNOWN_INTERVENTION: &str = "Unknown";

/// State assumed before the first non-empty intervention cell of a row
pub const NO_INTERVENTION: &str = "No Intervention";

/// Accepted formats of intervention table date headers
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
pub const US_DATE_FORMAT: &str = "%m/%d/%Y";
pub const US_SHORT_DATE_FORMAT: &str = "%m/%d/%y";

// =============================================================================
// Column Name Constants
// =============================================================================

/// Column aliases for the daily reports, in lookup order.
///
/// The feed renamed its columns in March 2020; both spellings are still
/// present in the archive.
pub mod field_aliases {
    pub const COUNTRY: &[&str] = &["Country_Region", "Country/Region"];
    pub const PROVINCE: &[&str] = &["Province_State", "Province/State"];
    pub const DISTRICT: &[&str] = &["Admin2"];
    pub const LATITUDE: &[&str] = &["Lat", "Latitude"];
    pub const LONGITUDE: &[&str] = &["Long_", "Longitude"];
    pub const CONFIRMED: &[&str] = &["Confirmed"];
    pub const DEATHS: &[&str] = &["Deaths"];
    pub const RECOVERED: &[&str] = &["Recovered"];
}

/// Column names of the spreadsheet tables
pub mod sheet_columns {
    pub const COUNTRY: &str = "Country/Region";
    pub const PROVINCE: &str = "Province/State";
    pub const POPULATION: &str = "Population";
}

// =============================================================================
// Reconciliation Place Lists
// =============================================================================

/// Raw daily-report rows that are always discarded before canonicalisation.
///
/// These are whole-country duplicates of data also reported per province and
/// "Recovered" pseudo-provinces that only carry recovery totals.
pub const THROW_AWAY_PLACES: &[(&str, &str, &str)] = &[
    ("US", "US", ""),
    ("Australia", "", ""),
    ("Canada", "Recovered", ""),
    ("US", "Recovered", ""),
];

/// Countries whose county-level rows are rolled up into their states
pub const DEFAULT_COUNTY_TO_STATE: &[&str] = &["United States", "Canada"];

/// Countries whose province-level rows are rolled up into the country
pub const DEFAULT_STATE_TO_COUNTRY: &[&str] = &["Germany", "Italy", "Spain"];

/// Places that are known to have no population entry and are not simulated
pub const SILENCED_POPULATION_WARNINGS: &[(&str, &str, &str)] = &[
    ("Australia", "External territories", ""),
    ("Australia", "Jervis Bay Territory", ""),
    ("France", "Saint Pierre and Miquelon", ""),
    ("Netherlands", "Bonaire, Sint Eustatius and Saba", ""),
    ("United Kingdom", "Anguilla", ""),
    ("United Kingdom", "British Virgin Islands", ""),
    ("United Kingdom", "Falkland Islands (Islas Malvinas)", ""),
    ("United Kingdom", "Falkland Islands (Malvinas)", ""),
    ("United Kingdom", "Turks and Caicos Islands", ""),
    ("West Bank and Gaza", "", ""),
];

// =============================================================================
// Known Reporting Glitches
// =============================================================================

/// France's numbers were published under French Polynesia on this date
pub const FRANCE_MISATTRIBUTION_DATE: (i32, u32, u32) = (2020, 3, 23);

/// Hubei revised its death count upwards on this date
pub const HUBEI_DEATH_REVISION_DATE: (i32, u32, u32) = (2020, 4, 17);
