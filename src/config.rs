//! Configuration management and validation.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! command-line overrides applied through the `with_*` builders. The merged
//! result is checked by [`Config::validate`] before anything runs.

use crate::app::models::PlaceKey;
use crate::app::models::time_series::DateRange;
use crate::app::services::reconciler::Correction;
use crate::constants::{
    CASE_REPORT_CACHE_SUBDIR, CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_CASE_REPORT_URL_FORMAT,
    DEFAULT_COUNTY_TO_STATE, DEFAULT_DOWNLOAD_DIR, DEFAULT_INTERVENTIONS_SHEET,
    DEFAULT_MOBILITY_URL, DEFAULT_POPULATION_SHEET, DEFAULT_SHEET_MAX_AGE_SECS,
    DEFAULT_SHEETS_CSV_FETCHER, DEFAULT_SHEETS_DOC, DEFAULT_SNAPSHOT_FILENAME, DEFAULT_START_DATE,
    DEFAULT_STATE_TO_COUNTRY, SILENCED_POPULATION_WARNINGS,
};
use crate::{Error, Result};
use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Global configuration for an import run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dates: DatesConfig,
    pub sources: SourcesConfig,
    pub cache: CacheConfig,
    pub output: OutputConfig,
    pub reconciliation: ReconciliationConfig,
}

/// Date range covered by the import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatesConfig {
    /// First daily report to load
    pub start: NaiveDate,

    /// Last daily report to load; `None` means today
    pub last: Option<NaiveDate>,
}

/// Where each source is downloaded from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub interventions_doc: String,
    pub interventions_sheet: String,
    pub population_doc: String,
    pub population_sheet: String,

    /// Sheet CSV export URL with `{doc}` and `{sheet}` placeholders
    pub sheets_csv_url: String,

    /// Daily report URL with strftime-style date specifiers
    pub case_report_url_format: String,

    pub mobility_url: String,
}

/// Local download cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Root of the download cache
    pub dir: PathBuf,

    /// Daily report directory; defaults to `<dir>/JHU`
    pub case_report_dir: Option<PathBuf>,

    /// Refresh age of the spreadsheet and mobility downloads
    pub sheet_max_age_secs: u64,
}

/// Output files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub snapshot_path: PathBuf,

    /// Also write the three legacy wide CSV files
    pub write_csvs: bool,

    pub csv_dir: PathBuf,
}

/// Reconciliation behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconciliationConfig {
    /// Countries whose counties are summed into their states
    pub county_to_state: Vec<String>,

    /// Countries whose provinces are summed into the country
    pub state_to_country: Vec<String>,

    /// Point fixes applied after consolidation, in order
    pub corrections: Vec<Correction>,

    /// Places the missing-population audit stays quiet about
    pub silenced_population_warnings: Vec<PlaceKey>,

    /// TOML canonicalisation rules; the built-in table is used when unset
    pub rules_file: Option<PathBuf>,
}

impl Default for DatesConfig {
    fn default() -> Self {
        let (year, month, day) = DEFAULT_START_DATE;
        Self {
            start: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
            last: None,
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            interventions_doc: DEFAULT_SHEETS_DOC.to_string(),
            interventions_sheet: DEFAULT_INTERVENTIONS_SHEET.to_string(),
            population_doc: DEFAULT_SHEETS_DOC.to_string(),
            population_sheet: DEFAULT_POPULATION_SHEET.to_string(),
            sheets_csv_url: DEFAULT_SHEETS_CSV_FETCHER.to_string(),
            case_report_url_format: DEFAULT_CASE_REPORT_URL_FORMAT.to_string(),
            mobility_url: DEFAULT_MOBILITY_URL.to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
            case_report_dir: None,
            sheet_max_age_secs: DEFAULT_SHEET_MAX_AGE_SECS,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_FILENAME),
            write_csvs: false,
            csv_dir: PathBuf::from("."),
        }
    }
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            county_to_state: DEFAULT_COUNTY_TO_STATE
                .iter()
                .map(|c| c.to_string())
                .collect(),
            state_to_country: DEFAULT_STATE_TO_COUNTRY
                .iter()
                .map(|c| c.to_string())
                .collect(),
            corrections: Correction::defaults(),
            silenced_population_warnings: SILENCED_POPULATION_WARNINGS
                .iter()
                .map(|parts| PlaceKey::from_parts(*parts))
                .collect(),
            rules_file: None,
        }
    }
}

impl DatesConfig {
    /// Resolve the configured dates into a range, using `today` for an open end
    pub fn resolve(&self, today: NaiveDate) -> Result<DateRange> {
        let last = self.last.unwrap_or(today);
        Ok(DateRange::inclusive(self.start, last)?)
    }
}

impl SourcesConfig {
    pub fn population_url(&self) -> String {
        sheet_url(&self.sheets_csv_url, &self.population_doc, &self.population_sheet)
    }

    pub fn interventions_url(&self) -> String {
        sheet_url(
            &self.sheets_csv_url,
            &self.interventions_doc,
            &self.interventions_sheet,
        )
    }

    /// Daily report URL for `date`
    ///
    /// # Errors
    /// `Error::Configuration` when the template holds a specifier a calendar
    /// date cannot fill, such as `%H`.
    pub fn case_report_url(&self, date: NaiveDate) -> Result<String> {
        use std::fmt::Write as _;

        let mut url = String::new();
        write!(url, "{}", date.format(&self.case_report_url_format)).map_err(|_| {
            Error::configuration(format!(
                "Daily report URL template '{}' cannot be filled from a date",
                self.case_report_url_format
            ))
        })?;
        Ok(url)
    }
}

fn sheet_url(template: &str, doc: &str, sheet: &str) -> String {
    template.replace("{doc}", doc).replace("{sheet}", sheet)
}

impl CacheConfig {
    pub fn case_report_dir(&self) -> PathBuf {
        self.case_report_dir
            .clone()
            .unwrap_or_else(|| self.dir.join(CASE_REPORT_CACHE_SUBDIR))
    }

    pub fn sheet_max_age(&self) -> Duration {
        Duration::from_secs(self.sheet_max_age_secs)
    }
}

impl OutputConfig {
    /// Paths of the confirmed, deaths and recovered CSV files
    pub fn csv_paths(&self) -> [PathBuf; 3] {
        use crate::constants::{
            CONFIRMED_CSV_FILENAME, DEATHS_CSV_FILENAME, RECOVERED_CSV_FILENAME,
        };
        [
            self.csv_dir.join(CONFIRMED_CSV_FILENAME),
            self.csv_dir.join(DEATHS_CSV_FILENAME),
            self.csv_dir.join(RECOVERED_CSV_FILENAME),
        ]
    }
}

impl Config {
    /// Default configuration file location (`<config dir>/covid_recon/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Parse a TOML configuration document; missing keys take defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::configuration(format!("Invalid configuration: {}", e)))
    }

    /// Load a TOML configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                format!("Failed to read configuration file '{}'", path.display()),
                e,
            )
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Load `path` if given, otherwise the default file if it exists, otherwise defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(default) if default.exists() => Self::load(&default),
            _ => Ok(Self::default()),
        }
    }

    /// Set the first date to load
    pub fn with_start_date(mut self, start: NaiveDate) -> Self {
        self.dates.start = start;
        self
    }

    /// Set the last date to load
    pub fn with_last_date(mut self, last: NaiveDate) -> Self {
        self.dates.last = Some(last);
        self
    }

    /// Set the download cache root
    pub fn with_cache_dir(mut self, dir: PathBuf) -> Self {
        self.cache.dir = dir;
        self
    }

    /// Set the daily report cache directory
    pub fn with_case_report_dir(mut self, dir: PathBuf) -> Self {
        self.cache.case_report_dir = Some(dir);
        self
    }

    /// Set the snapshot output path
    pub fn with_snapshot_path(mut self, path: PathBuf) -> Self {
        self.output.snapshot_path = path;
        self
    }

    /// Enable the legacy CSV output
    pub fn with_csv_output(mut self, dir: Option<PathBuf>) -> Self {
        self.output.write_csvs = true;
        if let Some(dir) = dir {
            self.output.csv_dir = dir;
        }
        self
    }

    /// Use canonicalisation rules from a TOML file
    pub fn with_rules_file(mut self, path: PathBuf) -> Self {
        self.reconciliation.rules_file = Some(path);
        self
    }

    /// Check the merged configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(last) = self.dates.last {
            if last < self.dates.start {
                return Err(Error::configuration(format!(
                    "Last date {} is before start date {}",
                    last, self.dates.start
                )));
            }
        }

        for placeholder in ["{doc}", "{sheet}"] {
            if !self.sources.sheets_csv_url.contains(placeholder) {
                return Err(Error::configuration(format!(
                    "Sheet CSV URL template '{}' is missing the {} placeholder",
                    self.sources.sheets_csv_url, placeholder
                )));
            }
        }

        let template = &self.sources.case_report_url_format;
        if StrftimeItems::new(template).any(|item| matches!(item, Item::Error)) {
            return Err(Error::configuration(format!(
                "Daily report URL template '{}' has an invalid date specifier",
                template
            )));
        }
        self.sources.case_report_url(self.dates.start)?;
        if !template.contains('%') {
            return Err(Error::configuration(format!(
                "Daily report URL template '{}' has no date specifier",
                template
            )));
        }

        let recon = &self.reconciliation;
        if let Some(country) = recon
            .county_to_state
            .iter()
            .chain(&recon.state_to_country)
            .find(|c| c.trim().is_empty())
        {
            return Err(Error::configuration(format!(
                "Consolidation country list contains a blank entry '{}'",
                country
            )));
        }

        Ok(())
    }
}
