//! COVID-19 Place Reconciliation Library
//!
//! A Rust library for turning the Johns Hopkins CSSE daily COVID-19 reports
//! into one consistent time series per geographic place.
//!
//! This library provides tools for:
//! - Downloading daily case reports and spreadsheet tables with a local file cache
//! - Parsing case reports whose column names changed across the history of the feed
//! - Canonicalising place names from every source into a single key space
//! - Merging case counts, population and intervention history into one record per place
//! - Rolling county data up to states and state data up to countries
//! - Correcting known reporting glitches and auditing data coverage
//! - Writing a binary snapshot and the legacy wide CSV time series files

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod country_codes;
        pub mod output_writer;
        pub mod place_recon;
        pub mod reconciler;
        pub mod source_fetcher;
        pub mod source_tables;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::time_series::{DateRange, TimeSeries, TimeSeriesError};
pub use app::models::{Interventions, Metric, Place, PlaceKey};
pub use config::Config;

/// Result type alias for the reconciliation pipeline
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for loading, reconciling and persisting place data
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error
    #[error("CSV parsing error in source '{source_name}': {message}")]
    CsvParsing {
        source_name: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// A required column is absent from a source table
    #[error("Source '{source_name}' is missing required column '{column}'")]
    MissingColumn { source_name: String, column: String },

    /// Transport-level HTTP failure (DNS, connection, body read)
    #[error("HTTP request failed for {url}: {message}")]
    Http {
        url: String,
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("Couldn't fetch {url}: the fetch failed with code {status}: {reason}")]
    HttpStatus {
        url: String,
        status: u16,
        reason: String,
    },

    /// The daily report for a date has not been published upstream yet
    #[error("Couldn't fetch {url}: it seems JHU has not yet published the data for {date}")]
    NotYetPublished { date: chrono::NaiveDate, url: String },

    /// Intervention table date columns have a gap
    #[error(
        "Intervention dates must be consecutive, found {previous} followed by {next}. Did a column get deleted?"
    )]
    NonConsecutiveDates {
        previous: chrono::NaiveDate,
        next: chrono::NaiveDate,
    },

    /// The intervention table lists the same place twice
    #[error("Duplicate intervention row for place {place}")]
    DuplicateInterventionRow { place: PlaceKey },

    /// Time series addressing or shape error
    #[error(transparent)]
    TimeSeries(#[from] TimeSeriesError),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Canonicalisation rule set is inconsistent
    #[error("Rule set error: {message}")]
    RuleSet { message: String },

    /// Data validation error
    #[error("Data validation error: {message}")]
    DataValidation { message: String },

    /// Snapshot encoding or decoding failed
    #[error("Snapshot error: {message}")]
    Snapshot {
        message: String,
        #[source]
        source: bincode::Error,
    },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        source_name: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            source_name: source_name.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a missing column error
    pub fn missing_column(source_name: impl Into<String>, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            source_name: source_name.into(),
            column: column.into(),
        }
    }

    /// Create a transport error
    pub fn http(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Http {
            url: url.into(),
            message: source.to_string(),
            source,
        }
    }

    /// Create a non-success status error
    pub fn http_status(url: impl Into<String>, status: u16, reason: impl Into<String>) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
            reason: reason.into(),
        }
    }

    /// Create a "not yet published" error for a daily report
    pub fn not_yet_published(date: chrono::NaiveDate, url: impl Into<String>) -> Self {
        Self::NotYetPublished {
            date,
            url: url.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a rule set error
    pub fn rule_set(message: impl Into<String>) -> Self {
        Self::RuleSet {
            message: message.into(),
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }

    /// Create a snapshot error
    pub fn snapshot(message: impl Into<String>, source: bincode::Error) -> Self {
        Self::Snapshot {
            message: message.into(),
            source,
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }

    /// Whether this error came from an upstream HTTP status
    pub fn http_status_code(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::NotYetPublished { .. } => Some(404),
            _ => None,
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            source_name: "unknown".to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}
