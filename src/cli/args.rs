//! Command-line argument definitions for covid_recon
//!
//! Every option that also exists in the configuration file is optional here;
//! a value given on the command line overrides the file.

use crate::{Error, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the COVID-19 place reconciler
#[derive(Debug, Clone, Parser)]
#[command(
    name = "covid_recon",
    version,
    about = "Reconcile JHU CSSE daily COVID-19 reports into per-place time series",
    long_about = "Downloads the Johns Hopkins CSSE daily case reports together with population \
                  and intervention tables, reconciles the place names used by each source into \
                  one key space, merges everything into one record per place and writes a binary \
                  snapshot plus optional legacy wide CSV files."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Download, reconcile and persist the data
    Import(ImportArgs),
    /// Report on the places in a saved snapshot
    Places(PlacesArgs),
}

/// Arguments for the import command
#[derive(Debug, Clone, Parser)]
pub struct ImportArgs {
    /// Path to configuration file
    ///
    /// TOML configuration file. If not specified, looks for
    /// covid_recon/config.toml in the user configuration directory.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// First daily report to load (YYYY-MM-DD)
    #[arg(long = "start", value_name = "DATE", help = "First date to load (YYYY-MM-DD)")]
    pub start_date: Option<NaiveDate>,

    /// Last daily report to load (YYYY-MM-DD); defaults to today
    #[arg(long = "last", value_name = "DATE", help = "Last date to load (YYYY-MM-DD)")]
    pub last_date: Option<NaiveDate>,

    /// Root of the download cache
    #[arg(long = "cache-dir", value_name = "PATH", help = "Download cache directory")]
    pub cache_dir: Option<PathBuf>,

    /// Directory holding one cached CSV per daily report
    #[arg(
        long = "report-cache-dir",
        value_name = "PATH",
        help = "Daily report cache directory"
    )]
    pub report_cache_dir: Option<PathBuf>,

    /// Where to write the binary snapshot
    #[arg(
        short = 'o',
        long = "snapshot",
        value_name = "FILE",
        help = "Snapshot output path"
    )]
    pub snapshot_path: Option<PathBuf>,

    /// Also write the legacy wide CSV files
    #[arg(long = "csv", help = "Write time_series_{confirmed,deaths,recovered}.csv")]
    pub write_csvs: bool,

    /// Directory for the legacy CSV files; implies --csv
    #[arg(long = "csv-dir", value_name = "PATH", help = "Directory for the legacy CSV files")]
    pub csv_dir: Option<PathBuf>,

    /// TOML file replacing or extending the built-in canonicalisation rules
    #[arg(long = "rules", value_name = "FILE", help = "Canonicalisation rules file (TOML)")]
    pub rules_file: Option<PathBuf>,

    /// Write the coverage report as JSON
    #[arg(
        long = "coverage-report",
        value_name = "FILE",
        help = "Write the coverage audit to a JSON file"
    )]
    pub coverage_report: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Also hides the download progress bar.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the places command
#[derive(Debug, Clone, Parser)]
pub struct PlacesArgs {
    /// Snapshot to read; defaults to the configured snapshot path
    #[arg(short = 's', long = "snapshot", value_name = "FILE", help = "Snapshot to read")]
    pub snapshot_path: Option<PathBuf>,

    /// Path to configuration file
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Only list places in this country
    #[arg(long = "country", value_name = "NAME", help = "Only list places in this country")]
    pub country: Option<String>,

    /// Show at most this many places, largest first
    #[arg(long = "top", value_name = "COUNT", help = "Show the COUNT places with most cases")]
    pub top: Option<usize>,

    /// Output format for the place listing
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for the place listing"
    )]
    pub output_format: OutputFormat,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

/// Output format options for machine-readable results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
    /// CSV format for data analysis
    Csv,
}

/// Log level for a verbosity count
fn log_level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

impl ImportArgs {
    /// Validate the import arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let (Some(start), Some(last)) = (self.start_date, self.last_date) {
            if last < start {
                return Err(Error::configuration(format!(
                    "--last {} is before --start {}",
                    last, start
                )));
            }
        }

        for (flag, path) in [("--config", &self.config_file), ("--rules", &self.rules_file)] {
            if let Some(path) = path {
                if !path.is_file() {
                    return Err(Error::configuration(format!(
                        "{} file does not exist: {}",
                        flag,
                        path.display()
                    )));
                }
            }
        }

        Ok(())
    }

    /// Whether the legacy CSV files were requested
    pub fn wants_csvs(&self) -> bool {
        self.write_csvs || self.csv_dir.is_some()
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            log_level_for(self.verbose)
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl PlacesArgs {
    pub fn validate(&self) -> Result<()> {
        if self.top == Some(0) {
            return Err(Error::configuration("--top must be greater than 0"));
        }
        if let Some(path) = &self.config_file {
            if !path.is_file() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    path.display()
                )));
            }
        }
        Ok(())
    }

    pub fn get_log_level(&self) -> &'static str {
        log_level_for(self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    fn import(argv: &[&str]) -> ImportArgs {
        let mut full = vec!["covid_recon", "import"];
        full.extend_from_slice(argv);
        match parse(&full).command {
            Some(Commands::Import(args)) => args,
            other => panic!("expected import command, got {:?}", other),
        }
    }

    #[test]
    fn test_import_defaults() {
        let args = import(&[]);
        assert!(args.start_date.is_none());
        assert!(!args.wants_csvs());
        assert_eq!(args.get_log_level(), "warn");
        assert!(args.show_progress());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_import_dates_and_outputs() {
        let args = import(&[
            "--start",
            "2020-03-01",
            "--last",
            "2020-03-31",
            "--csv-dir",
            "out",
            "-o",
            "places.bin",
        ]);
        assert_eq!(args.start_date, NaiveDate::from_ymd_opt(2020, 3, 1));
        assert_eq!(args.last_date, NaiveDate::from_ymd_opt(2020, 3, 31));
        assert!(args.wants_csvs());
        assert_eq!(args.snapshot_path, Some(PathBuf::from("places.bin")));
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_import_rejects_bad_input() {
        assert!(Args::try_parse_from(["covid_recon", "import", "--start", "03/01/2020"]).is_err());
        assert!(Args::try_parse_from(["covid_recon", "import", "-v", "-q"]).is_err());

        let args = import(&["--start", "2020-03-02", "--last", "2020-03-01"]);
        assert!(args.validate().is_err());

        let args = import(&["--rules", "/definitely/not/here.toml"]);
        assert!(args.validate().is_err());

        let rules = NamedTempFile::new().unwrap();
        let path = rules.path().to_str().unwrap();
        assert!(import(&["--rules", path]).validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        assert_eq!(import(&["-v"]).get_log_level(), "info");
        assert_eq!(import(&["-vv"]).get_log_level(), "debug");
        assert_eq!(import(&["-vvv"]).get_log_level(), "trace");
        let quiet = import(&["-q"]);
        assert_eq!(quiet.get_log_level(), "error");
        assert!(!quiet.show_progress());
    }

    #[test]
    fn test_places_args() {
        let args = match parse(&["covid_recon", "places", "--format", "json", "--top", "5"]).command
        {
            Some(Commands::Places(args)) => args,
            other => panic!("expected places command, got {:?}", other),
        };
        assert_eq!(args.output_format, OutputFormat::Json);
        assert_eq!(args.top, Some(5));
        assert!(args.validate().is_ok());

        let args = match parse(&["covid_recon", "places", "--top", "0"]).command {
            Some(Commands::Places(args)) => args,
            other => panic!("expected places command, got {:?}", other),
        };
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_no_subcommand() {
        assert!(parse(&["covid_recon"]).command.is_none());
    }
}
