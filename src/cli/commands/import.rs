//! Import command: download, reconcile and persist
//!
//! 1. Set up logging and merge configuration with the command-line overrides
//! 2. Fetch every source through the download cache
//! 3. Parse the sources and run the reconciler
//! 4. Write the snapshot, the optional CSV files and the coverage report
//! 5. Print a summary

use super::shared::{format_size, load_configuration, setup_logging};
use crate::app::models::audit::CoverageReport;
use crate::app::services::country_codes::RegexCountryCodes;
use crate::app::services::output_writer::{WrittenOutputs, write_outputs};
use crate::app::services::place_recon::{PlaceRecon, RuleSet};
use crate::app::services::reconciler::{ReconciliationResult, Reconciler};
use crate::app::services::source_fetcher::{ReqwestTransport, SourceFetcher};
use crate::app::services::source_tables::SourceTables;
use crate::cli::args::ImportArgs;
use crate::config::Config;
use crate::{DateRange, Error, Result};
use anyhow::Context;
use colored::*;
use indicatif::HumanDuration;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Outcome of a completed import
#[derive(Debug)]
pub struct ImportSummary {
    pub dates: DateRange,
    pub result: ReconciliationResult,
    pub outputs: WrittenOutputs,
    pub elapsed: Duration,
}

/// Import command runner
pub async fn run_import(args: ImportArgs) -> Result<ImportSummary> {
    let start_time = Instant::now();

    setup_logging(args.get_log_level(), args.quiet)?;
    info!("Starting covid_recon import");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let config = apply_cli_overrides(load_configuration(args.config_file.as_deref())?, &args);
    config.validate()?;
    debug!("Loaded configuration: {:?}", config);

    let today = chrono::Local::now().date_naive();
    let dates = config.dates.resolve(today)?;
    info!(
        "Loading {} daily reports from {} to {}",
        dates.len(),
        dates.start(),
        dates.last()
    );

    let recon = build_recon(&config)?;

    let fetcher = SourceFetcher::new(
        Box::new(ReqwestTransport::new()),
        config.sources.clone(),
        config.cache.clone(),
    )
    .with_progress(args.show_progress());
    let raw = fetcher.fetch_all(&dates).await?;

    let tables = SourceTables::parse(&raw)?;
    let reconciler = Reconciler::new(
        recon,
        Box::new(RegexCountryCodes),
        config.reconciliation.clone(),
        dates,
    );
    let result = reconciler.run(tables)?;

    let keys: Vec<String> = result.places.keys().map(|k| k.to_string()).collect();
    debug!("Reconciled places:\n{}", keys.join("\n"));

    let outputs = write_outputs(&result.places, dates, &config.output)?;
    if let Some(path) = &args.coverage_report {
        write_coverage_report(path, &result.coverage)
            .map_err(|e| Error::configuration(format!("{:#}", e)))?;
        info!("Wrote coverage report to {}", path.display());
    }

    let summary = ImportSummary {
        dates,
        result,
        outputs,
        elapsed: start_time.elapsed(),
    };
    if !args.quiet {
        print_summary(&summary);
    }
    Ok(summary)
}

/// Command-line values override the configuration file
pub fn apply_cli_overrides(mut config: Config, args: &ImportArgs) -> Config {
    if let Some(start) = args.start_date {
        config = config.with_start_date(start);
    }
    if let Some(last) = args.last_date {
        config = config.with_last_date(last);
    }
    if let Some(dir) = &args.cache_dir {
        config = config.with_cache_dir(dir.clone());
    }
    if let Some(dir) = &args.report_cache_dir {
        config = config.with_case_report_dir(dir.clone());
    }
    if let Some(path) = &args.snapshot_path {
        config = config.with_snapshot_path(path.clone());
    }
    if args.wants_csvs() {
        config = config.with_csv_output(args.csv_dir.clone());
    }
    if let Some(path) = &args.rules_file {
        config = config.with_rules_file(path.clone());
    }
    config
}

fn build_recon(config: &Config) -> Result<PlaceRecon> {
    let rules = match &config.reconciliation.rules_file {
        Some(path) => {
            info!("Using canonicalisation rules from {}", path.display());
            RuleSet::load(path)?
        }
        None => RuleSet::builtin()?,
    };
    Ok(PlaceRecon::new(rules))
}

fn write_coverage_report(path: &Path, report: &CoverageReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to encode coverage report")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write coverage report to {}", path.display()))?;
    Ok(())
}

fn print_summary(summary: &ImportSummary) {
    let result = &summary.result;
    let stats = &result.stats;
    let coverage = &result.coverage;

    println!("\n{}", "Import Summary".bright_green().bold());
    println!(
        "  {} {} to {} ({} days)",
        "Dates:".bright_cyan(),
        summary.dates.start(),
        summary.dates.last(),
        summary.dates.len().to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Places:".bright_cyan(),
        result.places.len().to_string().bright_white().bold()
    );
    println!(
        "  {} {} of {} ({:.1}%)",
        "Rows merged:".bright_cyan(),
        stats.rows_merged.to_string().bright_white(),
        stats.rows_seen,
        stats.merge_rate()
    );
    println!(
        "  {} {} renamed, {} aliased, {} expanded, {} dropped",
        "Place names:".bright_cyan(),
        result.recon_stats.renamed,
        result.recon_stats.aliased,
        result.recon_stats.expanded,
        result.recon_stats.dropped
    );
    println!(
        "  {} {} counties, {} provinces",
        "Consolidated:".bright_cyan(),
        stats.counties_consolidated,
        stats.provinces_consolidated
    );
    println!(
        "  {} {} applied, {} skipped",
        "Corrections:".bright_cyan(),
        stats.corrections_applied,
        stats.corrections_skipped
    );
    if stats.invalid_cells > 0 {
        println!(
            "  {} {}",
            "Invalid cells:".bright_yellow(),
            stats.invalid_cells.to_string().bright_yellow()
        );
    }
    if coverage.is_clean() {
        println!("  {} {}", "Coverage:".bright_cyan(), "complete".bright_green());
    } else {
        println!(
            "  {} {}",
            "Coverage:".bright_yellow(),
            coverage.summary().bright_yellow()
        );
    }

    println!("\n{}", "Output Files".bright_green().bold());
    for path in summary.outputs.all_paths() {
        let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        println!("  • {} ({})", path.display(), format_size(size));
    }
    println!(
        "\n  {} {}",
        "Time elapsed:".bright_cyan(),
        HumanDuration(summary.elapsed).to_string().bright_white()
    );
}
