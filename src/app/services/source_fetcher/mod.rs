//! Source download service with a local file cache
//!
//! Fetches the daily case reports, the population and intervention sheets and
//! the mobility report. Every download is awaited in turn; nothing is
//! retried. Daily reports are cached forever once published, the other
//! tables are refreshed when older than the configured maximum age.

use crate::app::models::time_series::DateRange;
use crate::config::{CacheConfig, SourcesConfig};
use crate::constants::{INTERVENTIONS_CACHE_FILE, MOBILITY_CACHE_FILE, POPULATION_CACHE_FILE};
use crate::{Error, Result};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub mod cache;
pub mod progress;
pub mod transport;

#[cfg(test)]
mod tests;

pub use cache::{CachePolicy, CacheState};
pub use progress::DownloadProgress;
pub use transport::{ReqwestTransport, Transport};

/// Undecoded bodies of every source, ready for table parsing
#[derive(Debug, Clone, Default)]
pub struct RawSources {
    pub case_reports: BTreeMap<NaiveDate, String>,
    pub population: String,
    pub interventions: String,
    pub mobility: String,
}

/// Downloads sources through a [`Transport`] and caches them on disk
pub struct SourceFetcher {
    transport: Box<dyn Transport>,
    sources: SourcesConfig,
    cache: CacheConfig,
    show_progress: bool,
}

impl SourceFetcher {
    pub fn new(transport: Box<dyn Transport>, sources: SourcesConfig, cache: CacheConfig) -> Self {
        Self {
            transport,
            sources,
            cache,
            show_progress: false,
        }
    }

    /// Show a progress bar while fetching daily reports
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Cache path of the daily report for `date`
    pub fn case_report_path(&self, date: NaiveDate) -> PathBuf {
        self.cache
            .case_report_dir()
            .join(format!("{}.csv", date.format("%Y-%m-%d")))
    }

    /// Fetch the daily report for one date
    ///
    /// # Errors
    /// `Error::NotYetPublished` when the feed answers 404 for that date.
    pub async fn fetch_case_report(&self, date: NaiveDate) -> Result<String> {
        let url = self.sources.case_report_url(date)?;
        let path = self.case_report_path(date);

        match self.fetch_cached(&url, &path, CachePolicy::Forever).await {
            Err(e) if e.http_status_code() == Some(404) => Err(Error::not_yet_published(date, url)),
            other => other,
        }
    }

    /// Fetch the daily report for every date in `dates`
    pub async fn fetch_case_reports(
        &self,
        dates: &DateRange,
    ) -> Result<BTreeMap<NaiveDate, String>> {
        info!(
            "Fetching {} daily reports from {} to {}",
            dates.len(),
            dates.start(),
            dates.last()
        );
        let progress = DownloadProgress::new(dates.len(), self.show_progress);
        let mut reports = BTreeMap::new();

        for date in dates.iter() {
            match self.fetch_case_report(date).await {
                Ok(body) => {
                    reports.insert(date, body);
                    progress.advance(&date.to_string());
                }
                Err(e) => {
                    progress.abandon();
                    return Err(e);
                }
            }
        }

        progress.finish(reports.len());
        Ok(reports)
    }

    pub async fn fetch_population(&self) -> Result<String> {
        let url = self.sources.population_url();
        let path = self.cache.dir.join(POPULATION_CACHE_FILE);
        self.fetch_cached(&url, &path, self.sheet_policy()).await
    }

    pub async fn fetch_interventions(&self) -> Result<String> {
        let url = self.sources.interventions_url();
        let path = self.cache.dir.join(INTERVENTIONS_CACHE_FILE);
        self.fetch_cached(&url, &path, self.sheet_policy()).await
    }

    pub async fn fetch_mobility(&self) -> Result<String> {
        let path = self.cache.dir.join(MOBILITY_CACHE_FILE);
        self.fetch_cached(&self.sources.mobility_url, &path, self.sheet_policy())
            .await
    }

    /// Fetch every source needed for one reconciliation run
    pub async fn fetch_all(&self, dates: &DateRange) -> Result<RawSources> {
        let case_reports = self.fetch_case_reports(dates).await?;
        info!("Fetching population table");
        let population = self.fetch_population().await?;
        info!("Fetching intervention table");
        let interventions = self.fetch_interventions().await?;
        info!("Fetching mobility report");
        let mobility = self.fetch_mobility().await?;

        Ok(RawSources {
            case_reports,
            population,
            interventions,
            mobility,
        })
    }

    fn sheet_policy(&self) -> CachePolicy {
        CachePolicy::MaxAge(self.cache.sheet_max_age())
    }

    async fn fetch_cached(&self, url: &str, path: &Path, policy: CachePolicy) -> Result<String> {
        let state = policy.state_of(path)?;
        if state == CacheState::Fresh {
            debug!("Using cached {}", path.display());
            return cache::read_cached(path);
        }

        match self.transport.get(url).await {
            Ok(body) => {
                cache::store(path, &body)?;
                debug!("Downloaded {} ({} bytes)", url, body.len());
                Ok(body)
            }
            Err(e) if state == CacheState::Stale => {
                warn!(
                    "Failed to refresh {} ({}); using stale copy {}",
                    url,
                    e,
                    path.display()
                );
                cache::read_cached(path)
            }
            Err(e) => Err(e),
        }
    }
}
