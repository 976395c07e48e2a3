//! Test utilities for the source fetcher
//!
//! `FakeTransport` serves canned bodies or status codes per URL and records
//! every request so tests can assert on cache hits.

use crate::config::{CacheConfig, SourcesConfig};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use super::{SourceFetcher, Transport};

mod cache_tests;
mod fetcher_tests;

/// Canned response for one URL
#[derive(Debug, Clone)]
pub enum FakeResponse {
    Body(String),
    Status(u16),
}

/// In-memory transport; unknown URLs answer 404
#[derive(Debug, Clone, Default)]
pub struct FakeTransport {
    responses: HashMap<String, FakeResponse>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.responses
            .insert(url.into(), FakeResponse::Body(body.into()));
        self
    }

    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.responses.insert(url.into(), FakeResponse::Status(status));
        self
    }

    /// Shared log of requested URLs, usable after the transport is boxed
    pub fn request_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, url: &str) -> Result<String> {
        self.requests.lock().unwrap().push(url.to_string());
        match self.responses.get(url) {
            Some(FakeResponse::Body(body)) => Ok(body.clone()),
            Some(FakeResponse::Status(status)) => {
                Err(Error::http_status(url, *status, "Canned failure"))
            }
            None => Err(Error::http_status(url, 404, "Not Found")),
        }
    }
}

/// Sources pointing at predictable fake URLs
pub fn test_sources() -> SourcesConfig {
    SourcesConfig {
        interventions_doc: "doc".to_string(),
        interventions_sheet: "Interventions".to_string(),
        population_doc: "doc".to_string(),
        population_sheet: "population".to_string(),
        sheets_csv_url: "https://sheets.test/{doc}/{sheet}.csv".to_string(),
        case_report_url_format: "https://reports.test/%m-%d-%Y.csv".to_string(),
        mobility_url: "https://mobility.test/report.csv".to_string(),
    }
}

/// Cache rooted in a temporary directory
pub fn test_cache(dir: &Path) -> CacheConfig {
    CacheConfig {
        dir: dir.to_path_buf(),
        case_report_dir: None,
        sheet_max_age_secs: 3600,
    }
}

pub fn fetcher(transport: FakeTransport, dir: &Path) -> SourceFetcher {
    SourceFetcher::new(Box::new(transport), test_sources(), test_cache(dir))
}
