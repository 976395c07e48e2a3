//! Time-based file cache for downloaded sources

use crate::{Error, Result};
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::debug;

/// How long a cached download stays valid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Once on disk, never fetched again (published daily reports)
    Forever,
    /// Refetched when the cached copy is older than the given age
    MaxAge(Duration),
}

/// State of a cache file under a given policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Missing,
    Fresh,
    Stale,
}

impl CachePolicy {
    /// Classify the cache file at `path`
    pub fn state_of(&self, path: &Path) -> Result<CacheState> {
        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(CacheState::Missing),
            Err(e) => {
                return Err(Error::io(
                    format!("Failed to inspect cache file '{}'", path.display()),
                    e,
                ));
            }
        };

        match self {
            CachePolicy::Forever => Ok(CacheState::Fresh),
            CachePolicy::MaxAge(max_age) => {
                let modified = metadata.modified().map_err(|e| {
                    Error::io(
                        format!("Failed to read modification time of '{}'", path.display()),
                        e,
                    )
                })?;
                // A modification time in the future counts as brand new
                let age = SystemTime::now()
                    .duration_since(modified)
                    .unwrap_or(Duration::ZERO);
                debug!("Cache file {} is {}s old", path.display(), age.as_secs());
                if age <= *max_age {
                    Ok(CacheState::Fresh)
                } else {
                    Ok(CacheState::Stale)
                }
            }
        }
    }
}

/// Read a cached body
pub fn read_cached(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| Error::io(format!("Failed to read cache file '{}'", path.display()), e))
}

/// Write a downloaded body, creating parent directories as needed
pub fn store(path: &Path, body: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            Error::io(
                format!("Failed to create cache directory '{}'", parent.display()),
                e,
            )
        })?;
    }
    std::fs::write(path, body)
        .map_err(|e| Error::io(format!("Failed to write cache file '{}'", path.display()), e))
}
