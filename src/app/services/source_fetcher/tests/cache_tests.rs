//! Tests for cache freshness rules

use crate::app::services::source_fetcher::cache::{self, CachePolicy, CacheState};
use std::fs::File;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

#[test]
fn test_missing_file_is_missing_under_any_policy() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.csv");

    assert_eq!(CachePolicy::Forever.state_of(&path).unwrap(), CacheState::Missing);
    assert_eq!(
        CachePolicy::MaxAge(Duration::from_secs(60))
            .state_of(&path)
            .unwrap(),
        CacheState::Missing
    );
}

#[test]
fn test_forever_never_goes_stale() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("2020-01-22.csv");
    cache::store(&path, "old").unwrap();

    let file = File::options().write(true).open(&path).unwrap();
    file.set_modified(SystemTime::now() - Duration::from_secs(365 * 24 * 3600))
        .unwrap();

    assert_eq!(CachePolicy::Forever.state_of(&path).unwrap(), CacheState::Fresh);
}

#[test]
fn test_max_age_threshold() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("population.csv");
    cache::store(&path, "body").unwrap();
    let policy = CachePolicy::MaxAge(Duration::from_secs(3600));

    assert_eq!(policy.state_of(&path).unwrap(), CacheState::Fresh);

    let file = File::options().write(true).open(&path).unwrap();
    file.set_modified(SystemTime::now() - Duration::from_secs(2 * 3600))
        .unwrap();
    assert_eq!(policy.state_of(&path).unwrap(), CacheState::Stale);
}

#[test]
fn test_store_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("JHU").join("2020-03-01.csv");

    cache::store(&path, "a,b\n1,2\n").unwrap();
    assert_eq!(cache::read_cached(&path).unwrap(), "a,b\n1,2\n");
}
