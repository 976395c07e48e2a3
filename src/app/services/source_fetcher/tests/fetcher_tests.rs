//! Tests for source downloads and cache fallbacks

use super::{FakeTransport, fetcher};
use crate::Error;
use crate::app::models::time_series::DateRange;
use crate::app::services::source_fetcher::cache;
use chrono::NaiveDate;
use std::fs::File;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, m, d).unwrap()
}

fn make_stale(path: &std::path::Path) {
    let file = File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() - Duration::from_secs(2 * 3600))
        .unwrap();
}

#[tokio::test]
async fn test_case_report_downloaded_then_cached() {
    let dir = TempDir::new().unwrap();
    let transport =
        FakeTransport::new().with_body("https://reports.test/03-01-2020.csv", "Confirmed\n1\n");
    let log = transport.request_log();
    let fetcher = fetcher(transport, dir.path());

    let first = fetcher.fetch_case_report(date(3, 1)).await.unwrap();
    let second = fetcher.fetch_case_report(date(3, 1)).await.unwrap();

    assert_eq!(first, "Confirmed\n1\n");
    assert_eq!(first, second);
    assert_eq!(log.lock().unwrap().len(), 1);
    assert!(dir.path().join("JHU").join("2020-03-01.csv").exists());
}

#[tokio::test]
async fn test_missing_case_report_is_not_yet_published() {
    let dir = TempDir::new().unwrap();
    let fetcher = fetcher(FakeTransport::new(), dir.path());

    let result = fetcher.fetch_case_report(date(3, 2)).await;
    match result {
        Err(Error::NotYetPublished { date: d, url }) => {
            assert_eq!(d, date(3, 2));
            assert_eq!(url, "https://reports.test/03-02-2020.csv");
        }
        other => panic!("expected NotYetPublished, got {:?}", other),
    }
}

#[tokio::test]
async fn test_case_report_server_error_is_fatal() {
    let dir = TempDir::new().unwrap();
    let transport = FakeTransport::new().with_status("https://reports.test/03-01-2020.csv", 500);
    let fetcher = fetcher(transport, dir.path());

    let result = fetcher.fetch_case_report(date(3, 1)).await;
    assert!(matches!(result, Err(Error::HttpStatus { status: 500, .. })));
}

#[tokio::test]
async fn test_fetch_case_reports_stops_at_first_gap() {
    let dir = TempDir::new().unwrap();
    let transport = FakeTransport::new()
        .with_body("https://reports.test/03-01-2020.csv", "a")
        .with_body("https://reports.test/03-02-2020.csv", "b");
    let fetcher = fetcher(transport, dir.path());

    let ok = DateRange::inclusive(date(3, 1), date(3, 2)).unwrap();
    let reports = fetcher.fetch_case_reports(&ok).await.unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[&date(3, 2)], "b");

    let too_far = DateRange::inclusive(date(3, 1), date(3, 3)).unwrap();
    let result = fetcher.fetch_case_reports(&too_far).await;
    assert!(matches!(result, Err(Error::NotYetPublished { .. })));
}

#[tokio::test]
async fn test_fresh_sheet_is_not_refetched() {
    let dir = TempDir::new().unwrap();
    let transport =
        FakeTransport::new().with_body("https://sheets.test/doc/population.csv", "new");
    let log = transport.request_log();
    cache::store(&dir.path().join("population.csv"), "cached").unwrap();
    let fetcher = fetcher(transport, dir.path());

    assert_eq!(fetcher.fetch_population().await.unwrap(), "cached");
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_stale_sheet_is_refreshed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("interventions.csv");
    cache::store(&path, "old").unwrap();
    make_stale(&path);
    let transport =
        FakeTransport::new().with_body("https://sheets.test/doc/Interventions.csv", "new");
    let fetcher = fetcher(transport, dir.path());

    assert_eq!(fetcher.fetch_interventions().await.unwrap(), "new");
    assert_eq!(cache::read_cached(&path).unwrap(), "new");
}

#[tokio::test]
async fn test_failed_refresh_falls_back_to_stale_copy() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("google_mobility.csv");
    cache::store(&path, "stale").unwrap();
    make_stale(&path);
    let transport = FakeTransport::new().with_status("https://mobility.test/report.csv", 503);
    let fetcher = fetcher(transport, dir.path());

    assert_eq!(fetcher.fetch_mobility().await.unwrap(), "stale");
}

#[tokio::test]
async fn test_failed_download_without_copy_is_fatal() {
    let dir = TempDir::new().unwrap();
    let transport =
        FakeTransport::new().with_status("https://sheets.test/doc/population.csv", 403);
    let fetcher = fetcher(transport, dir.path());

    let result = fetcher.fetch_population().await;
    assert_eq!(result.unwrap_err().http_status_code(), Some(403));
}

#[tokio::test]
async fn test_fetch_all_collects_every_source() {
    let dir = TempDir::new().unwrap();
    let transport = FakeTransport::new()
        .with_body("https://reports.test/03-01-2020.csv", "day")
        .with_body("https://sheets.test/doc/population.csv", "pop")
        .with_body("https://sheets.test/doc/Interventions.csv", "int")
        .with_body("https://mobility.test/report.csv", "mob");
    let fetcher = fetcher(transport, dir.path());

    let range = DateRange::inclusive(date(3, 1), date(3, 1)).unwrap();
    let raw = fetcher.fetch_all(&range).await.unwrap();

    assert_eq!(raw.case_reports.len(), 1);
    assert_eq!(raw.population, "pop");
    assert_eq!(raw.interventions, "int");
    assert_eq!(raw.mobility, "mob");
}
