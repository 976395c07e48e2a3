use super::*;
use crate::app::services::output_writer::Snapshot;
use crate::Error;
use tempfile::TempDir;

#[test]
fn test_snapshot_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("places.bin");
    let snapshot = Snapshot::new(dates(), sample_places());

    snapshot.save(&path).unwrap();
    let loaded = Snapshot::load(&path).unwrap();

    assert_eq!(loaded.len(), 4);
    assert_eq!(loaded.date_range, dates());
    assert_eq!(loaded.created_at, snapshot.created_at);
    let italy = &loaded.places[&PlaceKey::country_level("Italy")];
    assert_eq!(italy.population, Some(60_000_000));
    assert_eq!(italy.confirmed.values(), &[3, 5]);
    assert!(italy.interventions.is_unknown());
}

#[test]
fn test_load_missing_snapshot_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = Snapshot::load(&dir.path().join("absent.bin")).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn test_load_garbage_is_snapshot_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("places.bin");
    std::fs::write(&path, b"not a snapshot").unwrap();

    let err = Snapshot::load(&path).unwrap_err();
    assert!(matches!(err, Error::Snapshot { .. }));
}
