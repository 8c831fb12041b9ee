#![allow(clippy::unwrap_used)]

use std::io::Write;

use super::*;

fn outcome(dataset: Dataset, generation: u64) -> LoadOutcome {
    LoadOutcome {
        dataset,
        generation,
        result: Ok(Snapshot::empty()),
    }
}

fn snapshot_file(body: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file
}

#[test]
fn test_stale_generation_is_dropped() {
    let mut loader = Loader::new();
    let (first, _) = loader.begin(Dataset::Ledger);
    let (second, _) = loader.begin(Dataset::Ledger);
    assert_eq!((first, second), (1, 2));

    assert!(loader.accept(outcome(Dataset::Ledger, first)).is_none());
    assert!(loader.is_loading(Dataset::Ledger));
    assert!(loader.accept(outcome(Dataset::Ledger, second)).is_some());
    assert!(!loader.is_loading(Dataset::Ledger));
}

#[test]
fn test_generations_are_per_dataset() {
    let mut loader = Loader::new();
    loader.begin(Dataset::Ledger);
    loader.begin(Dataset::Ledger);
    let (pw, _) = loader.begin(Dataset::PublicWorks);
    assert_eq!(pw, 1);
    assert!(loader.accept(outcome(Dataset::PublicWorks, 1)).is_some());
}

#[test]
fn test_new_request_cancels_previous() {
    let mut loader = Loader::new();
    let (_, first) = loader.begin(Dataset::PublicWorks);
    let (_, second) = loader.begin(Dataset::PublicWorks);
    assert!(first.load(Ordering::Relaxed));
    assert!(!second.load(Ordering::Relaxed));
}

#[test]
fn test_cancel_all() {
    let mut loader = Loader::new();
    let (_, ledger) = loader.begin(Dataset::Ledger);
    let (_, works) = loader.begin(Dataset::PublicWorks);
    loader.cancel_all();
    assert!(ledger.load(Ordering::Relaxed));
    assert!(works.load(Ordering::Relaxed));
    assert!(!loader.is_loading(Dataset::Ledger));
}

#[test]
fn test_request_loads_file() {
    let file = snapshot_file(r#"{"budget_data": [{"name": "Well", "budget": 10}]}"#);
    let mut loader = Loader::new();
    let generation = loader.request(
        Dataset::PublicWorks,
        SnapshotSource::File(file.path().to_path_buf()),
    );

    let done = loader.wait(Duration::from_secs(10)).unwrap();
    assert_eq!(done.dataset, Dataset::PublicWorks);
    assert_eq!(done.generation, generation);
    assert_eq!(done.result.unwrap().records.len(), 1);
}

#[test]
fn test_only_latest_request_is_delivered() {
    let old = snapshot_file(r#"{"budget_data": [{"name": "old"}]}"#);
    let new = snapshot_file(r#"{"budget_data": [{"name": "new"}, {"name": "newer"}]}"#);
    let mut loader = Loader::new();
    loader.request(Dataset::Ledger, SnapshotSource::File(old.path().to_path_buf()));
    let latest = loader.request(Dataset::Ledger, SnapshotSource::File(new.path().to_path_buf()));

    let done = loader.wait(Duration::from_secs(10)).unwrap();
    assert_eq!(done.generation, latest);
    assert_eq!(done.result.unwrap().records.len(), 2);
}

#[test]
fn test_failed_load_is_reported() {
    let mut loader = Loader::new();
    loader.request(
        Dataset::Ledger,
        SnapshotSource::File("/nonexistent/ledger.json".into()),
    );
    let done = loader.wait(Duration::from_secs(10)).unwrap();
    assert!(matches!(done.result, Err(SnapshotError::Read { .. })));
}

#[test]
fn test_poll_without_requests_is_empty() {
    let mut loader = Loader::new();
    assert!(loader.poll().is_empty());
}
