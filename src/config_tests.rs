#![allow(clippy::unwrap_used)]

use super::*;
use crate::snapshot::SnapshotSource;

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_from(&dir.path().join("config.toml")).unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.page_size, 10);
    assert_eq!(config.top_projects, 5);
    assert_eq!(config.map.zoom, 8);
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "page_size = 25\n\n[sources]\nledger = \"https://example.org/ledger.json\"\n",
    )
    .unwrap();
    let config = load_from(&path).unwrap();
    assert_eq!(config.page_size, 25);
    assert_eq!(config.top_projects, 5);
    assert!(matches!(config.ledger_source(), SnapshotSource::Url(_)));
    assert_eq!(config.sources.public_works, Sources::default().public_works);
}

#[test]
fn test_values_are_normalized() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "page_size = 0\ntop_projects = 0\nfiscal_year = \"2569\"\n\n[map]\nzoom = 40\ncenter_lat = 120.0\n",
    )
    .unwrap();
    let config = load_from(&path).unwrap();
    assert_eq!(config.page_size, 1);
    assert_eq!(config.top_projects, 1);
    assert_eq!(config.map.zoom, 20);
    assert_eq!(config.map.center_lat, MapSettings::default().center_lat);
    assert!(config.fiscal_years.contains(&"2569".to_string()));
}

#[test]
fn test_invalid_toml_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "page_size = \"lots\"").unwrap();
    let err = load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseToml { .. }));
}

#[test]
fn test_to_toml_round_trips() {
    let config = Config::default();
    let parsed: Config = toml::from_str(&config.to_toml()).unwrap();
    assert_eq!(parsed, config);
}
