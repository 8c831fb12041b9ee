#![allow(clippy::unwrap_used)]

use super::app::*;
use crate::config::Config;
use crate::routes::Route;
use crate::snapshot::{Dataset, LoadOutcome, Snapshot, SnapshotError};

const LEDGER: &str = r#"{
  "metadata": { "date": "2025-01-21" },
  "budget_data": [
    { "category_1": "Roads", "project": "Bridge", "approved": 100, "disbursed": 100,
      "remaining": 0, "coordinates": { "lat": 18.5, "lng": 98.9 } },
    { "category_1": "Roads", "project": "Culvert", "approved": 50, "disbursed": 40,
      "remaining": 10, "coordinates": null }
  ]
}"#;

const PUBLIC_WORKS: &str = r#"{
  "metadata": { "date": "2025-05-19" },
  "budget_data": [
    { "id": "1", "name": "Water tower", "budget": 900, "disbursed": 0,
      "remaining": 900, "coordinates": [99.01, 18.60] },
    { "id": "7", "name": "Road repair", "budget": 300, "disbursed": 300,
      "remaining": 0, "coordinates": null }
  ]
}"#;

fn ready(dataset: Dataset, text: &str) -> LoadOutcome {
    LoadOutcome {
        dataset,
        generation: 1,
        result: Ok(Snapshot::from_json_str(text, "test.json").unwrap()),
    }
}

fn failed(dataset: Dataset) -> LoadOutcome {
    LoadOutcome {
        dataset,
        generation: 1,
        result: Err(SnapshotError::Parse {
            origin: "broken.json".into(),
            reason: "expected value".into(),
        }),
    }
}

fn loaded_app() -> App {
    let mut app = App::new(Config::default());
    app.apply_load(ready(Dataset::Ledger, LEDGER));
    app.apply_load(ready(Dataset::PublicWorks, PUBLIC_WORKS));
    app
}

// ── Loading ───────────────────────────────────────────────────

#[test]
fn test_new_app_starts_empty_on_overview() {
    let app = App::new(Config::default());
    assert_eq!(app.screen, Screen::Overview);
    assert_eq!(app.ledger.state, LoadState::NotLoaded);
    assert!(app.snapshot(Dataset::Ledger).is_empty());
    assert_eq!(app.fiscal_year, "2568");
}

#[test]
fn test_apply_load_swaps_snapshot() {
    let app = loaded_app();
    assert_eq!(app.ledger.state, LoadState::Ready);
    assert_eq!(app.snapshot(Dataset::Ledger).projects.len(), 2);
    assert_eq!(app.snapshot(Dataset::PublicWorks).projects.len(), 2);
}

#[test]
fn test_failed_load_shows_empty_dataset() {
    let mut app = loaded_app();
    app.apply_load(failed(Dataset::Ledger));
    assert!(matches!(app.ledger.state, LoadState::Failed(_)));
    assert!(app.snapshot(Dataset::Ledger).is_empty());
    assert_eq!(app.snapshot(Dataset::Ledger).summary.record_count, 0);
    assert!(app.status_message.contains("budget ledger"));
    // the other dataset is untouched
    assert_eq!(app.public_works.state, LoadState::Ready);
}

#[test]
fn test_reload_collapses_rows() {
    let mut app = loaded_app();
    app.public_works.listing.toggle_expanded("1");
    app.apply_load(ready(Dataset::PublicWorks, PUBLIC_WORKS));
    assert!(!app.public_works.listing.is_expanded("1"));
}

// ── Navigation ────────────────────────────────────────────────

#[test]
fn test_navigate_projects_routes() {
    let mut app = loaded_app();
    app.navigate(&Route::parse("/projects"));
    assert_eq!(app.screen, Screen::Projects);
    app.navigate(&Route::parse("/public-projects"));
    assert_eq!(app.screen, Screen::PublicWorks);
    assert_eq!(app.route(), Route::Projects(Dataset::PublicWorks));
}

#[test]
fn test_navigate_unknown_path() {
    let mut app = loaded_app();
    app.navigate(&Route::parse("/budget-plans"));
    assert_eq!(app.screen, Screen::NotFound);
    assert_eq!(app.not_found_path, "/budget-plans");
    assert_eq!(app.route().to_path(), "/budget-plans");
}

#[test]
fn test_map_route_focuses_public_works_first() {
    let mut app = loaded_app();
    // "1" is both the public-works id and the ledger's positional id
    app.navigate(&Route::parse("/map?project=1"));
    assert_eq!(app.screen, Screen::Map);
    assert_eq!(app.map.focused, Some((Dataset::PublicWorks, "1".to_string())));
    assert_eq!(app.map.center_lat, 18.60);
    assert_eq!(app.map.center_lng, 99.01);
    assert_eq!(app.map.zoom, app.config.map.focus_zoom);
    let entries = app.map_entries();
    assert_eq!(entries[app.map.selected].1.name, "Water tower");
}

#[test]
fn test_map_route_falls_back_to_ledger() {
    let mut app = App::new(Config::default());
    app.apply_load(ready(Dataset::Ledger, LEDGER));
    assert!(app.focus_project("1"));
    assert_eq!(app.map.focused, Some((Dataset::Ledger, "1".to_string())));
}

#[test]
fn test_map_route_unknown_or_unmapped_project() {
    let mut app = loaded_app();
    app.navigate(&Route::parse("/map?project=7"));
    assert_eq!(app.screen, Screen::Map);
    assert!(app.map.focused.is_none());
    assert!(app.status_message.contains('7'));
    assert!(app.pending_focus.is_none());
}

#[test]
fn test_pending_focus_resolves_after_load() {
    let mut app = App::new(Config::default());
    app.public_works.state = LoadState::Loading;
    app.navigate(&Route::parse("/map?project=1"));
    assert_eq!(app.pending_focus.as_deref(), Some("1"));

    app.apply_load(ready(Dataset::PublicWorks, PUBLIC_WORKS));
    assert!(app.pending_focus.is_none());
    assert!(app.map.is_focused(Dataset::PublicWorks, "1"));
}

#[test]
fn test_map_entries_public_works_first() {
    let app = loaded_app();
    let names: Vec<&str> = app.map_entries().iter().map(|(_, p)| p.name.as_str()).collect();
    assert_eq!(names, vec!["Water tower", "Bridge"]);
}

// ── Projects ──────────────────────────────────────────────────

#[test]
fn test_selected_project_follows_listing() {
    let mut app = loaded_app();
    assert_eq!(app.selected_project(Dataset::Ledger).unwrap().name, "Bridge");
    app.ledger.listing.cursor_down(app.page_len(Dataset::Ledger));
    assert_eq!(app.selected_project(Dataset::Ledger).unwrap().name, "Culvert");
    app.ledger.listing.set_query("bridge");
    assert_eq!(app.filtered_len(Dataset::Ledger), 1);
}

#[test]
fn test_report_tabs_cycle() {
    assert_eq!(ReportTab::Budget.next(), ReportTab::Projects);
    assert_eq!(ReportTab::Location.next(), ReportTab::Budget);
    assert_eq!(ReportTab::Budget.prev(), ReportTab::Location);
}

#[test]
fn test_focus_project_in_specific_dataset() {
    let mut app = loaded_app();
    assert!(app.focus_project_in(Dataset::Ledger, "1"));
    assert!(app.map.is_focused(Dataset::Ledger, "1"));
    assert_eq!(app.map_entries()[app.map.selected].1.name, "Bridge");
    assert!(!app.focus_project_in(Dataset::Ledger, "2"));
}
