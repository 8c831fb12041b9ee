#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::listing::*;
use crate::models::{BudgetRecord, NormalizedProject};

fn projects(n: usize) -> Vec<NormalizedProject> {
    (0..n)
        .map(|i| {
            let mut r = BudgetRecord::new(
                if i % 2 == 0 { "Roads" } else { "Schools" },
                format!("Project {i}"),
            );
            r.approved = dec!(100);
            r.disbursed = dec!(50);
            // every third project is fully spent
            r.remaining = if i % 3 == 0 { Decimal::ZERO } else { dec!(50) };
            if i == 4 {
                r.location = Some("Ban Hong".into());
            }
            NormalizedProject::from_record(&r, i)
        })
        .collect()
}

#[test]
fn test_pages_of_ten() {
    let all = projects(25);
    let listing = ProjectListing::new(10);
    let filtered = listing.filtered(&all);
    assert_eq!(listing.page_count(filtered.len()), 3);
    assert_eq!(listing.page_rows(&filtered).len(), 10);
    assert_eq!(listing.page_rows(&filtered)[0].name, "Project 0");
}

#[test]
fn test_last_page_is_partial() {
    let all = projects(25);
    let mut listing = ProjectListing::new(10);
    listing.next_page(25);
    listing.next_page(25);
    listing.next_page(25);
    assert_eq!(listing.page, 2);
    let filtered = listing.filtered(&all);
    let rows = listing.page_rows(&filtered);
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0].name, "Project 20");
}

#[test]
fn test_empty_listing_has_one_page() {
    let listing = ProjectListing::new(10);
    assert_eq!(listing.page_count(0), 1);
    assert!(listing.page_rows(&[]).is_empty());
}

#[test]
fn test_search_resets_to_first_page() {
    let all = projects(25);
    let mut listing = ProjectListing::new(10);
    listing.next_page(25);
    listing.cursor = 3;
    listing.set_query("ban hong");
    assert_eq!((listing.page, listing.cursor), (0, 0));
    let filtered = listing.filtered(&all);
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].name, "Project 4");
}

#[test]
fn test_search_matches_category_case_insensitive() {
    let all = projects(6);
    let mut listing = ProjectListing::new(10);
    listing.set_query("SCHOOLS");
    assert_eq!(listing.filtered(&all).len(), 3);
}

#[test]
fn test_status_tabs() {
    let all = projects(9);
    let mut listing = ProjectListing::new(10);
    listing.set_filter(StatusFilter::Completed);
    assert_eq!(listing.filtered(&all).len(), 3);
    listing.set_filter(StatusFilter::Outstanding);
    assert_eq!(listing.filtered(&all).len(), 6);
    assert_eq!(ProjectListing::counts(&all), (9, 3, 6));
}

#[test]
fn test_filter_and_search_combine() {
    let all = projects(9);
    let mut listing = ProjectListing::new(10);
    listing.set_filter(StatusFilter::Completed);
    listing.set_query("roads");
    // completed: 0, 3, 6; roads: even
    let names: Vec<&str> = listing.filtered(&all).iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Project 0", "Project 6"]);
}

#[test]
fn test_cursor_and_selection() {
    let all = projects(12);
    let mut listing = ProjectListing::new(10);
    listing.cursor_down(10);
    listing.cursor_down(10);
    assert_eq!(listing.selected(&all).unwrap().name, "Project 2");
    listing.cursor_to_bottom(10);
    listing.cursor_down(10);
    assert_eq!(listing.cursor, 9);
    listing.next_page(12);
    assert_eq!(listing.selected(&all).unwrap().name, "Project 10");
    listing.prev_page();
    listing.cursor_up();
    assert_eq!(listing.cursor, 0);
}

#[test]
fn test_go_to_page_clamps() {
    let mut listing = ProjectListing::new(10);
    listing.go_to_page(7, 25);
    assert_eq!(listing.page, 2);
    listing.go_to_page(0, 25);
    assert_eq!(listing.page, 0);
}

#[test]
fn test_clamp_after_shrink() {
    let mut listing = ProjectListing::new(10);
    listing.go_to_page(3, 30);
    listing.cursor = 9;
    listing.clamp(12);
    assert_eq!((listing.page, listing.cursor), (1, 1));
    listing.clamp(0);
    assert_eq!((listing.page, listing.cursor), (0, 0));
}

#[test]
fn test_expand_toggle() {
    let mut listing = ProjectListing::new(10);
    listing.toggle_expanded("3");
    assert!(listing.is_expanded("3"));
    listing.toggle_expanded("3");
    assert!(!listing.is_expanded("3"));
    listing.toggle_expanded("4");
    listing.collapse_all();
    assert!(!listing.is_expanded("4"));
}

#[test]
fn test_status_filter_parse_and_cycle() {
    assert_eq!(StatusFilter::parse("Completed"), Some(StatusFilter::Completed));
    assert_eq!(StatusFilter::parse("open"), Some(StatusFilter::Outstanding));
    assert_eq!(StatusFilter::parse("nope"), None);
    let mut f = StatusFilter::All;
    for _ in StatusFilter::all() {
        f = f.next();
    }
    assert_eq!(f, StatusFilter::All);
}
