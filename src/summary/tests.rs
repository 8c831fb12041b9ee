#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use super::*;
use crate::models::NormalizedProject;

fn record(category: &str, name: &str, approved: Decimal, remaining: Decimal) -> BudgetRecord {
    let mut r = BudgetRecord::new(category, name);
    r.approved = approved;
    r.remaining = remaining;
    r.disbursed = approved - remaining;
    r
}

fn projects_of(records: &[BudgetRecord]) -> Vec<NormalizedProject> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| NormalizedProject::from_record(r, i))
        .collect()
}

fn sample() -> Vec<BudgetRecord> {
    vec![
        record("Roads", "Bridge", dec!(500), dec!(0)),
        record("Schools", "Library", dec!(120.50), dec!(20.50)),
        record("Roads", "Culvert", dec!(75.25), dec!(75.25)),
        record("Health", "Clinic", dec!(300), dec!(0)),
        record("Roads", "Resurfacing", dec!(500), dec!(10)),
    ]
}

// ── summarize ─────────────────────────────────────────────────

#[test]
fn test_totals_and_completed_scenario() {
    let records = vec![
        record("A", "one", dec!(100), dec!(0)),
        record("A", "two", dec!(50), dec!(10)),
    ];
    let summary = summarize(&records);
    assert_eq!(summary.totals.approved, dec!(150));
    assert_eq!(summary.completed_count, 1);
    assert_eq!(summary.in_progress_count(), 1);
}

#[test]
fn test_category_grouping_scenario() {
    let records = vec![
        record("A", "x", dec!(10), dec!(1)),
        record("A", "y", dec!(20), dec!(1)),
        record("B", "z", dec!(5), dec!(1)),
    ];
    let summary = summarize(&records);
    assert_eq!(summary.by_category.len(), 2);
    assert_eq!(summary.by_category["A"].amounts.approved, dec!(30));
    assert_eq!(summary.by_category["A"].count, 2);
    assert_eq!(summary.by_category["B"].amounts.approved, dec!(5));
    assert_eq!(summary.by_category["B"].count, 1);
}

#[test]
fn test_category_sums_equal_total() {
    let summary = summarize(&sample());
    let picks: [fn(&Amounts) -> Decimal; 4] = [
        |a: &Amounts| a.approved,
        |a: &Amounts| a.disbursed,
        |a: &Amounts| a.committed,
        |a: &Amounts| a.remaining,
    ];
    for pick in picks {
        let by_cat: Decimal = summary.by_category.values().map(|c| pick(&c.amounts)).sum();
        assert_eq!(by_cat, pick(&summary.totals));
    }
}

#[test]
fn test_category_sums_are_exact_with_fractions() {
    // 0.1 + 0.2 style inputs that would drift in binary floating point
    let records: Vec<BudgetRecord> = (0..10)
        .map(|i| record(if i % 2 == 0 { "A" } else { "B" }, "p", dec!(0.1), dec!(0.1)))
        .chain(std::iter::once(record("C", "q", dec!(0.2), dec!(0))))
        .collect();
    let summary = summarize(&records);
    let by_cat: Decimal = summary.by_category.values().map(|c| c.amounts.approved).sum();
    assert_eq!(by_cat, dec!(1.2));
    assert_eq!(summary.totals.approved, dec!(1.2));
}

#[test]
fn test_absent_categories_do_not_appear() {
    let summary = summarize(&[record("Roads", "Bridge", dec!(1), dec!(0))]);
    assert_eq!(summary.by_category.keys().collect::<Vec<_>>(), vec!["Roads"]);
}

#[test]
fn test_empty_input() {
    let summary = summarize(&[]);
    assert_eq!(summary.totals, Amounts::default());
    assert_eq!(summary.record_count, 0);
    assert_eq!(summary.completed_count, 0);
    assert!(summary.by_category.is_empty());
}

#[test]
fn test_completed_count_bounded_by_len() {
    let records = sample();
    let summary = summarize(&records);
    assert!(summary.completed_count <= records.len());
    assert_eq!(
        summary.completed_count + summary.in_progress_count(),
        records.len()
    );
    assert_eq!(completed_count(&records), summary.completed_count);
}

#[test]
fn test_completed_requires_exact_zero() {
    let records = vec![
        record("A", "done", dec!(10), dec!(0)),
        record("A", "almost", dec!(10), dec!(0.0000001)),
    ];
    assert_eq!(completed_count(&records), 1);
}

#[test]
fn test_by_type_groups_missing_kind_under_placeholder() {
    let mut typed = record("A", "x", dec!(10), dec!(0));
    typed.kind = Some("capital".into());
    let untyped = record("A", "y", dec!(4), dec!(0));
    let summary = summarize(&[typed, untyped]);
    assert_eq!(summary.by_type["capital"].amounts.approved, dec!(10));
    assert_eq!(summary.by_type[PLACEHOLDER].amounts.approved, dec!(4));
}

#[test]
fn test_categories_by_approved_sorted_descending() {
    let summary = summarize(&sample());
    let names: Vec<&str> = summary
        .categories_by_approved()
        .iter()
        .map(|(name, _)| *name)
        .collect();
    assert_eq!(names, vec!["Roads", "Health", "Schools"]);
}

#[test]
fn test_categories_by_approved_ties_by_name() {
    let records = vec![
        record("Zeta", "a", dec!(10), dec!(0)),
        record("Alpha", "b", dec!(10), dec!(0)),
    ];
    let summary = summarize(&records);
    let names: Vec<&str> = summary
        .categories_by_approved()
        .iter()
        .map(|(name, _)| *name)
        .collect();
    assert_eq!(names, vec!["Alpha", "Zeta"]);
}

// ── top_n ─────────────────────────────────────────────────────

#[test]
fn test_top_n_filters_and_sorts() {
    let records = sample();
    let top = top_n(&records, "Roads", 2);
    assert_eq!(top.len(), 2);
    assert!(top.iter().all(|r| r.category == "Roads"));
    assert!(top[0].approved >= top[1].approved);
}

#[test]
fn test_top_n_ties_keep_input_order() {
    let records = sample();
    let top = top_n(&records, "Roads", 3);
    let names: Vec<&str> = top.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Bridge", "Resurfacing", "Culvert"]);
}

#[test]
fn test_top_n_at_most_n() {
    let records = sample();
    assert_eq!(top_n(&records, "Roads", 10).len(), 3);
    assert!(top_n(&records, "Roads", 0).is_empty());
    assert!(top_n(&records, "Parks", 5).is_empty());
}

#[test]
fn test_top_n_exact_category_match() {
    let records = sample();
    assert!(top_n(&records, "roads", 5).is_empty());
    assert!(top_n(&records, "Road", 5).is_empty());
}

#[test]
fn test_top_n_idempotent() {
    let records = sample();
    let first: Vec<&str> = top_n(&records, "Roads", 5).iter().map(|r| r.name.as_str()).collect();
    let second: Vec<&str> = top_n(&records, "Roads", 5).iter().map(|r| r.name.as_str()).collect();
    assert_eq!(first, second);
}

#[test]
fn test_top_n_over_projects() {
    let projects = projects_of(&sample());
    let top = top_n(&projects, "Roads", 1);
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].name, "Bridge");
    assert_eq!(top[0].id, "1");
}

// ── partition / status ────────────────────────────────────────

#[test]
fn test_partition_by_completion() {
    let projects = projects_of(&sample());
    let (done, open) = partition_by_completion(&projects);
    assert_eq!(done.len(), 2);
    assert_eq!(open.len(), 3);
    assert_eq!(done[0].name, "Bridge");
    assert_eq!(done[1].name, "Clinic");
    assert_eq!(open[0].name, "Library");
}

#[test]
fn test_status_counts() {
    let mut records = sample();
    // untouched culvert: nothing disbursed, everything remaining
    records[2].disbursed = Decimal::ZERO;
    let counts = status_counts(&projects_of(&records));
    assert_eq!(counts.completed, 2);
    assert_eq!(counts.in_progress, 2);
    assert_eq!(counts.planned, 1);
    assert_eq!(counts.total(), records.len());
    assert_eq!(counts.get(ProjectStatus::Planned), 1);
}

#[test]
fn test_count_by_location() {
    let mut records = sample();
    records[0].location = Some("Mueang".into());
    records[1].location = Some("Mueang".into());
    records[2].location = Some("Li".into());
    let counts = count_by_location(&projects_of(&records));
    assert_eq!(counts.len(), 3);
    assert!(counts.contains(&("Mueang".to_string(), 2)));
    assert!(counts.contains(&(PLACEHOLDER.to_string(), 2)));
    assert_eq!(counts[2], ("Li".to_string(), 1));
}

// ── upstream ──────────────────────────────────────────────────

#[test]
fn test_upstream_round_trip_has_no_discrepancies() {
    let records = sample();
    let summary = summarize(&records);
    let block = UpstreamSummary::from_records(&records, &summary).to_value();
    assert!(check_upstream(&records, &summary, &UpstreamSummary::from_value(&block)).is_empty());
}

#[test]
fn test_upstream_mismatch_reported() {
    let records = sample();
    let summary = summarize(&records);
    let upstream = UpstreamSummary::from_value(&json!({
        "by_category_1": {
            "Roads": { "approved": 1075.25, "project_count": 3 },
            "Health": { "approved": 999 },
            "Parks": { "approved": 1 }
        },
        "total": { "approved": 1495.75, "disbursed": 1 }
    }));
    let found = check_upstream(&records, &summary, &upstream);
    let described: Vec<String> = found.iter().map(|d| d.to_string()).collect();

    assert!(found.iter().any(|d| d.scope == "total" && d.field == "disbursed"));
    assert!(!found.iter().any(|d| d.scope == "total" && d.field == "approved"));
    assert!(found.iter().any(|d| d.scope == "category 'Health'" && d.field == "approved"));
    assert!(described.iter().any(|d| d.contains("'Schools'") && d.contains("reported missing")));
    assert!(described.iter().any(|d| d.contains("'Parks'") && d.contains("computed missing")));
    assert!(!found.iter().any(|d| d.scope == "category 'Roads'"));
}

#[test]
fn test_upstream_within_rounding_tolerance() {
    let records = vec![record("A", "x", dec!(10.004), dec!(0))];
    let upstream = UpstreamSummary::from_value(&json!({
        "by_category_1": { "A": { "approved": 10.0 } },
        "total": { "approved": 10.0 }
    }));
    assert!(check_upstream(&records, &summarize(&records), &upstream).is_empty());
}

#[test]
fn test_upstream_not_an_object() {
    let upstream = UpstreamSummary::from_value(&json!("oops"));
    assert!(upstream.by_category.is_empty());
    assert!(upstream.total.is_none());
}

fn public_work(name: &str, budget: Decimal, disbursed: Decimal) -> BudgetRecord {
    let mut r = record(crate::ingest::PUBLIC_WORKS_CATEGORY, name, budget, budget - disbursed);
    r.disbursed = disbursed;
    r
}

#[test]
fn test_upstream_category_uses_name_prefix_for_public_works() {
    let road = public_work("ก่อสร้างถนนโครงการ หมู่ 3", dec!(100), dec!(100));
    let other = public_work("ขุดลอกคลอง", dec!(20), dec!(0));
    let ledger = record("Roads", "โครงการ Bridge", dec!(1), dec!(0));
    assert_eq!(upstream::upstream_category(&road), "ก่อสร้างถนน");
    assert_eq!(upstream::upstream_category(&other), "อื่นๆ");
    assert_eq!(upstream::upstream_category(&ledger), "Roads");
}

#[test]
fn test_upstream_public_works_block_as_exported() {
    let records = vec![
        public_work("ก่อสร้างถนนโครงการ หมู่ 3", dec!(100), dec!(100)),
        public_work("ขุดลอกคลอง", dec!(20), dec!(5)),
    ];
    // exactly the block the public-works exporter writes
    let upstream = UpstreamSummary::from_value(&json!({
        "by_category_1": {
            "ก่อสร้างถนน": {
                "approved": 100, "increase": 0, "decrease": 0, "committed": 0,
                "disbursed": 100, "remaining": 0, "project_count": 1
            },
            "อื่นๆ": {
                "approved": 20, "increase": 0, "decrease": 0, "committed": 0,
                "disbursed": 5, "remaining": 15, "project_count": 1
            }
        },
        "total": { "disbursed": 105, "committed": 0, "remaining": 15, "approved": 120 },
        "metadata": { "date": "2025-03-31" }
    }));
    assert!(check_upstream(&records, &summarize(&records), &upstream).is_empty());
}

#[test]
fn test_upstream_by_type_compared_when_present() {
    let mut capital = record("A", "x", dec!(10), dec!(0));
    capital.kind = Some("capital".into());
    let untyped = record("A", "y", dec!(4), dec!(0));
    let records = vec![capital, untyped];
    let summary = summarize(&records);

    let matching = UpstreamSummary::from_value(&json!({
        "by_type": { "capital": { "approved": 10, "project_count": 1 } }
    }));
    assert!(check_upstream(&records, &summary, &matching).is_empty());

    let wrong = UpstreamSummary::from_value(&json!({
        "by_type": {
            "capital": { "approved": 12 },
            "operating": { "approved": 3 }
        }
    }));
    let found = check_upstream(&records, &summary, &wrong);
    assert_eq!(found.len(), 2);
    assert!(found.iter().any(|d| d.scope == "type 'capital'" && d.field == "approved"));
    assert!(found.iter().any(|d| d.scope == "type 'operating'" && d.computed.is_none()));
}

// ── overflow ──────────────────────────────────────────────────

#[test]
fn test_summarize_saturates_instead_of_overflowing() {
    let records = vec![
        record("A", "x", Decimal::MAX, dec!(0)),
        record("A", "y", Decimal::MAX, dec!(0)),
    ];
    let summary = summarize(&records);
    assert_eq!(summary.totals.approved, Decimal::MAX);
    assert_eq!(summary.by_category["A"].amounts.approved, Decimal::MAX);
}
