mod upstream;

use std::collections::BTreeMap;
use std::ops::AddAssign;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{BudgetRecord, NormalizedProject, ProjectStatus, PLACEHOLDER};

pub(crate) use upstream::{check_upstream, decimal_to_json, Discrepancy, UpstreamSummary};

/// The six monetary columns every record carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub(crate) struct Amounts {
    pub(crate) approved: Decimal,
    pub(crate) disbursed: Decimal,
    pub(crate) committed: Decimal,
    pub(crate) remaining: Decimal,
    pub(crate) increase: Decimal,
    pub(crate) decrease: Decimal,
}

impl AddAssign<&BudgetRecord> for Amounts {
    fn add_assign(&mut self, record: &BudgetRecord) {
        self.approved = self.approved.saturating_add(record.approved);
        self.disbursed = self.disbursed.saturating_add(record.disbursed);
        self.committed = self.committed.saturating_add(record.committed);
        self.remaining = self.remaining.saturating_add(record.remaining);
        self.increase = self.increase.saturating_add(record.increase);
        self.decrease = self.decrease.saturating_add(record.decrease);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub(crate) struct CategorySummary {
    #[serde(flatten)]
    pub(crate) amounts: Amounts,
    pub(crate) count: usize,
}

impl AddAssign<&BudgetRecord> for CategorySummary {
    fn add_assign(&mut self, record: &BudgetRecord) {
        self.amounts += record;
        self.count += 1;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub(crate) struct BudgetSummary {
    pub(crate) totals: Amounts,
    pub(crate) record_count: usize,
    pub(crate) completed_count: usize,
    pub(crate) by_category: BTreeMap<String, CategorySummary>,
    /// Grouped by the upstream `type` column; rows without one fall under
    /// [`PLACEHOLDER`].
    pub(crate) by_type: BTreeMap<String, CategorySummary>,
}

impl BudgetSummary {
    pub(crate) fn in_progress_count(&self) -> usize {
        self.record_count - self.completed_count
    }

    /// Categories sorted for display: largest approved amount first, ties by
    /// name.
    pub(crate) fn categories_by_approved(&self) -> Vec<(&str, &CategorySummary)> {
        sorted_by_approved(&self.by_category)
    }

    pub(crate) fn types_by_approved(&self) -> Vec<(&str, &CategorySummary)> {
        sorted_by_approved(&self.by_type)
    }
}

fn sorted_by_approved(groups: &BTreeMap<String, CategorySummary>) -> Vec<(&str, &CategorySummary)> {
    let mut sorted: Vec<(&str, &CategorySummary)> =
        groups.iter().map(|(k, v)| (k.as_str(), v)).collect();
    // BTreeMap iteration is already name-ordered and the sort is stable
    sorted.sort_by(|a, b| b.1.amounts.approved.cmp(&a.1.amounts.approved));
    sorted
}

pub(crate) fn summarize(records: &[BudgetRecord]) -> BudgetSummary {
    let mut summary = BudgetSummary {
        record_count: records.len(),
        completed_count: completed_count(records),
        ..BudgetSummary::default()
    };

    for record in records {
        summary.totals += record;
        *summary
            .by_category
            .entry(record.category.clone())
            .or_default() += record;
        let kind = record
            .kind
            .clone()
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        *summary.by_type.entry(kind).or_default() += record;
    }

    summary
}

pub(crate) fn completed_count(records: &[BudgetRecord]) -> usize {
    records.iter().filter(|r| r.is_completed()).count()
}

/// Anything that can be ranked within a category by its approved amount.
pub(crate) trait Ranked {
    fn category(&self) -> &str;
    fn approved(&self) -> Decimal;
}

impl Ranked for BudgetRecord {
    fn category(&self) -> &str {
        &self.category
    }

    fn approved(&self) -> Decimal {
        self.approved
    }
}

impl Ranked for NormalizedProject {
    fn category(&self) -> &str {
        &self.category
    }

    fn approved(&self) -> Decimal {
        self.budget
    }
}

/// The `n` largest items of exactly `category`, largest first. Equal amounts
/// keep their input order.
pub(crate) fn top_n<'a, T: Ranked>(items: &'a [T], category: &str, n: usize) -> Vec<&'a T> {
    let mut matching: Vec<&T> = items.iter().filter(|i| i.category() == category).collect();
    matching.sort_by(|a, b| b.approved().cmp(&a.approved()));
    matching.truncate(n);
    matching
}

/// Split into (completed, outstanding), each keeping input order.
pub(crate) fn partition_by_completion(
    projects: &[NormalizedProject],
) -> (Vec<&NormalizedProject>, Vec<&NormalizedProject>) {
    projects.iter().partition(|p| p.is_completed())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub(crate) struct StatusCounts {
    pub(crate) planned: usize,
    pub(crate) in_progress: usize,
    pub(crate) completed: usize,
}

impl StatusCounts {
    pub(crate) fn get(&self, status: ProjectStatus) -> usize {
        match status {
            ProjectStatus::Planned => self.planned,
            ProjectStatus::InProgress => self.in_progress,
            ProjectStatus::Completed => self.completed,
        }
    }

    pub(crate) fn total(&self) -> usize {
        self.planned + self.in_progress + self.completed
    }
}

pub(crate) fn status_counts(projects: &[NormalizedProject]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for project in projects {
        match project.status {
            ProjectStatus::Planned => counts.planned += 1,
            ProjectStatus::InProgress => counts.in_progress += 1,
            ProjectStatus::Completed => counts.completed += 1,
        }
    }
    counts
}

/// Project counts per location label, most projects first.
pub(crate) fn count_by_location(projects: &[NormalizedProject]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for project in projects {
        *counts.entry(project.location_label()).or_default() += 1;
    }
    let mut sorted: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    sorted
}

#[cfg(test)]
mod tests;
