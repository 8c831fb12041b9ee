use rust_decimal::Decimal;
use serde::Serialize;

use super::{BudgetRecord, Coordinate};

/// Rendered in place of a missing label or an undefined figure.
pub const PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Planned,
    InProgress,
    Completed,
}

impl ProjectStatus {
    /// `completed` when nothing remains, otherwise `in-progress` once any
    /// money has been disbursed, otherwise `planned`. Completion is checked
    /// first, so a fully spent record is never reported as planned.
    pub fn classify(remaining: Decimal, disbursed: Decimal) -> Self {
        if remaining.is_zero() {
            Self::Completed
        } else if disbursed > Decimal::ZERO {
            Self::InProgress
        } else {
            Self::Planned
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Planned => "Planned",
            Self::InProgress => "In progress",
            Self::Completed => "Completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "planned" => Some(Self::Planned),
            "in-progress" | "in_progress" | "inprogress" => Some(Self::InProgress),
            "completed" | "complete" | "done" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn all() -> &'static [ProjectStatus] {
        &[Self::Planned, Self::InProgress, Self::Completed]
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The shape every view renders, whichever upstream dataset a record came
/// from. `budget - spent == remaining` is expected but not enforced: the
/// figures are passed through exactly as the source reports them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedProject {
    pub id: String,
    pub name: String,
    pub category: String,
    pub budget: Decimal,
    pub spent: Decimal,
    pub disbursed: Decimal,
    pub remaining: Decimal,
    pub committed: Decimal,
    pub increase: Decimal,
    pub decrease: Decimal,
    pub location: Option<String>,
    pub coordinate: Option<Coordinate>,
    pub status: ProjectStatus,
}

impl NormalizedProject {
    /// `position` is the zero-based index of the record in its snapshot and
    /// is only used when the source supplied no id.
    pub fn from_record(record: &BudgetRecord, position: usize) -> Self {
        let id = record
            .id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| (position + 1).to_string());

        Self {
            id,
            name: record.name.clone(),
            category: record.category.clone(),
            budget: record.approved,
            spent: record.disbursed,
            disbursed: record.disbursed,
            remaining: record.remaining,
            committed: record.committed,
            increase: record.increase,
            decrease: record.decrease,
            location: record.location.clone(),
            coordinate: record.coordinate,
            status: ProjectStatus::classify(record.remaining, record.disbursed),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == ProjectStatus::Completed
    }

    /// Projects without a coordinate never reach the map.
    pub fn has_location(&self) -> bool {
        self.coordinate.is_some()
    }

    pub fn location_label(&self) -> &str {
        self.location
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or(PLACEHOLDER)
    }

    /// Case-insensitive substring match over name, category and location.
    pub fn matches(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&q)
            || self.category.to_lowercase().contains(&q)
            || self.location_label().to_lowercase().contains(&q)
    }
}
