use rust_decimal::Decimal;
use serde_json::{Map, Value};

use super::lenient::{amount_field, object_coordinate, text_field, tuple_coordinate};
use crate::models::{BudgetRecord, Coordinate};

/// Category given to every public-works row; that dataset has no category
/// column of its own.
pub(crate) const PUBLIC_WORKS_CATEGORY: &str = "โครงการสาธารณะ";

/// Keys that only ledger rows carry.
const LEDGER_MARKERS: &[&str] = &["category_1", "project", "approved"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SourceKind {
    /// Budget ledger export: `category_1`, `project`, `approved`, `{lat, lng}`.
    Ledger,
    /// Public-works project list: `id`, `name`, `budget`, `[lng, lat]`.
    PublicWorks,
}

impl SourceKind {
    pub(crate) fn detect(row: &Map<String, Value>) -> Self {
        if LEDGER_MARKERS.iter().any(|key| row.contains_key(*key)) {
            Self::Ledger
        } else {
            Self::PublicWorks
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LedgerRow {
    pub(crate) category: Option<String>,
    pub(crate) kind: Option<String>,
    pub(crate) subcategory: Option<String>,
    pub(crate) project: Option<String>,
    pub(crate) location: Option<String>,
    pub(crate) approved: Decimal,
    pub(crate) increase: Decimal,
    pub(crate) decrease: Decimal,
    pub(crate) committed: Decimal,
    pub(crate) disbursed: Decimal,
    pub(crate) remaining: Decimal,
    pub(crate) coordinates: Option<Coordinate>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PublicWorksRow {
    pub(crate) id: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) location: Option<String>,
    pub(crate) budget: Decimal,
    pub(crate) increase: Decimal,
    pub(crate) decrease: Decimal,
    pub(crate) disbursed: Decimal,
    pub(crate) remaining: Decimal,
    pub(crate) coordinates: Option<Coordinate>,
}

/// One `budget_data` entry in whichever shape its dataset uses.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RawRecord {
    Ledger(LedgerRow),
    PublicWorks(PublicWorksRow),
}

impl RawRecord {
    /// Returns `None` for entries that are not JSON objects.
    pub(crate) fn from_value(value: &Value) -> Option<Self> {
        let row = value.as_object()?;
        Some(match SourceKind::detect(row) {
            SourceKind::Ledger => Self::Ledger(LedgerRow::from_map(row)),
            SourceKind::PublicWorks => Self::PublicWorks(PublicWorksRow::from_map(row)),
        })
    }

    pub(crate) fn into_record(self) -> BudgetRecord {
        match self {
            Self::Ledger(row) => row.into_record(),
            Self::PublicWorks(row) => row.into_record(),
        }
    }
}

impl LedgerRow {
    fn from_map(row: &Map<String, Value>) -> Self {
        Self {
            category: text_field(row, "category_1"),
            kind: text_field(row, "type"),
            subcategory: text_field(row, "category_2"),
            project: text_field(row, "project"),
            location: text_field(row, "location"),
            approved: amount_field(row, "approved"),
            increase: amount_field(row, "increase"),
            decrease: amount_field(row, "decrease"),
            committed: amount_field(row, "committed"),
            disbursed: amount_field(row, "disbursed"),
            remaining: amount_field(row, "remaining"),
            coordinates: object_coordinate(row.get("coordinates")),
        }
    }

    fn into_record(self) -> BudgetRecord {
        BudgetRecord {
            id: None,
            category: self.category.unwrap_or_default(),
            name: self.project.unwrap_or_default(),
            kind: self.kind,
            subcategory: self.subcategory,
            location: self.location,
            approved: self.approved,
            disbursed: self.disbursed,
            committed: self.committed,
            remaining: self.remaining,
            increase: self.increase,
            decrease: self.decrease,
            coordinate: self.coordinates,
        }
    }
}

impl PublicWorksRow {
    fn from_map(row: &Map<String, Value>) -> Self {
        Self {
            id: text_field(row, "id"),
            name: text_field(row, "name"),
            location: text_field(row, "location"),
            budget: amount_field(row, "budget"),
            increase: amount_field(row, "increase"),
            decrease: amount_field(row, "decrease"),
            disbursed: amount_field(row, "disbursed"),
            remaining: amount_field(row, "remaining"),
            coordinates: tuple_coordinate(row.get("coordinates")),
        }
    }

    fn into_record(self) -> BudgetRecord {
        BudgetRecord {
            id: self.id,
            category: PUBLIC_WORKS_CATEGORY.to_string(),
            name: self.name.unwrap_or_default(),
            kind: None,
            subcategory: None,
            location: self.location,
            approved: self.budget,
            disbursed: self.disbursed,
            committed: Decimal::ZERO,
            remaining: self.remaining,
            increase: self.increase,
            decrease: self.decrease,
            coordinate: self.coordinates,
        }
    }
}
