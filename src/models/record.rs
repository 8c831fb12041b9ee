use rust_decimal::Decimal;
use serde::Serialize;

use super::Coordinate;

/// One budget line item from a snapshot, after source-specific field names
/// have been normalized away.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetRecord {
    /// Source-supplied identifier, if the upstream dataset has one.
    pub id: Option<String>,
    pub category: String,
    pub name: String,
    /// Upstream `type` column (ledger snapshots only).
    pub kind: Option<String>,
    /// Upstream `category_2` column (ledger snapshots only).
    pub subcategory: Option<String>,
    pub location: Option<String>,
    pub approved: Decimal,
    pub disbursed: Decimal,
    pub committed: Decimal,
    pub remaining: Decimal,
    pub increase: Decimal,
    pub decrease: Decimal,
    pub coordinate: Option<Coordinate>,
}

impl BudgetRecord {
    /// A record with the given labels and every amount at zero.
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: None,
            category: category.into(),
            name: name.into(),
            kind: None,
            subcategory: None,
            location: None,
            approved: Decimal::ZERO,
            disbursed: Decimal::ZERO,
            committed: Decimal::ZERO,
            remaining: Decimal::ZERO,
            increase: Decimal::ZERO,
            decrease: Decimal::ZERO,
            coordinate: None,
        }
    }

    /// Exact comparison: a remaining balance of `0.0000001` is still open.
    pub fn is_completed(&self) -> bool {
        self.remaining.is_zero()
    }
}
