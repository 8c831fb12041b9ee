use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};

use super::{BudgetSummary, CategorySummary};
use crate::ingest::{lenient, PUBLIC_WORKS_CATEGORY};
use crate::models::{BudgetRecord, PLACEHOLDER};

const PROJECT_WORD: &str = "โครงการ";
const OTHER_LABEL: &str = "อื่นๆ";

/// Upstream rounds every figure to two decimal places.
fn tolerance() -> Decimal {
    Decimal::new(1, 2)
}

/// Key a record is filed under in the upstream `by_category_1` block.
/// Ledger rows use their category. Public-works rows have none, so the
/// exporter labels them by the part of the name before `โครงการ`, or
/// `อื่นๆ` when the word is absent.
pub(crate) fn upstream_category(record: &BudgetRecord) -> &str {
    if record.category != PUBLIC_WORKS_CATEGORY {
        return &record.category;
    }
    record
        .name
        .split_once(PROJECT_WORD)
        .map_or(OTHER_LABEL, |(head, _)| head)
}

/// Records grouped the way the exporter groups them.
fn upstream_categories(records: &[BudgetRecord]) -> BTreeMap<String, CategorySummary> {
    let mut groups: BTreeMap<String, CategorySummary> = BTreeMap::new();
    for record in records {
        *groups.entry(upstream_category(record).to_string()).or_default() += record;
    }
    groups
}

/// One group of upstream figures. Fields are optional because the two
/// exporters emit different subsets.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct UpstreamGroup {
    pub(crate) approved: Option<Decimal>,
    pub(crate) disbursed: Option<Decimal>,
    pub(crate) committed: Option<Decimal>,
    pub(crate) remaining: Option<Decimal>,
    pub(crate) increase: Option<Decimal>,
    pub(crate) decrease: Option<Decimal>,
    pub(crate) project_count: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct UpstreamSummary {
    pub(crate) by_category: BTreeMap<String, UpstreamGroup>,
    pub(crate) by_type: BTreeMap<String, UpstreamGroup>,
    pub(crate) total: Option<UpstreamGroup>,
}

impl UpstreamGroup {
    fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };
        let field = |key: &str| obj.get(key).map(|v| lenient::amount(Some(v)));
        Self {
            approved: field("approved"),
            disbursed: field("disbursed"),
            committed: field("committed"),
            remaining: field("remaining"),
            increase: field("increase"),
            decrease: field("decrease"),
            project_count: obj
                .get("project_count")
                .and_then(Value::as_u64)
                .and_then(|n| usize::try_from(n).ok()),
        }
    }

    fn fields(&self) -> [(&'static str, Option<Decimal>); 6] {
        [
            ("approved", self.approved),
            ("disbursed", self.disbursed),
            ("committed", self.committed),
            ("remaining", self.remaining),
            ("increase", self.increase),
            ("decrease", self.decrease),
        ]
    }
}

impl From<&CategorySummary> for UpstreamGroup {
    fn from(group: &CategorySummary) -> Self {
        let a = &group.amounts;
        Self {
            approved: Some(a.approved.round_dp(2)),
            disbursed: Some(a.disbursed.round_dp(2)),
            committed: Some(a.committed.round_dp(2)),
            remaining: Some(a.remaining.round_dp(2)),
            increase: Some(a.increase.round_dp(2)),
            decrease: Some(a.decrease.round_dp(2)),
            project_count: Some(group.count),
        }
    }
}

impl UpstreamSummary {
    /// Anything that is not an object reads as an empty summary.
    pub(crate) fn from_value(value: &Value) -> Self {
        let groups = |key: &str| -> BTreeMap<String, UpstreamGroup> {
            value
                .get(key)
                .and_then(Value::as_object)
                .map(|obj| {
                    obj.iter()
                        .map(|(name, v)| (name.clone(), UpstreamGroup::from_value(v)))
                        .collect()
                })
                .unwrap_or_default()
        };
        Self {
            by_category: groups("by_category_1"),
            by_type: groups("by_type"),
            total: value.get("total").map(UpstreamGroup::from_value),
        }
    }

    /// Build the block the upstream exporter would have written for these
    /// records. Untyped rows are left out of `by_type`, as upstream drops them.
    pub(crate) fn from_records(records: &[BudgetRecord], summary: &BudgetSummary) -> Self {
        let total = CategorySummary {
            amounts: summary.totals,
            count: summary.record_count,
        };
        Self {
            by_category: upstream_categories(records)
                .iter()
                .map(|(k, v)| (k.clone(), UpstreamGroup::from(v)))
                .collect(),
            by_type: summary
                .by_type
                .iter()
                .filter(|(k, _)| k.as_str() != PLACEHOLDER)
                .map(|(k, v)| (k.clone(), UpstreamGroup::from(v)))
                .collect(),
            total: Some(UpstreamGroup::from(&total)),
        }
    }

    pub(crate) fn to_value(&self) -> Value {
        let groups = |map: &BTreeMap<String, UpstreamGroup>| -> Value {
            Value::Object(
                map.iter()
                    .map(|(k, g)| (k.clone(), group_to_value(g)))
                    .collect::<Map<String, Value>>(),
            )
        };
        json!({
            "by_category_1": groups(&self.by_category),
            "by_type": groups(&self.by_type),
            "total": self.total.as_ref().map(group_to_value).unwrap_or(Value::Null),
        })
    }
}

fn group_to_value(group: &UpstreamGroup) -> Value {
    let mut obj = Map::new();
    for (key, amount) in group.fields() {
        if let Some(amount) = amount {
            obj.insert(key.to_string(), decimal_to_json(amount));
        }
    }
    if let Some(count) = group.project_count {
        obj.insert("project_count".into(), Value::from(count));
    }
    Value::Object(obj)
}

/// JSON has no decimal type; snapshots carry plain numbers.
pub(crate) fn decimal_to_json(amount: Decimal) -> Value {
    amount
        .to_f64()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// A figure in the snapshot's embedded summary that disagrees with what the
/// records actually add up to.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Discrepancy {
    pub(crate) scope: String,
    pub(crate) field: &'static str,
    pub(crate) computed: Option<Decimal>,
    pub(crate) reported: Option<Decimal>,
}

impl std::fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let show = |v: Option<Decimal>| v.map_or_else(|| "missing".to_string(), |d| d.to_string());
        write!(
            f,
            "{} {}: computed {}, reported {}",
            self.scope,
            self.field,
            show(self.computed),
            show(self.reported)
        )
    }
}

/// Compare our aggregation against the upstream block. Only fields upstream
/// actually reports are compared; groups present on one side only are
/// reported with the other side missing. `by_type` is only checked when
/// upstream wrote one.
pub(crate) fn check_upstream(
    records: &[BudgetRecord],
    summary: &BudgetSummary,
    upstream: &UpstreamSummary,
) -> Vec<Discrepancy> {
    let mut found = Vec::new();

    if let Some(total) = &upstream.total {
        let computed = CategorySummary {
            amounts: summary.totals,
            count: summary.record_count,
        };
        compare_group("total", &computed, total, &mut found);
    }

    compare_groups(
        "category",
        &upstream_categories(records),
        &upstream.by_category,
        &mut found,
    );

    if !upstream.by_type.is_empty() {
        let mut typed = summary.by_type.clone();
        typed.remove(PLACEHOLDER);
        compare_groups("type", &typed, &upstream.by_type, &mut found);
    }

    found
}

fn compare_groups(
    kind: &str,
    computed: &BTreeMap<String, CategorySummary>,
    reported: &BTreeMap<String, UpstreamGroup>,
    found: &mut Vec<Discrepancy>,
) {
    for (name, ours) in computed {
        let scope = format!("{kind} '{name}'");
        match reported.get(name) {
            Some(theirs) => compare_group(&scope, ours, theirs, found),
            None => found.push(Discrepancy {
                scope,
                field: "approved",
                computed: Some(ours.amounts.approved),
                reported: None,
            }),
        }
    }
    for (name, theirs) in reported {
        if !computed.contains_key(name) {
            found.push(Discrepancy {
                scope: format!("{kind} '{name}'"),
                field: "approved",
                computed: None,
                reported: theirs.approved,
            });
        }
    }
}

fn compare_group(
    scope: &str,
    computed: &CategorySummary,
    reported: &UpstreamGroup,
    found: &mut Vec<Discrepancy>,
) {
    let ours = UpstreamGroup::from(computed);
    for ((field, mine), (_, theirs)) in ours.fields().into_iter().zip(reported.fields()) {
        let (Some(mine), Some(theirs)) = (mine, theirs) else {
            continue;
        };
        let apart = mine.checked_sub(theirs).map_or(true, |d| d.abs() > tolerance());
        if apart {
            found.push(Discrepancy {
                scope: scope.to_string(),
                field,
                computed: Some(mine),
                reported: Some(theirs),
            });
        }
    }
    if let Some(count) = reported.project_count {
        if count != computed.count {
            found.push(Discrepancy {
                scope: scope.to_string(),
                field: "project_count",
                computed: Some(Decimal::from(computed.count)),
                reported: Some(Decimal::from(count)),
            });
        }
    }
}
