//! Forgiving readers for snapshot and CSV fields.
//!
//! Upstream exports are hand-maintained spreadsheets, so a number can show up
//! as a JSON number, a string with thousands separators, an empty cell, or be
//! missing entirely. Amounts that cannot be read become zero so a view
//! degrades instead of failing.

use std::str::FromStr;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::models::Coordinate;

/// Upper bound on a single amount; anything larger reads as unreadable.
fn max_amount() -> Decimal {
    Decimal::from(1_000_000_000_000_000_i64)
}

static NON_NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"[^0-9.eE+\-]").unwrap()
});

/// Parse a human-formatted amount such as `"1,234.50"`, `"฿ 99"` or
/// `"(500.00)"`. Empty input is zero; anything else unreadable is an error.
pub(crate) fn parse_decimal(s: &str) -> Result<Decimal> {
    let trimmed = s.trim().trim_matches('"').trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let negative = trimmed.starts_with('(') && trimmed.ends_with(')');
    let cleaned = NON_NUMERIC.replace_all(trimmed, "");
    if cleaned.is_empty() {
        anyhow::bail!("Failed to parse '{s}' as decimal");
    }
    let value = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .with_context(|| format!("Failed to parse '{s}' as decimal"))?;
    if value.abs() > max_amount() {
        anyhow::bail!("Amount '{s}' is out of range");
    }
    Ok(if negative { -value.abs() } else { value })
}

/// Read an amount, treating absent, null and malformed values as zero.
pub(crate) fn amount(value: Option<&Value>) -> Decimal {
    let parsed = match value {
        Some(Value::Number(n)) => parse_decimal(&n.to_string()),
        Some(Value::String(s)) => parse_decimal(s),
        Some(Value::Null) | None => return Decimal::ZERO,
        Some(other) => Err(anyhow::anyhow!("unexpected amount {other}")),
    };
    parsed.unwrap_or_else(|e| {
        tracing::debug!("Treating amount as zero: {e}");
        Decimal::ZERO
    })
}

pub(crate) fn amount_field(row: &Map<String, Value>, key: &str) -> Decimal {
    amount(row.get(key))
}

/// Read a label. Numbers are accepted because some exports number their
/// rows (`"no": 12`); blank strings count as absent.
pub(crate) fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn text_field(row: &Map<String, Value>, key: &str) -> Option<String> {
    text(row.get(key))
}

fn float(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// `{"lat": .., "lng": ..}`, the ledger encoding.
pub(crate) fn object_coordinate(value: Option<&Value>) -> Option<Coordinate> {
    let obj = value?.as_object()?;
    Coordinate::new(float(obj.get("lat"))?, float(obj.get("lng"))?)
}

/// `[lng, lat]`, the public-works encoding. Note the order.
pub(crate) fn tuple_coordinate(value: Option<&Value>) -> Option<Coordinate> {
    match value?.as_array()?.as_slice() {
        [lng, lat] => Coordinate::new(float(Some(lat))?, float(Some(lng))?),
        _ => None,
    }
}
