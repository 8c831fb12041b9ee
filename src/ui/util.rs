use ratatui::layout::Rect;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::PLACEHOLDER;

/// Group the integer digits of an already-formatted number in threes.
fn group_thousands(int_part: &str) -> String {
    int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",")
}

/// Half away from zero, as printed figures are rounded.
fn round_half_up(val: Decimal, dp: u32) -> Decimal {
    val.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

fn split_fixed(val: Decimal, dp: u32) -> (String, String) {
    let formatted = format!("{:.*}", dp as usize, round_half_up(val.abs(), dp));
    let mut parts = formatted.split('.');
    let int_part = group_thousands(parts.next().unwrap_or("0"));
    let dec_part = parts.next().unwrap_or("").to_string();
    (int_part, dec_part)
}

/// Thousand separators, at most two decimals, trailing zeros dropped.
/// e.g. `1234567.5` → `"1,234,567.5"`
pub(crate) fn format_number(val: Decimal) -> String {
    let (int_part, dec_part) = split_fixed(val, 2);
    let dec_part = dec_part.trim_end_matches('0');
    let sign = if round_half_up(val, 2) < Decimal::ZERO { "-" } else { "" };
    if dec_part.is_empty() {
        format!("{sign}{int_part}")
    } else {
        format!("{sign}{int_part}.{dec_part}")
    }
}

pub(crate) fn format_count(n: usize) -> String {
    group_thousands(&n.to_string())
}

/// Currency with exactly two decimals, e.g. `฿1,234.50`.
pub(crate) fn format_currency(val: Decimal, symbol: &str) -> String {
    let (int_part, dec_part) = split_fixed(val, 2);
    if round_half_up(val, 2) < Decimal::ZERO {
        format!("-{symbol}{int_part}.{dec_part}")
    } else {
        format!("{symbol}{int_part}.{dec_part}")
    }
}

/// Millions with one decimal for chart labels, e.g. `12.3M`.
pub(crate) fn format_millions(val: Decimal) -> String {
    let millions = round_half_up(val / Decimal::from(1_000_000), 1);
    format!("{millions:.1}M")
}

/// `value / total` as a percentage with two decimals. An absent value or a
/// zero or absent total renders the placeholder.
pub(crate) fn format_percentage(value: Option<Decimal>, total: Option<Decimal>) -> String {
    match ratio(value, total).and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED)) {
        Some(pct) => format!("{:.2}%", round_half_up(pct, 2)),
        None => PLACEHOLDER.to_string(),
    }
}

pub(crate) fn ratio(value: Option<Decimal>, total: Option<Decimal>) -> Option<Decimal> {
    let (value, total) = (value?, total?);
    if total.is_zero() {
        return None;
    }
    value.checked_div(total)
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// The result is guaranteed to be at most `max` characters (counting "…" as one).
/// Safe for multi-byte UTF-8 characters.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

/// A `width` x `height` box centered in `area`, shrunk to leave a margin
/// when `area` is too small.
pub(crate) fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Move a list cursor down by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_down(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if *index + 1 < len {
        *index += 1;
        if *index >= *scroll + page {
            *scroll = index.saturating_sub(page.saturating_sub(1));
        }
    }
}

/// Move a list cursor up by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_up(index: &mut usize, scroll: &mut usize) {
    *index = index.saturating_sub(1);
    if *index < *scroll {
        *scroll = *index;
    }
}

/// Jump cursor to the top of a list.
pub(crate) fn scroll_to_top(index: &mut usize, scroll: &mut usize) {
    *index = 0;
    *scroll = 0;
}

/// Jump cursor to the bottom of a list.
pub(crate) fn scroll_to_bottom(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if len > 0 {
        *index = len - 1;
        *scroll = index.saturating_sub(page.saturating_sub(1));
    }
}
