#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::util::*;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
}

#[test]
fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 5), "hell…");
}

#[test]
fn test_truncate_empty() {
    assert_eq!(truncate("", 5), "");
}

#[test]
fn test_truncate_zero_max() {
    assert_eq!(truncate("hello", 0), "");
}

#[test]
fn test_truncate_unicode() {
    // Japanese characters are multi-byte UTF-8
    assert_eq!(truncate("日本語テスト", 4), "日本語…");
}

#[test]
fn test_truncate_emoji() {
    assert_eq!(truncate("🎉🎊🎈🎁", 3), "🎉🎊…");
}

#[test]
fn test_truncate_one_char() {
    assert_eq!(truncate("hello", 1), "…");
}

#[test]
fn test_truncate_mixed_unicode() {
    assert_eq!(truncate("café résumé", 5), "café…");
}

#[test]
fn test_truncate_two_chars() {
    assert_eq!(truncate("hello", 2), "h…");
}

#[test]
fn test_truncate_single_char_string() {
    assert_eq!(truncate("a", 1), "a");
    assert_eq!(truncate("a", 5), "a");
}

#[test]
fn test_truncate_max_one_with_long_string() {
    // max=1 should always produce "…" for strings longer than 1
    assert_eq!(truncate("ab", 1), "…");
    assert_eq!(truncate("abc", 1), "…");
}

// ── format_currency ───────────────────────────────────────

#[test]
fn test_format_currency_basic() {
    assert_eq!(format_currency(dec!(1234.56), "฿"), "฿1,234.56");
}

#[test]
fn test_format_currency_no_commas() {
    assert_eq!(format_currency(dec!(999.99), "฿"), "฿999.99");
}

#[test]
fn test_format_currency_zero() {
    assert_eq!(format_currency(dec!(0), "฿"), "฿0.00");
}

#[test]
fn test_format_currency_negative() {
    assert_eq!(format_currency(dec!(-42.50), "฿"), "-฿42.50");
}

#[test]
fn test_format_currency_large() {
    assert_eq!(format_currency(dec!(1234567.89), "฿"), "฿1,234,567.89");
}

#[test]
fn test_format_currency_rounds_to_two_decimals() {
    assert_eq!(format_currency(dec!(1.5), "$"), "$1.50");
    assert_eq!(format_currency(dec!(2.345), "$"), "$2.35");
}

// ── format_number ─────────────────────────────────────────────

#[test]
fn test_format_number_drops_trailing_zeros() {
    assert_eq!(format_number(dec!(1234567.50)), "1,234,567.5");
    assert_eq!(format_number(dec!(10000000.00)), "10,000,000");
}

#[test]
fn test_format_number_negative() {
    assert_eq!(format_number(dec!(-1500)), "-1,500");
}

#[test]
fn test_format_count() {
    assert_eq!(format_count(0), "0");
    assert_eq!(format_count(1234), "1,234");
}

#[test]
fn test_format_millions() {
    assert_eq!(format_millions(dec!(12345678)), "12.3M");
    assert_eq!(format_millions(dec!(0)), "0.0M");
}

// ── format_percentage ─────────────────────────────────────────

#[test]
fn test_format_percentage_zero_over_zero_is_placeholder() {
    assert_eq!(format_percentage(Some(dec!(0)), Some(dec!(0))), "-");
}

#[test]
fn test_format_percentage_absent_inputs() {
    assert_eq!(format_percentage(None, Some(dec!(10))), "-");
    assert_eq!(format_percentage(Some(dec!(10)), None), "-");
}

#[test]
fn test_format_percentage_basic() {
    assert_eq!(format_percentage(Some(dec!(1)), Some(dec!(4))), "25.00%");
    assert_eq!(format_percentage(Some(dec!(1)), Some(dec!(3))), "33.33%");
    assert_eq!(format_percentage(Some(dec!(0)), Some(dec!(3))), "0.00%");
}

#[test]
fn test_ratio() {
    assert_eq!(ratio(Some(dec!(5)), Some(dec!(10))), Some(dec!(0.5)));
    assert_eq!(ratio(Some(dec!(5)), Some(dec!(0))), None);
}

// ── scrolling ─────────────────────────────────────────────────

#[test]
fn test_scroll_down_keeps_cursor_visible() {
    let (mut index, mut scroll) = (0, 0);
    for _ in 0..5 {
        scroll_down(&mut index, &mut scroll, 10, 3);
    }
    assert_eq!(index, 5);
    assert_eq!(scroll, 3);
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (2, 0);
    scroll_down(&mut index, &mut scroll, 3, 5);
    assert_eq!(index, 2);
}

#[test]
fn test_scroll_up_and_bounds() {
    let (mut index, mut scroll) = (4, 4);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (3, 3));
    scroll_to_bottom(&mut index, &mut scroll, 10, 4);
    assert_eq!((index, scroll), (9, 6));
    scroll_to_top(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}

// ── centered_rect ─────────────────────────────────────────────

#[test]
fn test_centered_rect_fits() {
    let area = ratatui::layout::Rect::new(0, 0, 100, 40);
    let r = centered_rect(area, 76, 20);
    assert_eq!((r.x, r.y, r.width, r.height), (12, 10, 76, 20));
}

#[test]
fn test_centered_rect_shrinks_to_small_area() {
    let area = ratatui::layout::Rect::new(2, 1, 40, 10);
    let r = centered_rect(area, 76, 30);
    assert_eq!(r.width, 36);
    assert_eq!(r.height, 8);
    assert_eq!((r.x, r.y), (4, 2));
}

#[test]
fn test_format_percentage_overflow_is_placeholder() {
    use rust_decimal::Decimal;
    assert_eq!(format_percentage(Some(Decimal::MAX), Some(Decimal::ONE)), "-");
}
