//! Display helpers for table cells and footers

use crate::core::field::{FieldValue, parse_datetime};

/// Shown in place of a date that is missing or cannot be parsed
pub const DATE_SENTINEL: &str = "—";

/// Round to `decimals` places, half away from zero
pub fn round_decimals(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Minutes as hours, rounded to one decimal place
pub fn minutes_to_hours(minutes: f64) -> f64 {
    if !minutes.is_finite() {
        return 0.0;
    }
    round_decimals(minutes / 60.0, 1)
}

/// `"2.5h"` style label for a duration in minutes
pub fn format_hours(minutes: f64) -> String {
    format!("{:.1}h", minutes_to_hours(minutes))
}

/// Amount with two decimals
pub fn format_money(amount: f64) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    format!("{:.2}", round_decimals(amount, 2))
}

/// Render a date value with a `chrono` format string
///
/// Missing or unparseable dates render as [`DATE_SENTINEL`].
pub fn format_date(value: &FieldValue, fmt: &str) -> String {
    let parsed = match value {
        FieldValue::DateTime(dt) => Some(*dt),
        FieldValue::String(s) => parse_datetime(s),
        _ => None,
    };
    parsed.map_or_else(|| DATE_SENTINEL.to_string(), |dt| dt.format(fmt).to_string())
}

/// Footer text such as `"Showing 21–23 of 23"`
pub fn showing_label(start: usize, end: usize, total: usize) -> String {
    format!("Showing {}–{} of {}", start, end, total)
}
