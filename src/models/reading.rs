use crate::error::{AppError, Result};

pub const CELSIUS_SUFFIX: &str = "°C";

/// Round to two decimals on the exact binary value, ties to even.
pub fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Shortest round-trip text with at least one fractional digit (`18.0`, `18.6`).
pub fn format_reading(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{}.0", text)
    } else {
        text
    }
}

/// Integer part of a scraped reading such as `"18°C"` or `"-3 °C"`.
pub fn truncate_web_reading(text: &str) -> Result<i64> {
    let trimmed = text.trim();
    let number = trimmed
        .strip_suffix(CELSIUS_SUFFIX)
        .unwrap_or(trimmed)
        .trim();
    number
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.trunc() as i64)
        .ok_or_else(|| AppError::UnparseableReading(text.to_string()))
}

pub fn truncate_stored_reading(value: f64) -> Result<i64> {
    if value.is_finite() {
        Ok(value.trunc() as i64)
    } else {
        Err(AppError::UnparseableReading(value.to_string()))
    }
}
