//! Display text for size and date cells.

use chrono::{DateTime, Local, TimeZone};

const SIZE_UNITS: [&str; 5] = ["KB", "MB", "GB", "TB", "PB"];

/// Format a byte count the way file browsers show it.
///
/// Sizes are never shown in bytes: empty files read `0 KB` and anything
/// smaller than a kilobyte reads `1 KB`. Larger sizes use the biggest unit
/// that keeps the value at or above one, rounded to a whole number.
///
/// ```
/// use fstree::format::format_size;
///
/// assert_eq!(format_size(0), "0 KB");
/// assert_eq!(format_size(100), "1 KB");
/// assert_eq!(format_size(4 * 1024 * 1024), "4 MB");
/// ```
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return format!("0 {}", SIZE_UNITS[0]);
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let shown = if value < 1.0 { 1 } else { value.round() as u64 };
    format!("{} {}", shown, SIZE_UNITS[unit])
}

/// Format a millisecond Unix timestamp in the local time zone.
pub fn format_timestamp(millis: i64) -> String {
    format_timestamp_in(millis, &Local)
}

/// Format a millisecond Unix timestamp as `M/D/YYYY hh:mm AM` in `tz`.
///
/// Timestamps chrono cannot represent format as an empty string.
pub fn format_timestamp_in<Tz>(millis: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match DateTime::from_timestamp_millis(millis) {
        Some(utc) => utc.with_timezone(tz).format("%-m/%-d/%Y %I:%M %p").to_string(),
        None => String::new(),
    }
}
