//! Scalar formatting helpers
//!
//! Human-scaled byte sizes and the fixed timestamp layout used by every table.

use chrono::{DateTime, Local, Utc};

/// Timestamp layout for tables and messages
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const UNITS: [(u64, &str); 6] = [
    (1 << 60, "E"),
    (1 << 50, "P"),
    (1 << 40, "T"),
    (1 << 30, "G"),
    (1 << 20, "M"),
    (1 << 10, "K"),
];

/// Format a byte count as `512B`, `1K`, `1.5K`, `1.2M`, ...
///
/// Binary scaled, one decimal place, a trailing `.0` is dropped.
pub fn format_size(bytes: u64) -> String {
    for (unit, suffix) in UNITS {
        if bytes >= unit {
            let value = format!("{:.1}", bytes as f64 / unit as f64);
            let value = value.strip_suffix(".0").unwrap_or(&value);
            return format!("{}{}", value, suffix);
        }
    }
    format!("{}B", bytes)
}

/// Format a timestamp in the local time zone
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format(TIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_size_bytes() {
        assert_eq!(format_size(0), "0B");
        assert_eq!(format_size(512), "512B");
        assert_eq!(format_size(1023), "1023B");
    }

    #[test]
    fn test_format_size_scaled() {
        assert_eq!(format_size(1024), "1K");
        assert_eq!(format_size(1536), "1.5K");
        assert_eq!(format_size(1024 * 1024 * 6 / 5), "1.2M");
        assert_eq!(format_size(3 * (1 << 30)), "3G");
        assert_eq!(format_size(1 << 40), "1T");
    }

    #[test]
    fn test_format_timestamp_layout() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        let formatted = format_timestamp(&ts);

        assert_eq!(formatted.len(), 19);
        assert_eq!(
            formatted,
            ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
        );
    }
}
