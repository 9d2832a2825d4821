//! Human-readable sizes, ratios and timestamps.

use chrono::DateTime;
use chrono::Local;
use std::time::SystemTime;

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;

/// Formats a byte count with binary units and one decimal.
///
/// # Examples
///
/// ```
/// use aocomp_core::format::format_size;
///
/// assert_eq!(format_size(512), "512 B");
/// assert_eq!(format_size(1536), "1.5 KB");
/// assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
/// ```
#[must_use]
pub fn format_size(bytes: u64) -> String {
    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else if bytes < GB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    }
}

/// Space saved by compression, `(1 - compressed / original) * 100`.
///
/// Returns 0.0 when `original` is zero. Negative when the output grew.
#[must_use]
pub fn reduction_percentage(original: u64, compressed: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (1.0 - compressed as f64 / original as f64) * 100.0
}

/// Formats a percentage with one decimal and a `%` sign.
#[must_use]
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Formats a timestamp in local time as `YYYY-MM-DD HH:MM:SS`.
#[must_use]
pub fn format_timestamp(time: SystemTime) -> String {
    let local: DateTime<Local> = time.into();
    local.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_size_units() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(MB - 1), "1024.0 KB");
        assert_eq!(format_size(MB), "1.0 MB");
        assert_eq!(format_size(3 * GB / 2), "1.5 GB");
    }

    #[test]
    fn test_reduction() {
        assert!((reduction_percentage(1000, 250) - 75.0).abs() < 1e-9);
        assert!(reduction_percentage(0, 10).abs() < f64::EPSILON);
        assert!(reduction_percentage(100, 150) < 0.0);
        assert_eq!(format_percent(reduction_percentage(3, 1)), "66.7%");
    }

    #[test]
    fn test_format_timestamp_shape() {
        let ts = format_timestamp(SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000));
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], " ");
        assert_eq!(&ts[13..14], ":");
    }
}
