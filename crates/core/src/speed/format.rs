//! Human-readable byte and duration rendering for progress display.

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Formats a byte count with binary (1024-based) prefixes.
///
/// Picks the largest unit not exceeding the value and renders with up to two
/// decimals, trailing zeros trimmed: `1536` becomes `"1.5 KB"`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let exponent = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exponent as i32);
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[exponent])
}

/// Formats a duration in seconds for display.
///
/// Under a minute renders as whole seconds (`"42s"`), otherwise as whole
/// minutes plus the remainder (`"2m 5s"`).
pub fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else {
        format!("{}m {}s", seconds / 60, seconds % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes_zero() {
        assert_eq!(format_bytes(0), "0 Bytes");
    }

    #[test]
    fn test_format_bytes_sub_kilobyte() {
        assert_eq!(format_bytes(512), "512 Bytes");
    }

    #[test]
    fn test_format_bytes_trims_trailing_zeros() {
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1024), "1 KB");
    }

    #[test]
    fn test_format_bytes_two_decimals() {
        // 1,234,567 / 1024^2 = 1.17737... -> 1.18 MB
        assert_eq!(format_bytes(1_234_567), "1.18 MB");
    }

    #[test]
    fn test_format_bytes_large_units() {
        assert_eq!(format_bytes(500 * 1024 * 1024), "500 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn test_format_duration_seconds_only() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(42), "42s");
        assert_eq!(format_duration(59), "59s");
    }

    #[test]
    fn test_format_duration_minutes_and_seconds() {
        assert_eq!(format_duration(60), "1m 0s");
        assert_eq!(format_duration(125), "2m 5s");
        assert_eq!(format_duration(3661), "61m 1s");
    }
}
