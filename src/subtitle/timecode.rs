// Timestamp conversions for SRT (`HH:MM:SS,mmm`) and ASS (`HH:MM:SS.cc`)
use crate::error::{Result, ShortsError};
use regex::Regex;
use std::sync::LazyLock;

static SRT_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2}):(\d{2}):(\d{2}),(\d{3})$").expect("Invalid regex")
});

/// Parse an SRT timestamp into seconds.
pub fn parse_timestamp(text: &str) -> Result<f64> {
    let caps = SRT_TIMESTAMP
        .captures(text.trim())
        .ok_or_else(|| ShortsError::MalformedTimestamp(text.to_string()))?;

    let field = |i: usize| -> f64 { caps[i].parse::<u32>().map(f64::from).unwrap_or(0.0) };

    Ok(field(1) * 3600.0 + field(2) * 60.0 + field(3) + field(4) / 1000.0)
}

/// Format seconds as `HH:MM:SS,mmm`. Negative input is clamped to zero.
pub fn format_timestamp(seconds: f64) -> String {
    let total_ms = (clamp_non_negative(seconds) * 1000.0).round() as u64;
    let (hours, minutes, secs) = split_clock(total_ms / 1000);
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, total_ms % 1000)
}

/// Format seconds as `HH:MM:SS.cc` for ASS events.
pub fn format_ass_timestamp(seconds: f64) -> String {
    let total_cs = (clamp_non_negative(seconds) * 100.0).round() as u64;
    let (hours, minutes, secs) = split_clock(total_cs / 100);
    format!("{:02}:{:02}:{:02}.{:02}", hours, minutes, secs, total_cs % 100)
}

fn split_clock(total_secs: u64) -> (u64, u64, u64) {
    (total_secs / 3600, (total_secs % 3600) / 60, total_secs % 60)
}

fn clamp_non_negative(seconds: f64) -> f64 {
    if seconds.is_nan() {
        0.0
    } else {
        seconds.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("00:01:02,500").unwrap(), 62.5);
        assert_eq!(parse_timestamp("01:01:01,123").unwrap(), 3661.123);
        assert_eq!(parse_timestamp("  00:00:03,000 ").unwrap(), 3.0);
    }

    #[test]
    fn test_parse_timestamp_malformed() {
        for bad in ["", "0:01:02,500", "00:01:02.500", "00:01:02", "aa:bb:cc,ddd", "00:01:02,5000"] {
            assert!(
                matches!(parse_timestamp(bad), Err(ShortsError::MalformedTimestamp(_))),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(1.5), "00:00:01,500");
        assert_eq!(format_timestamp(3661.123), "01:01:01,123");
        assert_eq!(format_timestamp(62.5), "00:01:02,500");
        // Rounding carries into the seconds field.
        assert_eq!(format_timestamp(59.9996), "00:01:00,000");
    }

    #[test]
    fn test_format_timestamp_clamps_negative() {
        assert_eq!(format_timestamp(-4.2), "00:00:00,000");
        assert_eq!(format_timestamp(f64::NAN), "00:00:00,000");
    }

    #[test]
    fn test_timestamp_round_trip_ms_precision() {
        for ms in [0u64, 1, 999, 1_000, 59_999, 62_500, 3_599_999, 3_600_000, 36_061_042] {
            let secs = ms as f64 / 1000.0;
            let parsed = parse_timestamp(&format_timestamp(secs)).unwrap();
            assert!((parsed - secs).abs() < 0.0005, "{secs} -> {parsed}");
        }
    }

    #[test]
    fn test_format_ass_timestamp() {
        assert_eq!(format_ass_timestamp(0.0), "00:00:00.00");
        assert_eq!(format_ass_timestamp(1.5), "00:00:01.50");
        assert_eq!(format_ass_timestamp(3723.25), "01:02:03.25");
        assert_eq!(format_ass_timestamp(-1.0), "00:00:00.00");
    }
}
