//! Lenient parsing of the date strings found in the raw logs.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

/// Parses a raw log date, keeping the offset it was written with.
///
/// Values without an offset are taken as UTC. Calendar fields (day key, date
/// search) come from the date as written; only the timestamp is absolute.
pub fn parse_event_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }
    let trimmed = raw.trim_end_matches('Z');
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc().fixed_offset());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc().fixed_offset());
        }
    }
    None
}

/// Timestamp and day key for a raw date, with `(0, "")` for unparsable input.
pub fn timestamp_and_day_key(raw: &str) -> (i64, String) {
    parse_event_date(raw).map_or_else(
        || (0, String::new()),
        |dt| (dt.timestamp_millis(), dt.format("%Y-%m-%d").to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_formats() {
        let cases = [
            "2025-12-18T09:30:00Z",
            "2025-12-18T18:30:00+09:00",
            "2025-12-18 09:30:00",
            "2025-12-18T09:30",
            "2025/12/18 09:30",
        ];
        for raw in cases {
            let dt = parse_event_date(raw).unwrap_or_else(|| panic!("failed to parse {raw}"));
            assert_eq!(dt.timestamp_millis(), 1_766_050_200_000, "{raw}");
        }
    }

    #[test]
    fn offset_dates_keep_their_written_day() {
        let (ts, key) = timestamp_and_day_key("2025-12-18T08:00:00+09:00");
        assert_eq!(key, "2025-12-18");
        assert_eq!(ts, 1_766_012_400_000);
    }

    #[test]
    fn parses_bare_dates_as_midnight_utc() {
        for raw in ["2025-12-18", "2025/12/18", "20251218", " 2025-12-18 "] {
            let (ts, key) = timestamp_and_day_key(raw);
            assert_eq!(key, "2025-12-18", "{raw}");
            assert_eq!(ts, 1_766_016_000_000, "{raw}");
        }
    }

    #[test]
    fn invalid_dates_yield_sentinels() {
        for raw in ["", "   ", "yesterday", "2025-13-40"] {
            assert_eq!(timestamp_and_day_key(raw), (0, String::new()), "{raw}");
        }
    }
}
