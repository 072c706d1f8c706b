// src/core/parse.rs
// Loose UI strings → typed values. Every function here degrades to `None`;
// one malformed field must never sink the record it belongs to.
use chrono::{NaiveDate, NaiveDateTime};

use super::sanitize::{digit_runs, digits_only};

/// Date formats rendered in the activity header, tried in order.
const DATETIME_FORMAT: &str = "%I:%M %p on %A, %B %d, %Y";
const DATE_FORMAT: &str = "%A, %B %d, %Y";

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `H:MM:SS` or `M:SS` → seconds. Components are cleaned of non-digits
/// first, so "1:02:03s" still parses.
///
/// "1:23:45" → 5025, "40:41" → 2441, "bogus" → None
pub fn parse_duration(text: &str) -> Option<i64> {
    let parts: Vec<i64> = text
        .trim()
        .split(':')
        .map(|part| digits_only(part).parse::<i64>().ok())
        .collect::<Option<_>>()?;

    match parts.as_slice() {
        [h, m, s] => h.checked_mul(3600)?.checked_add(m.checked_mul(60)?)?.checked_add(*s),
        [m, s] => m.checked_mul(60)?.checked_add(*s),
        _ => None,
    }
}

/// First two digit runs as minutes and seconds. Units and markup around
/// them are ignored: "9:42 /km" → 582.
pub fn parse_pace(text: &str) -> Option<i64> {
    let runs = digit_runs(text);
    let (min, sec) = match runs.as_slice() {
        [m, s, ..] => (m.parse::<i64>().ok()?, s.parse::<i64>().ok()?),
        _ => return None,
    };
    min.checked_mul(60)?.checked_add(sec)
}

/// Header date, either "7:00 AM on Wednesday, May 1, 2024" or the date-only
/// "Wednesday, May 1, 2024" (midnight).
pub fn parse_display_date(text: &str) -> Option<NaiveDateTime> {
    let raw = text.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT) {
        return Some(dt);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub fn format_timestamp(dt: &NaiveDateTime) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        assert_eq!(parse_duration("1:23:45"), Some(5025));
        assert_eq!(parse_duration("40:41"), Some(2441));
        assert_eq!(parse_duration(" 0:07 "), Some(7));
        assert_eq!(parse_duration("1:02:03s"), Some(3723));
    }

    #[test]
    fn malformed_durations_are_none() {
        assert_eq!(parse_duration("bogus"), None);
        assert_eq!(parse_duration("45"), None);
        assert_eq!(parse_duration("1:2:3:4"), None);
        assert_eq!(parse_duration("1::30"), None);
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("99999999999999999999:00"), None);
    }

    #[test]
    fn paces() {
        assert_eq!(parse_pace("9:42 /km"), Some(582));
        assert_eq!(parse_pace("<strong>6:00</strong><abbr>/km</abbr>"), Some(360));
        assert_eq!(parse_pace("no numbers"), None);
        assert_eq!(parse_pace("3"), None);
    }

    #[test]
    fn display_dates_both_formats() {
        let dt = parse_display_date("7:05 AM on Wednesday, May 1, 2024").unwrap();
        assert_eq!(format_timestamp(&dt), "2024-05-01 07:05:00");

        let dt = parse_display_date("  11:30 PM on Sunday, March 3, 2024 ").unwrap();
        assert_eq!(format_timestamp(&dt), "2024-03-03 23:30:00");

        let d = parse_display_date("Wednesday, May 1, 2024").unwrap();
        assert_eq!(format_timestamp(&d), "2024-05-01 00:00:00");
    }

    #[test]
    fn unknown_date_text_is_none() {
        assert_eq!(parse_display_date("Yesterday"), None);
        assert_eq!(parse_display_date("2024-05-01"), None);
    }
}
