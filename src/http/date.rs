//! Wire date module
//!
//! Formats and parses the `EEE MMM dd HH:mm:ss zzz yyyy` layout shared by the
//! `Date`, `Last-Modified` and `If-Modified-Since` headers,
//! e.g. `Tue Jan 02 15:04:05 EST 2024`.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc, Weekday};
use thiserror::Error;

const SECONDS_PER_HOUR: i32 = 3600;

/// Zone abbreviations accepted in dates, with their UTC offsets in hours
const ZONE_TABLE: &[(&str, i32)] = &[
    ("UT", 0),
    ("UTC", 0),
    ("GMT", 0),
    ("Z", 0),
    ("EST", -5),
    ("EDT", -4),
    ("CST", -6),
    ("CDT", -5),
    ("MST", -7),
    ("MDT", -6),
    ("PST", -8),
    ("PDT", -7),
    ("AKST", -9),
    ("AKDT", -8),
    ("HST", -10),
    ("CET", 1),
    ("CEST", 2),
];

/// Errors produced while parsing a wire date
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateParseError {
    #[error("expected 6 date fields, got {0}")]
    FieldCount(usize),

    #[error("unknown weekday '{0}'")]
    Weekday(String),

    #[error("unknown time zone '{0}'")]
    Zone(String),

    #[error("invalid date fields: {0}")]
    Fields(#[from] chrono::ParseError),

    #[error("date does not exist in zone")]
    NonExistent,
}

/// Named time zone with a fixed UTC offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    label: String,
    offset: FixedOffset,
}

impl Zone {
    /// Look up a zone by abbreviation (`EST`, `GMT`, ...) or numeric offset (`+0530`, `-0500`)
    pub fn from_label(label: &str) -> Option<Self> {
        let offset = lookup_abbreviation(label).or_else(|| parse_numeric_offset(label))?;
        Some(Self {
            label: label.to_ascii_uppercase(),
            offset,
        })
    }

    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Label written on the wire; `EDT` is always reported as `EST`
    pub fn wire_label(&self) -> &str {
        if self.label == "EDT" {
            "EST"
        } else {
            &self.label
        }
    }
}

fn lookup_abbreviation(label: &str) -> Option<FixedOffset> {
    ZONE_TABLE
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(label))
        .and_then(|(_, hours)| FixedOffset::east_opt(hours * SECONDS_PER_HOUR))
}

/// `+HHMM` / `-HHMM`
fn parse_numeric_offset(label: &str) -> Option<FixedOffset> {
    let (sign, digits) = match label.as_bytes().first().copied()? {
        b'+' => (1, &label[1..]),
        b'-' => (-1, &label[1..]),
        _ => return None,
    };
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * SECONDS_PER_HOUR + minutes * 60))
}

/// Format a timestamp in the wire layout, rendered in `zone`
pub fn format_wire_date(ts: DateTime<Utc>, zone: &Zone) -> String {
    let local = ts.with_timezone(&zone.offset());
    format!(
        "{} {} {}",
        local.format("%a %b %d %H:%M:%S"),
        zone.wire_label(),
        local.format("%Y")
    )
}

/// Parse `<weekday> <month> <day> <HH:MM:SS> <zone> <year>`
///
/// The weekday must be a valid name but is not checked against the date.
/// Month and weekday names are matched case-insensitively.
pub fn parse_wire_date(value: &str) -> Result<DateTime<Utc>, DateParseError> {
    let fields: Vec<&str> = value.split_whitespace().collect();
    let [weekday, month, day, time, zone, year] = fields.as_slice() else {
        return Err(DateParseError::FieldCount(fields.len()));
    };

    weekday
        .parse::<Weekday>()
        .map_err(|_| DateParseError::Weekday((*weekday).to_string()))?;
    let zone = Zone::from_label(zone).ok_or_else(|| DateParseError::Zone((*zone).to_string()))?;

    let naive = NaiveDateTime::parse_from_str(
        &format!("{month} {day} {time} {year}"),
        "%b %d %H:%M:%S %Y",
    )?;

    zone.offset()
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or(DateParseError::NonExistent)
}

/// True when `a` is strictly later than `b`, ignoring sub-second precision
pub fn is_after_by_seconds(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.timestamp() > b.timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_format_est() {
        let zone = Zone::from_label("EST").unwrap();
        let ts = utc(2024, 1, 2, 20, 4, 5);
        assert_eq!(format_wire_date(ts, &zone), "Tue Jan 02 15:04:05 EST 2024");
    }

    #[test]
    fn test_format_edt_reported_as_est() {
        let zone = Zone::from_label("EDT").unwrap();
        let ts = utc(2024, 6, 1, 16, 0, 0);
        assert_eq!(format_wire_date(ts, &zone), "Sat Jun 01 12:00:00 EST 2024");
    }

    #[test]
    fn test_parse_est() {
        let parsed = parse_wire_date("Mon Jan 01 00:00:00 EST 2024").unwrap();
        assert_eq!(parsed, utc(2024, 1, 1, 5, 0, 0));
    }

    #[test]
    fn test_parse_is_case_insensitive_and_lenient_on_weekday() {
        // 2024-01-01 was a Monday; a mismatched weekday is still accepted
        let parsed = parse_wire_date("fri jan 1 00:00:00 gmt 2024").unwrap();
        assert_eq!(parsed, utc(2024, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_parse_numeric_zone() {
        let parsed = parse_wire_date("Mon Jan 01 05:30:00 +0530 2024").unwrap();
        assert_eq!(parsed, utc(2024, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_wire_date("Mon Jan 01 2024"),
            Err(DateParseError::FieldCount(4))
        );
        assert_eq!(
            parse_wire_date("Xyz Jan 01 00:00:00 EST 2024"),
            Err(DateParseError::Weekday("Xyz".to_string()))
        );
        assert_eq!(
            parse_wire_date("Mon Jan 01 00:00:00 ABC 2024"),
            Err(DateParseError::Zone("ABC".to_string()))
        );
        assert!(matches!(
            parse_wire_date("Mon Foo 01 00:00:00 EST 2024"),
            Err(DateParseError::Fields(_))
        ));
        assert!(matches!(
            parse_wire_date("Mon Jan 01 25:00:00 EST 2024"),
            Err(DateParseError::Fields(_))
        ));
    }

    #[test]
    fn test_format_then_parse_keeps_second() {
        let zone = Zone::from_label("PST").unwrap();
        let ts = utc(2023, 12, 1, 8, 30, 15);
        assert_eq!(parse_wire_date(&format_wire_date(ts, &zone)).unwrap(), ts);
    }

    #[test]
    fn test_is_after_by_seconds() {
        let base = utc(2024, 1, 1, 0, 0, 0);
        let later_same_second = base + chrono::Duration::milliseconds(900);
        assert!(!is_after_by_seconds(later_same_second, base));
        assert!(is_after_by_seconds(base + chrono::Duration::seconds(1), base));
        assert!(!is_after_by_seconds(base, base));
    }

    #[test]
    fn test_zone_lookup() {
        assert!(Zone::from_label("est").is_some());
        assert!(Zone::from_label("-0800").is_some());
        assert!(Zone::from_label("+0575").is_none());
        assert!(Zone::from_label("Mars").is_none());
        assert_eq!(Zone::from_label("utc").unwrap().wire_label(), "UTC");
    }
}
