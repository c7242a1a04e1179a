use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

// ── Integer coercion ──────────────────────────────────────────────────────────

/// Parse a DEX counter or amount, returning `default` unless `raw` is a
/// non-empty run of ASCII digits that fits in a `u64`.
///
/// Signs, whitespace and decimal points are all rejected; callers trim first
/// when the field allows it.
///
/// # Examples
///
/// ```
/// use dex_core::data_processors::parse_int_or;
///
/// assert_eq!(parse_int_or("150", 0), 150);
/// assert_eq!(parse_int_or("1.50", 0), 0);
/// assert_eq!(parse_int_or("", 7), 7);
/// ```
pub fn parse_int_or(raw: &str, default: u64) -> u64 {
    parse_int(raw).unwrap_or(default)
}

/// Strict variant of [`parse_int_or`]: `None` when `raw` is not purely numeric.
pub fn parse_int(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Read field `index` of a record as an integer, 0 when missing or malformed.
pub fn field_int(fields: &[String], index: usize) -> u64 {
    fields.get(index).map(|f| parse_int_or(f, 0)).unwrap_or(0)
}

// ── DEX timestamps ────────────────────────────────────────────────────────────

/// Why a `PA5` date/time pair could not be turned into a timestamp.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DexDateError {
    #[error("date must be 6 characters (YYMMDD), got {0}")]
    DateLength(usize),

    #[error("time must be 4 characters (HHMM), got {0}")]
    TimeLength(usize),

    #[error("non-numeric component in {0:?}")]
    NonNumeric(String),

    #[error("date/time out of range: {date} {time}")]
    OutOfRange { date: String, time: String },
}

/// Parse a DEX `YYMMDD` date and `HHMM` time into a naive timestamp.
///
/// Two-digit years are taken as 20YY. No whitespace is tolerated.
///
/// # Examples
///
/// ```
/// use dex_core::data_processors::{parse_dex_timestamp, DexDateError};
///
/// let ts = parse_dex_timestamp("250101", "1430").unwrap();
/// assert_eq!(ts.to_string(), "2025-01-01 14:30:00");
///
/// assert_eq!(parse_dex_timestamp("25013", "1430"), Err(DexDateError::DateLength(5)));
/// ```
pub fn parse_dex_timestamp(date: &str, time: &str) -> Result<NaiveDateTime, DexDateError> {
    let date_len = date.chars().count();
    if date_len != 6 {
        return Err(DexDateError::DateLength(date_len));
    }
    let time_len = time.chars().count();
    if time_len != 4 {
        return Err(DexDateError::TimeLength(time_len));
    }

    // Both strings are pure ASCII digits past this point, so byte slicing is safe.
    for raw in [date, time] {
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DexDateError::NonNumeric(raw.to_string()));
        }
    }

    let digits = |s: &str| -> u32 { s.parse().unwrap_or_default() };
    let year = 2000 + digits(&date[0..2]) as i32;
    let month = digits(&date[2..4]);
    let day = digits(&date[4..6]);
    let hour = digits(&time[0..2]);
    let minute = digits(&time[2..4]);

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .ok_or_else(|| DexDateError::OutOfRange {
            date: date.to_string(),
            time: time.to_string(),
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── parse_int_or ──────────────────────────────────────────────────────────

    #[test]
    fn test_parse_int_plain_digits() {
        assert_eq!(parse_int_or("0", 9), 0);
        assert_eq!(parse_int_or("001500", 0), 1500);
    }

    #[test]
    fn test_parse_int_rejects_non_digits() {
        assert_eq!(parse_int_or("-5", 0), 0);
        assert_eq!(parse_int_or("+5", 0), 0);
        assert_eq!(parse_int_or(" 5", 0), 0);
        assert_eq!(parse_int_or("5 ", 0), 0);
        assert_eq!(parse_int_or("12a", 0), 0);
        assert_eq!(parse_int_or("", 0), 0);
    }

    #[test]
    fn test_parse_int_overflow_falls_back() {
        assert_eq!(parse_int_or("99999999999999999999999", 3), 3);
        assert_eq!(parse_int("18446744073709551615"), Some(u64::MAX));
    }

    #[test]
    fn test_field_int_missing_index() {
        let fields = vec!["10".to_string(), "x".to_string()];
        assert_eq!(field_int(&fields, 0), 10);
        assert_eq!(field_int(&fields, 1), 0);
        assert_eq!(field_int(&fields, 5), 0);
    }

    // ── parse_dex_timestamp ───────────────────────────────────────────────────

    #[test]
    fn test_parse_dex_timestamp_valid() {
        let ts = parse_dex_timestamp("250101", "1430").unwrap();
        assert_eq!(ts.format("%Y-%m-%d %H:%M").to_string(), "2025-01-01 14:30");
    }

    #[test]
    fn test_parse_dex_timestamp_midnight_and_leap_day() {
        let ts = parse_dex_timestamp("240229", "0000").unwrap();
        assert_eq!(ts.format("%Y-%m-%d %H:%M").to_string(), "2024-02-29 00:00");
    }

    #[test]
    fn test_parse_dex_timestamp_wrong_lengths() {
        assert_eq!(
            parse_dex_timestamp("25013", "1430"),
            Err(DexDateError::DateLength(5))
        );
        assert_eq!(
            parse_dex_timestamp("250101", "143"),
            Err(DexDateError::TimeLength(3))
        );
    }

    #[test]
    fn test_parse_dex_timestamp_non_numeric() {
        assert_eq!(
            parse_dex_timestamp("25Ja01", "1430"),
            Err(DexDateError::NonNumeric("25Ja01".to_string()))
        );
        assert!(matches!(
            parse_dex_timestamp("250101", "14:3"),
            Err(DexDateError::NonNumeric(_))
        ));
    }

    #[test]
    fn test_parse_dex_timestamp_out_of_range() {
        assert!(matches!(
            parse_dex_timestamp("251301", "1200"),
            Err(DexDateError::OutOfRange { .. })
        ));
        assert!(matches!(
            parse_dex_timestamp("250230", "1200"),
            Err(DexDateError::OutOfRange { .. })
        ));
        assert!(matches!(
            parse_dex_timestamp("250101", "2460"),
            Err(DexDateError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_parse_dex_timestamp_multibyte_length() {
        // Six characters but not six bytes.
        assert!(matches!(
            parse_dex_timestamp("25010é", "1200"),
            Err(DexDateError::NonNumeric(_))
        ));
    }
}
