use crate::error::{ValueError, ValueResult};
use crate::types::Type;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Timelike, Utc};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

/// Zone-naive date-time stored as milliseconds since the UTC epoch.
///
/// The calendar view ([`EpochDateTime::to_naive`]) is derived on first use and memoized.
/// Comparison and hashing use the epoch only.
#[derive(Clone)]
pub struct EpochDateTime {
    epoch_millis: i64,
    local: OnceLock<NaiveDateTime>,
}

impl EpochDateTime {
    pub fn from_epoch_millis(epoch_millis: i64) -> Self {
        Self {
            epoch_millis,
            local: OnceLock::new(),
        }
    }

    /// Interpret a calendar date-time as UTC.
    pub fn from_naive(value: NaiveDateTime) -> Self {
        Self {
            epoch_millis: value.and_utc().timestamp_millis(),
            local: OnceLock::new(),
        }
    }

    /// Parse `YYYY-MM-DD[(T| )HH:MM[:SS[.fff]]][Z|±HH:MM]`. A missing time is midnight and a
    /// missing offset is UTC.
    pub fn parse(text: &str) -> ValueResult<Self> {
        let (epoch_millis, _) =
            parse_epoch_millis(text).ok_or_else(|| ValueError::cast(text, Type::DateTime))?;
        Ok(Self::from_epoch_millis(epoch_millis))
    }

    pub fn epoch_millis(&self) -> i64 {
        self.epoch_millis
    }

    pub fn to_naive(&self) -> &NaiveDateTime {
        self.local
            .get_or_init(|| naive_utc_from_millis(self.epoch_millis))
    }

    /// Attach UTC, keeping the epoch.
    pub fn with_utc_offset(&self) -> EpochDateTimeOffset {
        EpochDateTimeOffset::utc(self.epoch_millis)
    }
}

impl PartialEq for EpochDateTime {
    fn eq(&self, other: &Self) -> bool {
        self.epoch_millis == other.epoch_millis
    }
}

impl Eq for EpochDateTime {}

impl PartialOrd for EpochDateTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EpochDateTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch_millis.cmp(&other.epoch_millis)
    }
}

impl Hash for EpochDateTime {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.epoch_millis.hash(state);
    }
}

impl fmt::Debug for EpochDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EpochDateTime({self})")
    }
}

impl fmt::Display for EpochDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_local(f, self.to_naive())
    }
}

/// Zone-aware date-time: a UTC epoch plus a fixed offset used only for display and
/// calendar decomposition. Equality, ordering and hashing use the epoch only.
#[derive(Clone, Copy)]
pub struct EpochDateTimeOffset {
    epoch_millis: i64,
    offset: FixedOffset,
}

impl EpochDateTimeOffset {
    pub fn from_epoch_millis(epoch_millis: i64, offset: FixedOffset) -> Self {
        Self {
            epoch_millis,
            offset,
        }
    }

    pub fn utc(epoch_millis: i64) -> Self {
        Self::from_epoch_millis(epoch_millis, utc_offset())
    }

    /// Same grammar as [`EpochDateTime::parse`]; the parsed offset (or UTC) is retained.
    pub fn parse(text: &str) -> ValueResult<Self> {
        let (epoch_millis, offset) = parse_epoch_millis(text)
            .ok_or_else(|| ValueError::cast(text, Type::DateTimeOffset))?;
        Ok(Self::from_epoch_millis(
            epoch_millis,
            offset.unwrap_or_else(utc_offset),
        ))
    }

    pub fn epoch_millis(&self) -> i64 {
        self.epoch_millis
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Calendar view in the attached offset.
    pub fn to_local(&self) -> NaiveDateTime {
        let utc = naive_utc_from_millis(self.epoch_millis);
        utc + chrono::Duration::seconds(i64::from(self.offset.local_minus_utc()))
    }

    /// Drop the zone, keeping the epoch.
    pub fn to_date_time(&self) -> EpochDateTime {
        EpochDateTime::from_epoch_millis(self.epoch_millis)
    }
}

impl PartialEq for EpochDateTimeOffset {
    fn eq(&self, other: &Self) -> bool {
        self.epoch_millis == other.epoch_millis
    }
}

impl Eq for EpochDateTimeOffset {}

impl PartialOrd for EpochDateTimeOffset {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EpochDateTimeOffset {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch_millis.cmp(&other.epoch_millis)
    }
}

impl Hash for EpochDateTimeOffset {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.epoch_millis.hash(state);
    }
}

impl fmt::Debug for EpochDateTimeOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EpochDateTimeOffset({self})")
    }
}

impl fmt::Display for EpochDateTimeOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_local(f, &self.to_local())?;
        if self.offset.local_minus_utc() == 0 {
            f.write_str("Z")
        } else {
            write!(f, "{}", self.offset)
        }
    }
}

fn utc_offset() -> FixedOffset {
    Utc.fix()
}

fn naive_utc_from_millis(epoch_millis: i64) -> NaiveDateTime {
    DateTime::from_timestamp_millis(epoch_millis)
        .map(|dt| dt.naive_utc())
        .unwrap_or_default()
}

/// ISO local date-time: seconds and milliseconds are only written when non-zero.
fn write_local(f: &mut fmt::Formatter<'_>, value: &NaiveDateTime) -> fmt::Result {
    write!(f, "{}", value.format("%Y-%m-%dT%H:%M"))?;
    let second = value.second();
    let millis = value.nanosecond() / 1_000_000;
    if second != 0 || millis != 0 {
        write!(f, ":{second:02}")?;
    }
    if millis != 0 {
        write!(f, ".{millis:03}")?;
    }
    Ok(())
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

fn parse_epoch_millis(text: &str) -> Option<(i64, Option<FixedOffset>)> {
    let (body, offset) = split_offset(text.trim())?;
    let naive = parse_naive(body)?;
    let epoch_millis = match offset {
        Some(offset) => offset
            .from_local_datetime(&naive)
            .single()?
            .timestamp_millis(),
        None => naive.and_utc().timestamp_millis(),
    };
    Some((epoch_millis, offset))
}

fn parse_naive(body: &str) -> Option<NaiveDateTime> {
    for format in NAIVE_FORMATS {
        if let Ok(value) = NaiveDateTime::parse_from_str(body, format) {
            return Some(value);
        }
    }
    NaiveDate::parse_from_str(body, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)
}

/// Split a trailing `Z` or `±HH[:MM]` suffix. Offsets are only recognized after the time
/// separator so the dashes of the date part are never mistaken for a sign.
fn split_offset(text: &str) -> Option<(&str, Option<FixedOffset>)> {
    if let Some(body) = text.strip_suffix(|c: char| c == 'Z' || c == 'z') {
        return Some((body, Some(utc_offset())));
    }
    let Some(time_start) = text.find(|c: char| c == 'T' || c == ' ') else {
        return Some((text, None));
    };
    let Some(rel) = text[time_start..].rfind(|c: char| c == '+' || c == '-') else {
        return Some((text, None));
    };
    let sign_at = time_start + rel;
    let offset = parse_offset(&text[sign_at..])?;
    Some((&text[..sign_at], Some(offset)))
}

fn parse_offset(text: &str) -> Option<FixedOffset> {
    let (sign, rest) = match text.as_bytes().first()? {
        b'+' => (1, &text[1..]),
        b'-' => (-1, &text[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (
            digits[..2].parse::<i32>().ok()?,
            digits[2..].parse::<i32>().ok()?,
        ),
        _ => return None,
    };
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_renders_canonical_iso() {
        let dt = EpochDateTime::from_epoch_millis(1_680_193_853_072);
        assert_eq!(dt.to_string(), "2023-03-30T16:30:53.072");
    }

    #[test]
    fn zero_seconds_are_omitted() {
        let dt = EpochDateTime::parse("2023-03-30T16:30").unwrap();
        assert_eq!(dt.to_string(), "2023-03-30T16:30");
        let dt = EpochDateTime::parse("2023-03-30T16:30:05").unwrap();
        assert_eq!(dt.to_string(), "2023-03-30T16:30:05");
    }

    #[test]
    fn date_only_is_midnight_utc() {
        let dt = EpochDateTime::parse("2023-03-30").unwrap();
        assert_eq!(dt.to_string(), "2023-03-30T00:00");
        assert_eq!(dt.epoch_millis() % 86_400_000, 0);
    }

    #[test]
    fn offsets_shift_the_epoch() {
        let utc = EpochDateTime::parse("2023-03-30T16:30:53.072Z").unwrap();
        let plus_two = EpochDateTime::parse("2023-03-30T18:30:53.072+02:00").unwrap();
        assert_eq!(utc, plus_two);
        assert_eq!(utc.epoch_millis(), 1_680_193_853_072);

        let offset = EpochDateTimeOffset::parse("2023-03-30T18:30:53.072+02:00").unwrap();
        assert_eq!(offset.epoch_millis(), 1_680_193_853_072);
        assert_eq!(offset.to_string(), "2023-03-30T18:30:53.072+02:00");
    }

    #[test]
    fn garbage_is_a_cast_error() {
        let err = EpochDateTime::parse("not a date").unwrap_err();
        assert!(err.to_string().contains("not a date"));
        assert!(EpochDateTime::parse("2023-03-30T10:00+2x").is_err());
    }
}
