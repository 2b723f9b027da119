//! # Timestamp parsing and civil offsets
//!
//! Every timestamp consumed by the crate ends up as a [`DateTime<FixedOffset>`]:
//!
//! * location history timestamps are ISO-8601 strings with an explicit offset, with or without
//!   fractional seconds (`2018-04-16T03:22:42.995Z`, `2018-04-16T05:19:38Z`);
//! * photograph shooting times are EXIF `DateTimeOriginal` strings (`2018:04:16 12:22:42`)
//!   carrying no offset at all, they are interpreted at the configured civil offset;
//! * the civil offset itself is configured as `±HH:MM`.
//!
//! Comparisons between the two families are absolute instants, the offset only controls how the
//! naive EXIF wall-clock time is anchored.
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{constants::DEFAULT_UTC_OFFSET_SEC, geotag_errors::GeotagError};

const FRACTIONAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";
const WHOLE_SECOND_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

static DATE_TIME_ORIGINAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{4}):([0-9]{2}):([0-9]{2}) ([0-9]{2}):([0-9]{2}):([0-9]{2})")
        .expect("valid DateTimeOriginal pattern")
});

static UTC_OFFSET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([+-])([0-9]{2}):?([0-9]{2})$").expect("valid offset pattern"));

/// The default civil offset of a run (+09:00)
pub fn default_utc_offset() -> FixedOffset {
    FixedOffset::east_opt(DEFAULT_UTC_OFFSET_SEC).unwrap_or_else(|| Utc.fix())
}

/// Parse an ISO-8601 timestamp carrying an explicit offset
///
/// The fractional-seconds form is tried first, then the whole-second form. A trailing `Z` is
/// read as `+00:00`.
///
/// Arguments
/// ---------
/// * `raw`: a timestamp such as `2018-04-16T03:22:42.995Z` or `2018-04-16T12:22:42+09:00`
///
/// Return
/// ------
/// * the parsed timestamp, keeping the offset found in `raw`
/// * [`GeotagError::TimestampFormat`] if neither form matches
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, GeotagError> {
    let normalized = match raw.trim().strip_suffix('Z') {
        Some(stripped) => format!("{stripped}+00:00"),
        None => raw.trim().to_string(),
    };

    DateTime::parse_from_str(&normalized, FRACTIONAL_FORMAT)
        .or_else(|_| DateTime::parse_from_str(&normalized, WHOLE_SECOND_FORMAT))
        .map_err(|e| GeotagError::TimestampFormat(format!("'{raw}' ({e})")))
}

/// Parse an EXIF `DateTimeOriginal` value (`YYYY:MM:DD hh:mm:ss`) at a civil offset
///
/// Trailing characters after the seconds (NUL padding, sub-second garbage) are ignored.
///
/// Arguments
/// ---------
/// * `raw`: the tag value decoded as text
/// * `offset`: the civil offset the camera clock was set to
///
/// Return
/// ------
/// * the shooting time anchored at `offset`
/// * [`GeotagError::TimestampFormat`] if the value does not follow the pattern or names an
///   impossible date (`0000:00:00 00:00:00` for instance)
pub fn parse_date_time_original(
    raw: &str,
    offset: FixedOffset,
) -> Result<DateTime<FixedOffset>, GeotagError> {
    let invalid = || {
        GeotagError::TimestampFormat(format!("unable to interpret DateTimeOriginal ({raw})"))
    };

    let caps = DATE_TIME_ORIGINAL.captures(raw).ok_or_else(invalid)?;
    let field = |i: usize| caps[i].parse::<u32>().map_err(|_| invalid());

    let year = caps[1].parse::<i32>().map_err(|_| invalid())?;
    let naive = NaiveDate::from_ymd_opt(year, field(2)?, field(3)?)
        .and_then(|date| date.and_hms_opt(field(4).ok()?, field(5).ok()?, field(6).ok()?))
        .ok_or_else(invalid)?;

    offset.from_local_datetime(&naive).single().ok_or_else(invalid)
}

/// Parse a civil offset written `±HH:MM` (or `±HHMM`)
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset, GeotagError> {
    let invalid = || GeotagError::InvalidUtcOffset(raw.to_string());

    let caps = UTC_OFFSET.captures(raw.trim()).ok_or_else(invalid)?;
    let hours: i32 = caps[2].parse().map_err(|_| invalid())?;
    let minutes: i32 = caps[3].parse().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }

    let seconds = (hours * 3600 + minutes * 60) * if &caps[1] == "-" { -1 } else { 1 };
    FixedOffset::east_opt(seconds).ok_or_else(invalid)
}
