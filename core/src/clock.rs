//! Clock-of-day parsing and duration arithmetic.
//!
//! Race timestamps are wall-clock times with millisecond precision
//! (`HH:MM:SS.mmm`). Durations between them are signed: an out-of-order
//! input produces a negative duration and it is passed through unchanged.

use biathlon_types::formatting::format_race_time;
use chrono::{NaiveTime, TimeDelta};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockError {
    #[error("invalid clock time '{0}', expected HH:MM:SS.mmm")]
    InvalidClockTime(String),
    #[error("invalid duration '{0}', expected HH:MM:SS or HH:MM:SS.mmm")]
    InvalidDuration(String),
}

#[inline]
fn digit(b: u8) -> Option<u32> {
    b.is_ascii_digit().then(|| (b - b'0') as u32)
}

#[inline]
fn two_digits(b: &[u8]) -> Option<u32> {
    Some(digit(b[0])? * 10 + digit(b[1])?)
}

/// Parse a clock time in the fixed `HH:MM:SS.mmm` layout.
pub fn parse_clock_time(input: &str) -> Result<NaiveTime, ClockError> {
    let err = || ClockError::InvalidClockTime(input.to_string());
    let b = input.as_bytes();
    if b.len() != 12 || b[2] != b':' || b[5] != b':' || b[8] != b'.' {
        return Err(err());
    }

    let hour = two_digits(&b[0..2]).ok_or_else(err)?;
    let minute = two_digits(&b[3..5]).ok_or_else(err)?;
    let second = two_digits(&b[6..8]).ok_or_else(err)?;
    let millis = match (digit(b[9]), digit(b[10]), digit(b[11])) {
        (Some(h), Some(t), Some(u)) => h * 100 + t * 10 + u,
        _ => return Err(err()),
    };

    NaiveTime::from_hms_milli_opt(hour, minute, second, millis).ok_or_else(err)
}

/// Parse a duration written as `HH:MM:SS` with an optional `.mmm` suffix.
///
/// Hours may have any number of digits as long as the total fits a
/// `TimeDelta`; minutes and seconds must be below 60.
pub fn parse_duration(input: &str) -> Result<TimeDelta, ClockError> {
    let err = || ClockError::InvalidDuration(input.to_string());

    let (hms, millis) = match input.split_once('.') {
        Some((hms, frac)) if frac.len() == 3 && frac.bytes().all(|b| b.is_ascii_digit()) => {
            (hms, frac.parse::<i64>().map_err(|_| err())?)
        }
        Some(_) => return Err(err()),
        None => (input, 0),
    };

    let mut fields = hms.split(':');
    let (Some(h), Some(m), Some(s), None) = (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(err());
    };
    let numeric = |f: &str| -> Option<i64> {
        (!f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()))
            .then(|| f.parse().ok())
            .flatten()
    };
    let hours = numeric(h).ok_or_else(err)?;
    let minutes = numeric(m).filter(|m| *m < 60).ok_or_else(err)?;
    let seconds = numeric(s).filter(|s| *s < 60).ok_or_else(err)?;

    // Hours are unbounded in the text, so the sum may not fit a TimeDelta
    TimeDelta::try_hours(hours)
        .and_then(|d| d.checked_add(&TimeDelta::try_minutes(minutes)?))
        .and_then(|d| d.checked_add(&TimeDelta::try_seconds(seconds)?))
        .and_then(|d| d.checked_add(&TimeDelta::try_milliseconds(millis)?))
        .ok_or_else(err)
}

/// `to - from`, signed and not clamped.
#[inline]
pub fn duration_between(from: NaiveTime, to: NaiveTime) -> TimeDelta {
    to.signed_duration_since(from)
}

/// Render a duration as `HH:MM:SS.mmm`.
pub fn format_duration(d: TimeDelta) -> String {
    format_race_time(d.num_milliseconds())
}

/// Duration in fractional seconds, millisecond precision.
#[inline]
pub fn seconds_f64(d: TimeDelta) -> f64 {
    d.num_milliseconds() as f64 / 1000.0
}

/// Clock time rendered back into the log layout.
pub fn format_clock_time(t: NaiveTime) -> String {
    t.format("%H:%M:%S%.3f").to_string()
}
