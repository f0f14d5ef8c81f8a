//! Centralized display formatting utilities.
//!
//! Everything the report and the CLI print as text goes through this module,
//! so race times, speeds and shooting tallies look the same everywhere.

const MILLIS_PER_SECOND: i64 = 1_000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;

/// Format a millisecond count as `HH:MM:SS.mmm`.
///
/// Hours are unbounded (a 100 hour duration prints `100:00:00.000`),
/// minutes and seconds wrap at 60 and milliseconds at 1000.
/// Negative values are rendered as `-` followed by the magnitude.
///
/// # Examples
/// ```
/// use biathlon_types::formatting::format_race_time;
/// assert_eq!(format_race_time(0), "00:00:00.000");
/// assert_eq!(format_race_time(588_000), "00:09:48.000");
/// assert_eq!(format_race_time(3_723_004), "01:02:03.004");
/// assert_eq!(format_race_time(-1_500), "-00:00:01.500");
/// ```
pub fn format_race_time(millis: i64) -> String {
    let sign = if millis < 0 { "-" } else { "" };
    let abs = millis.unsigned_abs() as i64;

    let hours = abs / MILLIS_PER_HOUR;
    let minutes = (abs / MILLIS_PER_MINUTE) % 60;
    let seconds = (abs / MILLIS_PER_SECOND) % 60;
    let ms = abs % MILLIS_PER_SECOND;

    format!("{sign}{hours:02}:{minutes:02}:{seconds:02}.{ms:03}")
}

/// Format a speed with three decimal places.
///
/// # Examples
/// ```
/// use biathlon_types::formatting::format_speed;
/// assert_eq!(format_speed(1000.0 / 588.0), "1.701");
/// assert_eq!(format_speed(0.0), "0.000");
/// ```
pub fn format_speed(speed: f64) -> String {
    format!("{:.3}", speed)
}

/// Format a shooting tally as `hits/shots`.
///
/// # Examples
/// ```
/// use biathlon_types::formatting::format_accuracy;
/// assert_eq!(format_accuracy(4, 5), "4/5");
/// assert_eq!(format_accuracy(0, 0), "0/0");
/// ```
pub fn format_accuracy(hits: usize, shots: u32) -> String {
    format!("{}/{}", hits, shots)
}
