//! Finding dates and times in free text.
//!
//! Both extractors scan the whole text and take the first candidate whose
//! fields are in range, skipping the rest.

use crate::consts::{
    CURRENT_CENTURY, ISO_DATE_LEN, NANOS_DIGITS, NOON, PAST_CENTURY, PIVOT_MODULUS, TRIMMED_CHARS,
};
use crate::env::{DateFormat, Environment};
use crate::types::{Date, TimeOfDay};
use crate::{Error, ParseError};
use chrono::Datelike;
use regex::{Captures, Regex};
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::{debug, trace};

fn patterns() -> &'static TextPatterns {
    static PATTERNS: OnceLock<TextPatterns> = OnceLock::new();
    PATTERNS.get_or_init(TextPatterns::new)
}

/// Word boundaries are ASCII only, so letters outside ASCII never glue onto
/// a number.
struct TextPatterns {
    // 31-12-2018, 12.31.18
    day_or_month_first: Regex,
    // 2018/12/31, 18_12_31
    year_first: Regex,
    // 10, 10pm, 1030, 10:30:45.123 AM
    time: Regex,
}

impl TextPatterns {
    #[allow(clippy::expect_used)]
    fn new() -> Self {
        Self {
            day_or_month_first: Regex::new(
                r"(?-u:\b)([0-9]{1,2})[-.\\/_ ]([0-9]{1,2})[-.\\/_ ]([0-9]{4}|[0-9]{2})(?-u:\b)",
            )
            .expect("day or month first date pattern"),
            year_first: Regex::new(
                r"(?-u:\b)([0-9]{4}|[0-9]{2})[-.\\/_ ]([0-9]{1,2})[-.\\/_ ]([0-9]{1,2})(?-u:\b)",
            )
            .expect("year first date pattern"),
            time: Regex::new(
                r"(?-u:\b)([0-9]{1,2})(?:(?::)?([0-9]{2})(?::([0-9]{2})(?:\.([0-9]+))?)?)?[^0-9A-Za-z_]*([aApP][mM])?(?-u:\b)",
            )
            .expect("time pattern"),
        }
    }
}

/// Capture group positions of each date field within a pattern.
struct FieldOrder {
    day: usize,
    month: usize,
    year: usize,
}

impl FieldOrder {
    const fn of(format: DateFormat) -> Self {
        match format {
            DateFormat::DayMonthYear => Self { day: 1, month: 2, year: 3 },
            DateFormat::MonthDayYear => Self { day: 2, month: 1, year: 3 },
            DateFormat::YearMonthDay => Self { day: 3, month: 2, year: 1 },
        }
    }
}

fn group<'t>(captures: &Captures<'t>, index: usize) -> Option<&'t str> {
    captures.get(index).map(|m| m.as_str())
}

/// Expands a two-digit year. Years past the current year's last three digits
/// are taken to be last century.
fn pivot_year(two_digit: u16, current_year: i32) -> u16 {
    if i32::from(two_digit) > current_year.rem_euclid(PIVOT_MODULUS) {
        PAST_CENTURY + two_digit
    } else {
        CURRENT_CENTURY + two_digit
    }
}

fn field<T: FromStr>(captures: &Captures<'_>, index: usize) -> Result<T, ParseError> {
    let text = group(captures, index).unwrap_or_default();
    text.parse()
        .map_err(|_| ParseError::InvalidFormat(text.to_owned()))
}

fn date_from_captures(
    captures: &Captures<'_>,
    order: &FieldOrder,
    current_year: i32,
) -> Result<Date, ParseError> {
    let day = field::<u8>(captures, order.day)?;
    let month = field::<u8>(captures, order.month)?;
    let mut year = field::<u16>(captures, order.year)?;
    if group(captures, order.year).is_some_and(|text| text.len() == 2) {
        year = pivot_year(year, current_year);
    }
    Date::new(year, month, day)
}

/// Finds a date in `text`, returning it with the text that follows it.
///
/// A strict ISO 8601 date at the start of the text always wins. Otherwise the
/// environment's date format decides the order of fields.
///
/// # Errors
/// Returns `Error::DateNotFound` if no candidate has a valid day and month.
pub fn extract_date<'t>(env: &Environment, text: &'t str) -> Result<(Date, &'t str), Error> {
    let text = text.trim_matches(TRIMMED_CHARS);

    if let Some(date) = text
        .get(..ISO_DATE_LEN)
        .and_then(|prefix| prefix.parse::<Date>().ok())
    {
        debug!(%date, "found ISO 8601 date");
        return Ok((date, &text[ISO_DATE_LEN..]));
    }

    let current_year = env.now().year();
    let format = env.date_format();
    let order = FieldOrder::of(format);
    let pattern = match format {
        DateFormat::DayMonthYear | DateFormat::MonthDayYear => &patterns().day_or_month_first,
        DateFormat::YearMonthDay => &patterns().year_first,
    };

    for captures in pattern.captures_iter(text) {
        match date_from_captures(&captures, &order, current_year) {
            Ok(date) => {
                let end = captures.get(0).map_or(text.len(), |m| m.end());
                return Ok((date, &text[end..]));
            }
            Err(err) => trace!(candidate = &captures[0], %err, "skipping date candidate"),
        }
    }

    Err(Error::DateNotFound(text.to_owned()))
}

/// Scales a fractional second to nanoseconds, dropping digits past the ninth.
fn fraction_to_nanos(digits: &str) -> Option<u32> {
    let digits = digits.get(..NANOS_DIGITS).unwrap_or(digits);
    let value = digits.parse::<u32>().ok()?;
    let scale = u32::try_from(NANOS_DIGITS - digits.len()).ok()?;
    value.checked_mul(10u32.checked_pow(scale)?)
}

fn time_from_captures(captures: &Captures<'_>) -> Option<TimeOfDay> {
    let number = |index: usize| -> Option<u32> {
        group(captures, index).map_or(Some(0), |text| text.parse::<u32>().ok())
    };

    let mut hour = number(1)?;
    let minute = number(2)?;
    let second = number(3)?;
    let nanos = group(captures, 4).map_or(Some(0), fraction_to_nanos)?;

    match group(captures, 5).map(str::to_ascii_lowercase).as_deref() {
        Some("pm") if hour < NOON => hour += NOON,
        Some("am") if hour == NOON => hour -= NOON,
        _ => {}
    }

    // 24:00:00.000 is midnight
    if hour == 24 && minute == 0 && second == 0 && nanos == 0 {
        hour = 0;
    }

    match TimeOfDay::new(hour, minute, second, nanos) {
        Ok(time) => Some(time),
        Err(err) => {
            trace!(candidate = &captures[0], %err, "skipping time candidate");
            None
        }
    }
}

/// Finds the first valid time of day in `text`.
pub fn extract_time(text: &str) -> Option<TimeOfDay> {
    patterns()
        .time
        .captures_iter(text)
        .find_map(|captures| time_from_captures(&captures))
}

/// Extracts a date from human-entered text.
///
/// # Errors
/// Returns `Error::DateNotFound` if the text holds no valid date.
pub fn date_from_string(env: &Environment, text: &str) -> Result<Date, Error> {
    extract_date(env, text).map(|(date, _)| date)
}

/// Extracts a time of day from human-entered text.
///
/// # Errors
/// Returns `Error::TimeNotFound` if the text holds no valid time.
pub fn time_from_string(text: &str) -> Result<TimeOfDay, Error> {
    extract_time(text).ok_or_else(|| Error::TimeNotFound(text.to_owned()))
}
