//! Combining extracted dates and times into instants.

use crate::consts::{MIN_DAY, TRIMMED_CHARS};
use crate::env::Environment;
use crate::extract::{extract_date, extract_time};
use crate::types::{Date, TimeOfDay};
use crate::Error;
use chrono::{
    DateTime, Days, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeDelta, TimeZone, Utc,
};
use chrono_tz::Tz;
use regex::{Captures, Regex};
use std::sync::OnceLock;
use tracing::debug;

const SECONDS_PER_DAY: i64 = 86_400;

fn iso_patterns() -> &'static IsoPatterns {
    static PATTERNS: OnceLock<IsoPatterns> = OnceLock::new();
    PATTERNS.get_or_init(IsoPatterns::new)
}

struct IsoPatterns {
    // 2016-05-01T18:30:15.250-08:00
    with_seconds: Regex,
    // 2017-06-10T17:34Z
    without_seconds: Regex,
}

impl IsoPatterns {
    #[allow(clippy::expect_used)]
    fn new() -> Self {
        Self {
            with_seconds: Regex::new(
                r"^([0-9]{4})-([0-9]{2})-([0-9]{2})T([0-9]{2}):([0-9]{2}):([0-9]{2})(?:\.([0-9]{1,9}))?(Z|[+-][0-9]{2}:[0-9]{2})$",
            )
            .expect("ISO 8601 date time pattern"),
            without_seconds: Regex::new(
                r"^([0-9]{4})-([0-9]{2})-([0-9]{2})T([0-9]{2}):([0-9]{2})(Z|[+-][0-9]{2}:[0-9]{2})$",
            )
            .expect("ISO 8601 date time without seconds pattern"),
        }
    }
}

fn number<T: std::str::FromStr>(captures: &Captures<'_>, index: usize) -> Option<T> {
    captures.get(index)?.as_str().parse().ok()
}

/// Parses `Z`, `+hh:mm` or `-hh:mm`.
fn utc_offset(text: &str) -> Option<FixedOffset> {
    if text == "Z" {
        return FixedOffset::east_opt(0);
    }
    let sign = match text.get(..1)? {
        "+" => 1,
        "-" => -1,
        _ => return None,
    };
    let (hours, minutes) = text.get(1..)?.split_once(':')?;
    let seconds = hours.parse::<i32>().ok()? * 3600 + minutes.parse::<i32>().ok()? * 60;
    FixedOffset::east_opt(sign * seconds)
}

fn iso_from_captures(
    captures: &Captures<'_>,
    second: Option<usize>,
    fraction: Option<usize>,
    offset: usize,
) -> Option<DateTime<FixedOffset>> {
    let date = NaiveDate::from_ymd_opt(
        number(captures, 1)?,
        number(captures, 2)?,
        number(captures, 3)?,
    )?;

    let nanos = match fraction.and_then(|index| captures.get(index)) {
        Some(digits) => {
            let digits = digits.as_str();
            digits.parse::<u32>().ok()? * 10u32.pow(9 - u32::try_from(digits.len()).ok()?)
        }
        None => 0,
    };
    let second = match second {
        Some(index) => number(captures, index)?,
        None => 0,
    };
    let time =
        NaiveTime::from_hms_nano_opt(number(captures, 4)?, number(captures, 5)?, second, nanos)?;

    let offset = utc_offset(captures.get(offset)?.as_str())?;
    offset.from_local_datetime(&date.and_time(time)).single()
}

/// Parses a complete ISO 8601 date time with an explicit offset, converting
/// it to `timezone`. The instant is kept, the written offset is not.
pub fn parse_iso_date_time(text: &str, timezone: Tz) -> Option<DateTime<Tz>> {
    let patterns = iso_patterns();
    let parsed = if let Some(captures) = patterns.with_seconds.captures(text) {
        iso_from_captures(&captures, Some(6), Some(7), 8)
    } else if let Some(captures) = patterns.without_seconds.captures(text) {
        iso_from_captures(&captures, None, None, 6)
    } else {
        None
    };
    parsed.map(|instant| instant.with_timezone(&timezone))
}

/// The calendar date for `date`, rolling days past the end of the month into
/// the next one.
pub(crate) fn naive_date(date: &Date) -> Result<NaiveDate, Error> {
    NaiveDate::from_ymd_opt(i32::from(date.year()), u32::from(date.month()), u32::from(MIN_DAY))
        .and_then(|first| first.checked_add_days(Days::new(u64::from(date.day() - MIN_DAY))))
        .ok_or_else(|| Error::OutOfRange(date.to_string()))
}

/// The wall clock time for `time`, wrapping past midnight.
pub(crate) fn naive_time(time: &TimeOfDay) -> NaiveTime {
    let seconds = time.total_seconds().rem_euclid(SECONDS_PER_DAY);
    u32::try_from(seconds)
        .ok()
        .and_then(|seconds| NaiveTime::from_num_seconds_from_midnight_opt(seconds, time.nanos()))
        .unwrap_or_default()
}

fn combine(date: &Date, time: &TimeOfDay) -> Result<NaiveDateTime, Error> {
    let elapsed = TimeDelta::seconds(time.total_seconds())
        + TimeDelta::nanoseconds(i64::from(time.nanos()));
    naive_date(date)?
        .and_time(NaiveTime::MIN)
        .checked_add_signed(elapsed)
        .ok_or_else(|| Error::OutOfRange(format!("{date} {time}")))
}

/// Places a wall clock time in `timezone`. Times skipped by a DST transition
/// use the offset in force before it, ambiguous times take the earlier instant.
fn localize(local: NaiveDateTime, timezone: Tz) -> Result<DateTime<Tz>, Error> {
    match timezone.from_local_datetime(&local) {
        LocalResult::Single(instant) | LocalResult::Ambiguous(instant, _) => Ok(instant),
        LocalResult::None => {
            let before = local
                .checked_sub_signed(TimeDelta::days(1))
                .ok_or_else(|| Error::OutOfRange(local.to_string()))?;
            let offset = timezone.offset_from_utc_datetime(&before).fix();
            let utc = local
                .checked_sub_signed(TimeDelta::seconds(i64::from(offset.local_minus_utc())))
                .ok_or_else(|| Error::OutOfRange(local.to_string()))?;
            debug!(%local, %offset, "local time skipped by transition");
            Ok(Utc.from_utc_datetime(&utc).with_timezone(&timezone))
        }
    }
}

/// Extracts a date time from human-entered text.
///
/// A complete ISO 8601 string is taken as is. Otherwise a date is extracted
/// using the environment's date format, then a time is looked for in the
/// text that follows it. When there is no time, `fill_missing_time` decides
/// between the current time of day and midnight.
///
/// # Errors
/// Returns `Error::DateNotFound` if the text holds no valid date.
///
/// # Examples
/// ```
/// use flow_dates::{date_time_from_string, Environment};
///
/// let env = Environment::default();
/// let parsed = date_time_from_string(&env, "date is 01.02.2001 yes", false).unwrap();
/// assert_eq!(parsed.to_rfc3339(), "2001-02-01T00:00:00+00:00");
/// ```
pub fn date_time_from_string(
    env: &Environment,
    text: &str,
    fill_missing_time: bool,
) -> Result<DateTime<Tz>, Error> {
    let text = text.trim_matches(TRIMMED_CHARS);

    if let Some(instant) = parse_iso_date_time(text, env.timezone()) {
        debug!(%instant, "found ISO 8601 date time");
        return Ok(instant);
    }

    let (date, remainder) = extract_date(env, text)?;
    let time = match extract_time(remainder) {
        Some(time) => time,
        None if fill_missing_time => TimeOfDay::from(env.now().time()),
        None => TimeOfDay::MIDNIGHT,
    };

    localize(combine(&date, &time)?, env.timezone())
}
