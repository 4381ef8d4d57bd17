use crate::consts::{
    CENTURY_CYCLE, DAYS_IN_MONTH, FEBRUARY, FEBRUARY_DAYS_LEAP, GREGORIAN_CYCLE, LEAP_YEAR_CYCLE,
    MAX_DAY, MAX_HOUR, MAX_MINUTE, MAX_MONTH, MAX_SECOND, MAX_YEAR,
};
use crate::ParseError;
use crate::prelude::*;
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU8;
use std::str::FromStr;

/// Nanoseconds in one second, exclusive upper bound for `TimeOfDay::nanos`
const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// A year value guaranteed to be in the range `0..=MAX_YEAR` (0..=9999)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Year(u16);

impl Year {
    /// Creates a new Year, validating that it's <= `MAX_YEAR`
    ///
    /// # Errors
    /// Returns `ParseError::InvalidYear` if the value is > `MAX_YEAR`.
    pub const fn new(value: u16) -> Result<Self, ParseError> {
        if value > MAX_YEAR {
            return Err(ParseError::InvalidYear(value));
        }
        Ok(Self(value))
    }

    /// Returns the year value as u16
    #[inline]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for Year {
    type Error = ParseError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Year> for u16 {
    fn from(year: Year) -> Self {
        year.0
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A month value guaranteed to be in the range `1..=MAX_MONTH` (1..=12)
/// Uses `NonZeroU8` internally, so 0 is not a valid month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(NonZeroU8);

impl Month {
    /// Creates a new Month, validating that it's non-zero and <= `MAX_MONTH`
    ///
    /// # Errors
    /// Returns `ParseError::InvalidMonth` if the value is 0 or > `MAX_MONTH`.
    pub fn new(value: u8) -> Result<Self, ParseError> {
        let non_zero = NonZeroU8::new(value).ok_or(ParseError::InvalidMonth(value))?;
        if value > MAX_MONTH {
            return Err(ParseError::InvalidMonth(value));
        }
        Ok(Self(non_zero))
    }

    /// Returns the month value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for Month {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.0.get()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A day of month in the range `1..=MAX_DAY` (1..=31).
///
/// Human-entered days are only checked against the longest month. Whether the
/// day exists in a particular month is decided when the date is combined with a
/// time, where overflowing days roll into the following month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Day(NonZeroU8);

impl Day {
    /// Creates a new Day, validating that it's non-zero and <= `MAX_DAY`
    ///
    /// # Errors
    /// Returns `ParseError::InvalidDay` if the value is 0 or > `MAX_DAY`.
    pub fn new(value: u8) -> Result<Self, ParseError> {
        let non_zero = NonZeroU8::new(value).ok_or(ParseError::InvalidDay(value))?;
        if value > MAX_DAY {
            return Err(ParseError::InvalidDay(value));
        }
        Ok(Self(non_zero))
    }

    /// Returns the day value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for Day {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Day> for u8 {
    fn from(day: Day) -> Self {
        day.0.get()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A calendar date with no time or zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}-{:02}-{:02}", "year.get()", "month.get()", "day.get()")]
pub struct Date {
    year: Year,
    month: Month,
    day: Day,
}

impl Date {
    /// Creates a date from raw components, checking each against its own range only.
    ///
    /// # Errors
    /// Returns the `ParseError` of the first component out of range.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, ParseError> {
        Ok(Self {
            year: Year::new(year)?,
            month: Month::new(month)?,
            day: Day::new(day)?,
        })
    }

    /// Creates a date that must exist in the calendar, so Feb 29 only in leap years.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidDayOfMonth` if the day does not exist in that month.
    pub fn from_calendar(year: u16, month: u8, day: u8) -> Result<Self, ParseError> {
        let date = Self::new(year, month, day)?;
        if day > days_in_month(year, month) {
            return Err(ParseError::InvalidDayOfMonth { year, month, day });
        }
        Ok(date)
    }

    pub const fn year(&self) -> u16 {
        self.year.get()
    }

    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    pub const fn day(&self) -> u8 {
        self.day.get()
    }

    /// Whether the day exists in this date's month
    pub const fn is_calendar_date(&self) -> bool {
        self.day.get() <= days_in_month(self.year.get(), self.month.get())
    }
}

impl FromStr for Date {
    type Err = ParseError;

    /// Parses a strict `YYYY-MM-DD` date.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let parts: Vec<&str> = trimmed.split('-').collect();
        let [year, month, day] = parts.as_slice() else {
            return Err(ParseError::InvalidFormat(trimmed.to_owned()));
        };
        if year.len() != 4 || month.len() != 2 || day.len() != 2 {
            return Err(ParseError::InvalidFormat(trimmed.to_owned()));
        }

        let year = parse_digits::<u16>(year)?;
        let month = parse_digits::<u8>(month)?;
        let day = parse_digits::<u8>(day)?;
        Self::from_calendar(year, month, day)
    }
}

impl Serialize for Date {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A time of day as entered by a person.
///
/// Hours run to 24 and minutes and seconds to 60, so values such as `23:59:60`
/// survive extraction. Overflowing values roll forward when combined with a date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{hour:02}:{minute:02}:{second:02}.{nanos:09}")]
pub struct TimeOfDay {
    hour: u32,
    minute: u32,
    second: u32,
    nanos: u32,
}

impl TimeOfDay {
    /// Midnight, the time used when none is given
    pub const MIDNIGHT: Self = Self {
        hour: 0,
        minute: 0,
        second: 0,
        nanos: 0,
    };

    /// Creates a time of day, validating the extraction bounds.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidTime` if any component is out of range.
    pub const fn new(hour: u32, minute: u32, second: u32, nanos: u32) -> Result<Self, ParseError> {
        if hour > MAX_HOUR
            || minute > MAX_MINUTE
            || second > MAX_SECOND
            || nanos >= NANOS_PER_SECOND
        {
            return Err(ParseError::InvalidTime {
                hour,
                minute,
                second,
            });
        }
        Ok(Self {
            hour,
            minute,
            second,
            nanos,
        })
    }

    pub const fn hour(&self) -> u32 {
        self.hour
    }

    pub const fn minute(&self) -> u32 {
        self.minute
    }

    pub const fn second(&self) -> u32 {
        self.second
    }

    pub const fn nanos(&self) -> u32 {
        self.nanos
    }

    /// Seconds since midnight, letting out-of-range minutes and seconds carry over
    pub const fn total_seconds(&self) -> i64 {
        (self.hour as i64) * 3600 + (self.minute as i64) * 60 + self.second as i64
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(time: NaiveTime) -> Self {
        // chrono stores a leap second as nanos >= 1s
        let (second, nanos) = if time.nanosecond() >= NANOS_PER_SECOND {
            (time.second() + 1, time.nanosecond() - NANOS_PER_SECOND)
        } else {
            (time.second(), time.nanosecond())
        };
        Self {
            hour: time.hour(),
            minute: time.minute(),
            second,
            nanos,
        }
    }
}

fn parse_digits<T: FromStr>(s: &str) -> Result<T, ParseError> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidFormat(s.to_owned()));
    }
    s.parse::<T>()
        .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
}

// Helper functions

pub const fn is_leap_year(year: u16) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

pub const fn days_in_month(year: u16, month: u8) -> u8 {
    debug_assert!(month != 0 && month <= MAX_MONTH);

    if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_new_valid() {
        assert!(Year::new(0).is_ok());
        assert!(Year::new(2000).is_ok());
        assert!(Year::new(9999).is_ok());
    }

    #[test]
    fn test_year_new_invalid_too_large() {
        let result = Year::new(10000);
        assert!(matches!(result, Err(ParseError::InvalidYear(10000))));
    }

    #[test]
    fn test_year_serde() {
        let year = Year::new(2024).unwrap();
        let json = serde_json::to_string(&year).unwrap();
        assert_eq!(json, "2024");

        let parsed: Year = serde_json::from_str(&json).unwrap();
        assert_eq!(year, parsed);
    }

    #[test]
    fn test_month_new_valid() {
        for m in 1..=12 {
            assert!(Month::new(m).is_ok(), "Month {m} should be valid");
        }
    }

    #[test]
    fn test_month_new_invalid() {
        assert!(matches!(Month::new(0), Err(ParseError::InvalidMonth(0))));
        assert!(matches!(Month::new(13), Err(ParseError::InvalidMonth(13))));
    }

    #[test]
    fn test_day_new_bounds() {
        assert!(Day::new(1).is_ok());
        assert!(Day::new(31).is_ok());
        assert!(matches!(Day::new(0), Err(ParseError::InvalidDay(0))));
        assert!(matches!(Day::new(32), Err(ParseError::InvalidDay(32))));
    }

    #[test]
    fn test_date_new_ignores_month_length() {
        let date = Date::new(2001, 2, 31).unwrap();
        assert_eq!(date.day(), 31);
        assert!(!date.is_calendar_date());
    }

    #[test]
    fn test_date_from_calendar() {
        assert!(Date::from_calendar(2020, 2, 29).is_ok());
        assert!(matches!(
            Date::from_calendar(2019, 2, 29),
            Err(ParseError::InvalidDayOfMonth {
                year: 2019,
                month: 2,
                day: 29
            })
        ));
        assert!(Date::from_calendar(2024, 4, 31).is_err());
    }

    #[test]
    fn test_date_display_and_parse() {
        let date = Date::new(2018, 12, 31).unwrap();
        assert_eq!(date.to_string(), "2018-12-31");
        assert_eq!("2018-12-31".parse::<Date>().unwrap(), date);
        assert_eq!(Date::new(5, 1, 2).unwrap().to_string(), "0005-01-02");
    }

    #[test]
    fn test_date_parse_is_strict() {
        assert!("2001-1-2".parse::<Date>().is_err());
        assert!("2001/01/02".parse::<Date>().is_err());
        assert!("2001-02-30".parse::<Date>().is_err());
        assert!("+001-01-02".parse::<Date>().is_err());
        assert!(matches!("  ".parse::<Date>(), Err(ParseError::EmptyInput)));
    }

    #[test]
    fn test_date_serde() {
        let date = Date::new(2018, 12, 31).unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"2018-12-31\"");
        let parsed: Date = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, date);
    }

    #[test]
    fn test_time_of_day_bounds() {
        assert!(TimeOfDay::new(24, 0, 0, 0).is_ok());
        assert!(TimeOfDay::new(10, 60, 60, 0).is_ok());
        assert!(TimeOfDay::new(25, 0, 0, 0).is_err());
        assert!(TimeOfDay::new(10, 61, 0, 0).is_err());
        assert!(TimeOfDay::new(10, 0, 61, 0).is_err());
        assert!(TimeOfDay::new(10, 0, 0, 1_000_000_000).is_err());
    }

    #[test]
    fn test_time_of_day_display() {
        let time = TimeOfDay::new(9, 5, 7, 123_000_000).unwrap();
        assert_eq!(time.to_string(), "09:05:07.123000000");
        assert_eq!(TimeOfDay::MIDNIGHT.to_string(), "00:00:00.000000000");
    }

    #[test]
    fn test_time_of_day_from_naive_time() {
        let naive = NaiveTime::from_hms_nano_opt(13, 36, 30, 123_456_789).unwrap();
        let time = TimeOfDay::from(naive);
        assert_eq!(time, TimeOfDay::new(13, 36, 30, 123_456_789).unwrap());
    }

    #[test]
    fn test_total_seconds_carries() {
        let time = TimeOfDay::new(10, 60, 0, 0).unwrap();
        assert_eq!(time.total_seconds(), 11 * 3600);
    }

    #[test]
    fn test_is_leap_year_cases() {
        struct TestCase {
            year: u16,
            is_leap: bool,
            description: &'static str,
        }

        let cases = [
            TestCase {
                year: 2024,
                is_leap: true,
                description: "divisible by 4",
            },
            TestCase {
                year: 2023,
                is_leap: false,
                description: "not divisible by 4",
            },
            TestCase {
                year: 1900,
                is_leap: false,
                description: "century not divisible by 400",
            },
            TestCase {
                year: 2000,
                is_leap: true,
                description: "divisible by 400",
            },
        ];

        for case in &cases {
            assert_eq!(
                is_leap_year(case.year),
                case.is_leap,
                "Year {} ({})",
                case.year,
                case.description,
            );
        }
    }

    #[test]
    fn test_days_in_month_february() {
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28, "Century year not divisible by 400");
        assert_eq!(days_in_month(2000, 2), 29, "Century year divisible by 400");
    }
}
