//! The read-only environment that extraction and formatting run in.

use crate::clock::{Clock, SystemClock};
use crate::layout::{FormattingMode, validate_layout};
use crate::locale::Locale;
use crate::prelude::*;
use crate::Error;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

/// Order in which day, month and year appear in human-entered dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DateFormat {
    #[display(fmt = "YYYY-MM-DD")]
    YearMonthDay,
    #[display(fmt = "MM-DD-YYYY")]
    MonthDayYear,
    #[default]
    #[display(fmt = "DD-MM-YYYY")]
    DayMonthYear,
}

impl DateFormat {
    pub const ALL: [Self; 3] = [Self::YearMonthDay, Self::MonthDayYear, Self::DayMonthYear];
}

impl FromStr for DateFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.to_string() == s)
            .ok_or_else(|| Error::UnsupportedDateFormat(s.to_owned()))
    }
}

impl TryFrom<String> for DateFormat {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DateFormat> for String {
    fn from(format: DateFormat) -> Self {
        format.to_string()
    }
}

/// Preferred layout for displaying times.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeFormat {
    #[default]
    #[display(fmt = "tt:mm")]
    HourMinute,
    #[display(fmt = "h:mm aa")]
    HourMinuteAmPm,
    #[display(fmt = "tt:mm:ss")]
    HourMinuteSecond,
    #[display(fmt = "h:mm:ss aa")]
    HourMinuteSecondAmPm,
}

impl TimeFormat {
    pub const ALL: [Self; 4] = [
        Self::HourMinute,
        Self::HourMinuteAmPm,
        Self::HourMinuteSecond,
        Self::HourMinuteSecondAmPm,
    ];
}

impl FromStr for TimeFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.to_string() == s)
            .ok_or_else(|| Error::UnsupportedTimeFormat(s.to_owned()))
    }
}

impl TryFrom<String> for TimeFormat {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeFormat> for String {
    fn from(format: TimeFormat) -> Self {
        format.to_string()
    }
}

/// Whether a layout string is usable for displaying dates.
pub fn is_valid_date_layout(layout: &str) -> bool {
    validate_layout(layout, FormattingMode::DATE_ONLY).is_ok()
}

/// Whether a layout string is usable for displaying times.
pub fn is_valid_time_layout(layout: &str) -> bool {
    validate_layout(layout, FormattingMode::TIME_ONLY).is_ok()
}

/// Configuration and clock for a single caller, such as one flow session.
#[derive(Debug, Clone)]
pub struct Environment {
    date_format: DateFormat,
    time_format: TimeFormat,
    timezone: Tz,
    locale: Locale,
    clock: Arc<dyn Clock>,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            date_format: DateFormat::default(),
            time_format: TimeFormat::default(),
            timezone: Tz::UTC,
            locale: Locale::default(),
            clock: Arc::new(SystemClock),
        }
    }
}

impl Environment {
    pub fn builder() -> EnvironmentBuilder {
        EnvironmentBuilder::default()
    }

    pub const fn date_format(&self) -> DateFormat {
        self.date_format
    }

    pub const fn time_format(&self) -> TimeFormat {
        self.time_format
    }

    pub const fn timezone(&self) -> Tz {
        self.timezone
    }

    pub const fn locale(&self) -> &Locale {
        &self.locale
    }

    /// The current instant, in this environment's timezone
    pub fn now(&self) -> DateTime<Tz> {
        self.clock.now().with_timezone(&self.timezone)
    }

    /// The current instant in UTC
    pub fn now_utc(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

/// Builds an [`Environment`], starting from the defaults.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentBuilder {
    env: Environment,
}

impl EnvironmentBuilder {
    #[must_use]
    pub fn with_date_format(mut self, date_format: DateFormat) -> Self {
        self.env.date_format = date_format;
        self
    }

    #[must_use]
    pub fn with_time_format(mut self, time_format: TimeFormat) -> Self {
        self.env.time_format = time_format;
        self
    }

    #[must_use]
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.env.timezone = timezone;
        self
    }

    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.env.locale = locale;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.env.clock = Arc::new(clock);
        self
    }

    pub fn build(self) -> Environment {
        self.env
    }
}

/// Serialized form of an environment. Every field is optional and falls back
/// to the default environment's value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_format: Option<DateFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_format: Option<TimeFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<Locale>,
}

impl TryFrom<EnvironmentConfig> for Environment {
    type Error = Error;

    fn try_from(config: EnvironmentConfig) -> Result<Self, Self::Error> {
        let mut builder = Self::builder();
        if let Some(date_format) = config.date_format {
            builder = builder.with_date_format(date_format);
        }
        if let Some(time_format) = config.time_format {
            builder = builder.with_time_format(time_format);
        }
        if let Some(name) = config.timezone {
            let timezone = name
                .parse::<Tz>()
                .map_err(|_| Error::UnknownTimezone(name.clone()))?;
            builder = builder.with_timezone(timezone);
        }
        if let Some(locale) = config.locale {
            builder = builder.with_locale(locale);
        }
        Ok(builder.build())
    }
}

impl From<&Environment> for EnvironmentConfig {
    fn from(env: &Environment) -> Self {
        Self {
            date_format: Some(env.date_format),
            time_format: Some(env.time_format),
            timezone: Some(env.timezone.name().to_owned()),
            locale: Some(env.locale.clone()),
        }
    }
}
