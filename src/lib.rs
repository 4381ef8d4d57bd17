//! Dates and times as they appear in flow conversations.
//!
//! People type dates the way their country writes them, and a flow's
//! environment says which order to expect, which timezone to place times in
//! and which language to display names in. This crate pulls dates, times and
//! date times out of such free text, and formats them back using layouts like
//! `DD-MM-YYYY` or `h:mm aa`.
//!
//! ```
//! use flow_dates::{date_time_from_string, format_date_time, DateFormat, Environment, Locale};
//! use chrono_tz::Tz;
//!
//! let env = Environment::builder()
//!     .with_date_format(DateFormat::MonthDayYear)
//!     .with_timezone(Tz::America__New_York)
//!     .build();
//!
//! let parsed = date_time_from_string(&env, "see you 12/31/2018 at 9:30pm", false).unwrap();
//! let locale: Locale = "spa-EC".parse().unwrap();
//! assert_eq!(
//!     format_date_time(&parsed, "DD MMMM YYYY tt:mm", &locale).unwrap(),
//!     "31 diciembre 2018 21:30"
//! );
//! ```

mod clock;
mod compose;
mod consts;
mod env;
mod extract;
mod layout;
mod locale;
mod prelude;
mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use compose::{date_time_from_string, parse_iso_date_time};
pub use consts::*;
pub use env::{
    is_valid_date_layout, is_valid_time_layout, DateFormat, Environment, EnvironmentBuilder,
    EnvironmentConfig, TimeFormat,
};
pub use extract::{date_from_string, extract_date, extract_time, time_from_string};
pub use layout::{
    compile, format_date, format_date_time, format_time, render, validate_layout,
    validate_parse_layout, FormattingMode, LayoutSequence, LayoutToken, LayoutValue,
};
pub use locale::{Locale, Translation};
pub use types::{days_in_month, is_leap_year, Date, Day, Month, TimeOfDay, Year};

use crate::prelude::*;
use thiserror::Error;

/// A date or time component outside its allowed range.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be 0-{})", "_0", MAX_YEAR)]
    InvalidYear(u16),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day: {} (must be {}-{})", "_0", MIN_DAY, MAX_DAY)]
    InvalidDay(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDayOfMonth { year: u16, month: u8, day: u8 },
    #[display(fmt = "Invalid time {hour:02}:{minute:02}:{second:02}")]
    InvalidTime { hour: u32, minute: u32, second: u32 },
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("'{0}' is not a valid format sequence")]
    InvalidLayoutSequence(String),
    #[error("'{0}' is not a parseable format sequence")]
    UnparseableLayoutSequence(String),
    #[error("string '{0}' couldn't be parsed as a date")]
    DateNotFound(String),
    #[error("string '{0}' couldn't be parsed as a time")]
    TimeNotFound(String),
    #[error("'{0}' is not a valid date format")]
    UnsupportedDateFormat(String),
    #[error("'{0}' is not a valid time format")]
    UnsupportedTimeFormat(String),
    #[error("'{0}' is not a known timezone")]
    UnknownTimezone(String),
    #[error("'{0}' is not a valid locale")]
    InvalidLocale(String),
    #[error("{0} is outside the supported range")]
    OutOfRange(String),
    #[error(transparent)]
    Parse(#[from] ParseError),
}
