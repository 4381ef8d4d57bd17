//! Layouts: compact templates such as `YYYY-MM-DD` or `h:mm aa`.
//!
//! A layout is read left to right as runs of one repeated character. Every run
//! is either punctuation, copied through as is, or a sequence from the catalog
//! below, which maps to a chrono strftime specifier.
//!
//! | sequence | meaning | native |
//! |---|---|---|
//! | `YY` / `YYYY` | two / four digit year | `%y` / `%Y` |
//! | `M` / `MM` | month 1-12 / 01-12 | `%-m` / `%m` |
//! | `MMM` / `MMMM` | month name, short / full | `%b` / `%B` |
//! | `D` / `DD` | day of month 1-31 / 01-31 | `%-d` / `%d` |
//! | `EEE` / `EEEE` | day of week, short / full | `%a` / `%A` |
//! | `h` / `hh` | hour 1-12 / 01-12 | `%-I` / `%I` |
//! | `t` / `tt` | hour 0-23 / 00-23 | `%H` |
//! | `m` / `mm` | minute | `%-M` / `%M` |
//! | `s` / `ss` | second | `%-S` / `%S` |
//! | `fff` / `ffffff` / `fffffffff` | milli / micro / nano seconds | `%3f` / `%6f` / `%9f` |
//! | `aa` / `AA` | am/pm marker, lower / upper case | `%P` / `%p` |
//! | `Z` | UTC offset, `Z` for UTC | `%:z` |
//! | `ZZZ` | UTC offset | `%:z` |
//!
//! Name sequences (`MMM`, `MMMM`, `EEE`, `EEEE`) can be displayed but not parsed.

use crate::compose::{naive_date, naive_time};
use crate::consts::{DEFAULT_AM_PM, LAYOUT_PUNCTUATION, NOON};
use crate::locale::{Locale, Translation};
use crate::types::{Date, TimeOfDay};
use crate::Error;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Offset, TimeZone, Timelike};
use std::collections::HashMap;
use std::fmt::{self, Write};
use std::sync::OnceLock;

bitflags::bitflags! {
    /// What kind of value a layout is used for.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FormattingMode: u8 {
        const DATE_ONLY = 0b001;
        const TIME_ONLY = 0b010;
        const DATE_TIME = 0b100;
    }
}

/// Modes a date sequence may appear in
const DATE: FormattingMode = FormattingMode::DATE_ONLY.union(FormattingMode::DATE_TIME);
/// Modes a time sequence may appear in
const TIME: FormattingMode = FormattingMode::TIME_ONLY.union(FormattingMode::DATE_TIME);
/// Modes a zone sequence may appear in
const ZONE: FormattingMode = FormattingMode::DATE_TIME;

/// How a sequence is written out beyond plain strftime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rendering {
    Native,
    /// 24-hour clock without the leading zero
    TrimmedHour,
    ShortMonth,
    Month,
    ShortDay,
    Day,
    LowerAmPm,
    UpperAmPm,
    /// `Z` when the offset is zero
    UtcOffset,
}

/// One entry of the sequence catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutSequence {
    token: &'static str,
    native: &'static str,
    modes: FormattingMode,
    parseable: bool,
    rendering: Rendering,
}

impl LayoutSequence {
    const fn new(
        token: &'static str,
        native: &'static str,
        modes: FormattingMode,
        parseable: bool,
    ) -> Self {
        Self {
            token,
            native,
            modes,
            parseable,
            rendering: Rendering::Native,
        }
    }

    const fn rendered(mut self, rendering: Rendering) -> Self {
        self.rendering = rendering;
        self
    }

    pub const fn token(&self) -> &'static str {
        self.token
    }

    /// The chrono strftime specifier this sequence maps to
    pub const fn native(&self) -> &'static str {
        self.native
    }

    pub const fn modes(&self) -> FormattingMode {
        self.modes
    }

    pub const fn is_parseable(&self) -> bool {
        self.parseable
    }
}

const CATALOG: &[LayoutSequence] = &[
    LayoutSequence::new("YY", "%y", DATE, true),
    LayoutSequence::new("YYYY", "%Y", DATE, true),
    LayoutSequence::new("M", "%-m", DATE, true),
    LayoutSequence::new("MM", "%m", DATE, true),
    LayoutSequence::new("MMM", "%b", DATE, false).rendered(Rendering::ShortMonth),
    LayoutSequence::new("MMMM", "%B", DATE, false).rendered(Rendering::Month),
    LayoutSequence::new("D", "%-d", DATE, true),
    LayoutSequence::new("DD", "%d", DATE, true),
    LayoutSequence::new("EEE", "%a", DATE, false).rendered(Rendering::ShortDay),
    LayoutSequence::new("EEEE", "%A", DATE, false).rendered(Rendering::Day),
    LayoutSequence::new("h", "%-I", TIME, true),
    LayoutSequence::new("hh", "%I", TIME, true),
    LayoutSequence::new("t", "%H", TIME, true).rendered(Rendering::TrimmedHour),
    LayoutSequence::new("tt", "%H", TIME, true),
    LayoutSequence::new("m", "%-M", TIME, true),
    LayoutSequence::new("mm", "%M", TIME, true),
    LayoutSequence::new("s", "%-S", TIME, true),
    LayoutSequence::new("ss", "%S", TIME, true),
    LayoutSequence::new("fff", "%3f", TIME, true),
    LayoutSequence::new("ffffff", "%6f", TIME, true),
    LayoutSequence::new("fffffffff", "%9f", TIME, true),
    LayoutSequence::new("aa", "%P", TIME, true).rendered(Rendering::LowerAmPm),
    LayoutSequence::new("AA", "%p", TIME, true).rendered(Rendering::UpperAmPm),
    LayoutSequence::new("Z", "%:z", ZONE, true).rendered(Rendering::UtcOffset),
    LayoutSequence::new("ZZZ", "%:z", ZONE, true),
];

fn catalog() -> &'static HashMap<&'static str, LayoutSequence> {
    static CATALOG_BY_TOKEN: OnceLock<HashMap<&'static str, LayoutSequence>> = OnceLock::new();
    CATALOG_BY_TOKEN.get_or_init(|| {
        CATALOG
            .iter()
            .map(|sequence| (sequence.token, *sequence))
            .collect()
    })
}

/// A piece of a compiled layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutToken<'a> {
    /// Punctuation, copied through unchanged
    Literal(&'a str),
    Sequence(&'static LayoutSequence),
}

impl LayoutToken<'_> {
    /// The text of this token as written in the layout
    pub fn token(&self) -> &str {
        match self {
            Self::Literal(text) => *text,
            Self::Sequence(sequence) => sequence.token,
        }
    }

    /// The strftime form of this token, punctuation as is
    pub fn native(&self) -> &str {
        match self {
            Self::Literal(text) => *text,
            Self::Sequence(sequence) => sequence.native,
        }
    }
}

/// Splits a layout into maximal runs of one repeated character.
fn runs(layout: &str) -> impl Iterator<Item = &str> {
    let mut rest = layout;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let len = rest.find(|c| c != first).unwrap_or(rest.len());
        let (run, tail) = rest.split_at(len);
        rest = tail;
        Some(run)
    })
}

fn is_punctuation(run: &str) -> bool {
    run.chars().next().is_some_and(|c| LAYOUT_PUNCTUATION.contains(&c))
}

/// Compiles a layout for the given mode.
///
/// With `parseable_only`, name sequences are rejected as they can't be read back.
///
/// # Errors
/// Returns `Error::InvalidLayoutSequence` naming the first run that is unknown or
/// not allowed in `mode`, or `Error::UnparseableLayoutSequence` for a name
/// sequence when `parseable_only` is set.
pub fn compile(
    layout: &str,
    mode: FormattingMode,
    parseable_only: bool,
) -> Result<Vec<LayoutToken<'_>>, Error> {
    runs(layout)
        .map(|run| {
            if is_punctuation(run) {
                return Ok(LayoutToken::Literal(run));
            }
            let sequence = catalog()
                .get(run)
                .filter(|sequence| sequence.modes.intersects(mode))
                .ok_or_else(|| Error::InvalidLayoutSequence(run.to_owned()))?;
            if parseable_only && !sequence.parseable {
                return Err(Error::UnparseableLayoutSequence(run.to_owned()));
            }
            Ok(LayoutToken::Sequence(sequence))
        })
        .collect()
}

/// Checks that a layout is usable for displaying values in `mode`.
///
/// # Errors
/// See [`compile`].
pub fn validate_layout(layout: &str, mode: FormattingMode) -> Result<(), Error> {
    compile(layout, mode, false).map(|_| ())
}

/// Checks that a layout is usable for reading values in `mode`.
///
/// # Errors
/// See [`compile`].
pub fn validate_parse_layout(layout: &str, mode: FormattingMode) -> Result<(), Error> {
    compile(layout, mode, true).map(|_| ())
}

/// A value that can be written through a layout.
pub trait LayoutValue {
    /// Writes one strftime specifier, `None` if it doesn't apply to this value
    fn format_native(&self, native: &str) -> Option<String>;

    /// Month, January = 0
    fn month0(&self) -> Option<usize> {
        None
    }

    /// Day of week, Sunday = 0
    fn weekday0(&self) -> Option<usize> {
        None
    }

    fn is_pm(&self) -> Option<bool> {
        None
    }

    fn utc_offset_seconds(&self) -> Option<i32> {
        None
    }
}

fn write_display(value: impl fmt::Display) -> Option<String> {
    let mut out = String::new();
    write!(out, "{value}").ok()?;
    Some(out)
}

impl LayoutValue for NaiveDate {
    fn format_native(&self, native: &str) -> Option<String> {
        write_display(self.format(native))
    }

    fn month0(&self) -> Option<usize> {
        Some(Datelike::month0(self) as usize)
    }

    fn weekday0(&self) -> Option<usize> {
        Some(self.weekday().num_days_from_sunday() as usize)
    }
}

impl LayoutValue for NaiveTime {
    fn format_native(&self, native: &str) -> Option<String> {
        write_display(self.format(native))
    }

    fn is_pm(&self) -> Option<bool> {
        Some(self.hour() >= NOON)
    }
}

impl<Tz: TimeZone> LayoutValue for DateTime<Tz>
where
    Tz::Offset: fmt::Display,
{
    fn format_native(&self, native: &str) -> Option<String> {
        write_display(self.format(native))
    }

    fn month0(&self) -> Option<usize> {
        Some(Datelike::month0(self) as usize)
    }

    fn weekday0(&self) -> Option<usize> {
        Some(self.weekday().num_days_from_sunday() as usize)
    }

    fn is_pm(&self) -> Option<bool> {
        Some(self.hour() >= NOON)
    }

    fn utc_offset_seconds(&self) -> Option<i32> {
        Some(self.offset().fix().local_minus_utc())
    }
}

fn am_pm(translation: &Translation, pm: bool) -> &str {
    let marker = translation.am_pm[usize::from(pm)].as_str();
    if marker.is_empty() {
        DEFAULT_AM_PM[usize::from(pm)]
    } else {
        marker
    }
}

fn render_sequence(
    sequence: &LayoutSequence,
    value: &impl LayoutValue,
    translation: &Translation,
) -> Option<String> {
    match sequence.rendering {
        Rendering::Native => value.format_native(sequence.native),
        Rendering::TrimmedHour => {
            let hour = value.format_native(sequence.native)?;
            Some(match hour.strip_prefix('0') {
                Some(trimmed) if !trimmed.is_empty() => trimmed.to_owned(),
                _ => hour,
            })
        }
        Rendering::ShortMonth => Some(translation.short_months.get(value.month0()?)?.clone()),
        Rendering::Month => Some(translation.months.get(value.month0()?)?.clone()),
        Rendering::ShortDay => Some(translation.short_days.get(value.weekday0()?)?.clone()),
        Rendering::Day => Some(translation.days.get(value.weekday0()?)?.clone()),
        Rendering::LowerAmPm => Some(am_pm(translation, value.is_pm()?).to_lowercase()),
        Rendering::UpperAmPm => Some(am_pm(translation, value.is_pm()?).to_uppercase()),
        Rendering::UtcOffset => {
            if value.utc_offset_seconds()? == 0 {
                Some("Z".to_owned())
            } else {
                value.format_native(sequence.native)
            }
        }
    }
}

/// Writes a value through a layout, taking names from `translation`.
///
/// # Errors
/// Returns the [`compile`] errors, or `Error::InvalidLayoutSequence` if a
/// sequence can't be produced from this kind of value.
pub fn render(
    layout: &str,
    mode: FormattingMode,
    value: &impl LayoutValue,
    translation: &Translation,
) -> Result<String, Error> {
    let tokens = compile(layout, mode, false)?;
    let mut out = String::with_capacity(layout.len());
    for token in tokens {
        match token {
            LayoutToken::Literal(text) => out.push_str(text),
            LayoutToken::Sequence(sequence) => {
                let text = render_sequence(sequence, value, translation)
                    .ok_or_else(|| Error::InvalidLayoutSequence(sequence.token.to_owned()))?;
                out.push_str(&text);
            }
        }
    }
    Ok(out)
}

/// Formats a date through a date layout.
///
/// # Errors
/// Returns an error if the layout is invalid for dates.
pub fn format_date(date: &Date, layout: &str, locale: &Locale) -> Result<String, Error> {
    render(layout, FormattingMode::DATE_ONLY, &naive_date(date)?, Translation::for_locale(locale))
}

/// Formats a time of day through a time layout.
///
/// # Errors
/// Returns an error if the layout is invalid for times.
pub fn format_time(time: &TimeOfDay, layout: &str, locale: &Locale) -> Result<String, Error> {
    render(layout, FormattingMode::TIME_ONLY, &naive_time(time), Translation::for_locale(locale))
}

/// Formats a datetime through a datetime layout.
///
/// # Errors
/// Returns an error if the layout is invalid.
pub fn format_date_time<Tz: TimeZone>(
    value: &DateTime<Tz>,
    layout: &str,
    locale: &Locale,
) -> Result<String, Error>
where
    Tz::Offset: fmt::Display,
{
    render(layout, FormattingMode::DATE_TIME, value, Translation::for_locale(locale))
}
