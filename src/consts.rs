/// Maximum valid year (inclusive)
pub const MAX_YEAR: u16 = 9999;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// First day of month, used for lower bounds
pub const MIN_DAY: u8 = 1;

/// Month number for February
pub const FEBRUARY: u8 = 2;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // January
    28, // February (non-leap, adjusted by is_leap_year check)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: u16 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: u16 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: u16 = 400;

/// Largest day number any month can have. Extracted days are only checked
/// against this, not against the length of their month.
pub const MAX_DAY: u8 = 31;

/// Hours above this are never a time of day. `24:00:00.000` collapses to
/// midnight, other hour 24 times roll into the next day.
pub const MAX_HOUR: u32 = 24;

/// Minutes and seconds up to 60 are accepted (leap seconds)
pub const MAX_MINUTE: u32 = 60;
pub const MAX_SECOND: u32 = 60;

/// Hour at which the 12-hour clock wraps
pub const NOON: u32 = 12;

/// Digits of fractional second precision we can represent
pub const NANOS_DIGITS: usize = 9;

/// Two-digit years above the current year's last three digits belong to this century
pub const PAST_CENTURY: u16 = 1900;
/// ...otherwise they belong to this one
pub const CURRENT_CENTURY: u16 = 2000;
/// Modulus used to pick the pivot from the current year
pub const PIVOT_MODULUS: i32 = 1000;

/// Length of a strict ISO 8601 date (`YYYY-MM-DD`)
pub const ISO_DATE_LEN: usize = 10;

/// Characters trimmed from both ends of human-entered text
pub const TRIMMED_CHARS: &[char] = &[' ', '\n', '\r', '\t'];

/// Layout characters that pass through unchanged at any run length
pub const LAYOUT_PUNCTUATION: &[char] = &[' ', ':', '/', '.', ',', 'T', '-', '_'];

/// Locale code used when nothing better matches
pub const DEFAULT_LANGUAGE: &str = "en";

/// English am/pm markers, used when a locale has none
pub const DEFAULT_AM_PM: [&str; 2] = ["am", "pm"];
