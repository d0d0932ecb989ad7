use core::fmt::{self, Write as _};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use tsync_types::TsyncError;

/// Separator candidates in detection priority order.
///
/// `", "` comes before `","` so that space-padded files are recognized as such, and
/// the comma comes before `.` so decimal points are not mistaken for separators.
pub const SEPARATOR_CANDIDATES: [&str; 7] = [", ", ",", ";", ".", "#", ":", "\t"];

/// Date used for clock-only timestamps (`%H:%M`).
fn clock_only_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Field separator of a delimited file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Separator(String);

impl Separator {
    /// Validate a separator: either `", "` or a single ASCII character.
    ///
    /// # Errors
    /// Returns `TsyncError::InvalidArg` for anything else.
    pub fn new(sep: impl Into<String>) -> Result<Self, TsyncError> {
        let sep = sep.into();
        if sep == ", " || (sep.len() == 1 && sep.is_ascii()) {
            Ok(Self(sep))
        } else {
            Err(TsyncError::invalid_arg(format!(
                "separator must be \", \" or a single ASCII character, got {sep:?}"
            )))
        }
    }

    /// The separator text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Byte handed to the csv reader/writer, and whether fields need trimming.
    #[must_use]
    pub fn delimiter(&self) -> (u8, bool) {
        let bytes = self.0.as_bytes();
        (bytes[0], bytes.len() > 1)
    }

    /// The candidate that follows this one in `SEPARATOR_CANDIDATES`.
    #[must_use]
    pub fn next_candidate(&self) -> Option<Self> {
        let pos = SEPARATOR_CANDIDATES.iter().position(|c| *c == self.0)?;
        SEPARATOR_CANDIDATES
            .get(pos + 1)
            .map(|c| Self((*c).to_string()))
    }

    fn conflicts_with(&self, decimal_point: char) -> bool {
        char::from(self.delimiter().0) == decimal_point
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Separator and decimal mark actually used for a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFormat {
    /// Field separator.
    pub separator: Separator,
    /// Decimal mark of numeric cells.
    pub decimal_point: char,
}

impl ResolvedFormat {
    /// Format suitable for writing: if the separator collides with the decimal mark,
    /// the next non-colliding candidate separator is substituted.
    ///
    /// # Errors
    /// Returns `TsyncError::InvalidArg` if no candidate avoids the decimal mark.
    pub fn for_export(self) -> Result<Self, TsyncError> {
        let mut separator = self.separator;
        while separator.conflicts_with(self.decimal_point) {
            separator = separator.next_candidate().ok_or_else(|| {
                TsyncError::invalid_arg(format!(
                    "no separator candidate avoids decimal mark {:?}",
                    self.decimal_point
                ))
            })?;
        }
        Ok(Self {
            separator,
            decimal_point: self.decimal_point,
        })
    }
}

impl Default for ResolvedFormat {
    fn default() -> Self {
        Self {
            separator: Separator(",".into()),
            decimal_point: '.',
        }
    }
}

/// Return the first candidate separator occurring in `sample_line`.
///
/// Callers pass a data line, not the header: a header may contain nothing but names.
///
/// # Errors
/// Returns `TsyncError::UnknownSeparator` if no candidate occurs in the line.
pub fn determine_separator(sample_line: &str) -> Result<Separator, TsyncError> {
    SEPARATOR_CANDIDATES
        .iter()
        .find(|c| sample_line.contains(**c))
        .map(|c| Separator((*c).to_string()))
        .ok_or_else(|| TsyncError::unknown_separator(sample_line))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum DateStyle {
    Dash,
    Dot,
}

impl DateStyle {
    const fn pattern(self) -> &'static str {
        match self {
            Self::Dash => "%Y-%m-%d",
            Self::Dot => "%Y.%m.%d",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ClockStyle {
    Minutes,
    Seconds,
    /// Seconds plus 1..=6 fraction digits after the given mark.
    Micros(char),
}

/// One of the built-in timestamp layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BuiltinLayout {
    pattern: &'static str,
    date: Option<DateStyle>,
    clock: Option<ClockStyle>,
}

impl BuiltinLayout {
    const fn new(
        pattern: &'static str,
        date: Option<DateStyle>,
        clock: Option<ClockStyle>,
    ) -> Self {
        Self {
            pattern,
            date,
            clock,
        }
    }

    /// `strftime`-style description of the layout.
    #[must_use]
    pub const fn pattern(&self) -> &'static str {
        self.pattern
    }

    fn parse(&self, text: &str) -> Option<NaiveDateTime> {
        match (self.date, self.clock) {
            (Some(date), Some(clock)) => {
                let (d, t) = text.split_once(' ')?;
                Some(parse_date(d, date)?.and_time(parse_clock(t, clock)?))
            }
            (Some(date), None) => parse_date(text, date).map(|d| d.and_time(NaiveTime::MIN)),
            (None, Some(clock)) => parse_clock(text, clock).map(|t| clock_only_date().and_time(t)),
            (None, None) => None,
        }
    }

    fn format(&self, dt: NaiveDateTime) -> String {
        let date = self.date.map(|d| dt.format(d.pattern()).to_string());
        let clock = self.clock.map(|c| match c {
            ClockStyle::Minutes => dt.format("%H:%M").to_string(),
            ClockStyle::Seconds => dt.format("%H:%M:%S").to_string(),
            ClockStyle::Micros(mark) => {
                let micros = dt.nanosecond() / 1_000;
                format!("{}{mark}{micros:06}", dt.format("%H:%M:%S"))
            }
        });
        match (date, clock) {
            (Some(d), Some(c)) => format!("{d} {c}"),
            (Some(d), None) => d,
            (None, Some(c)) => c,
            (None, None) => String::new(),
        }
    }
}

fn parse_date(text: &str, style: DateStyle) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, style.pattern()).ok()
}

fn parse_clock(text: &str, style: ClockStyle) -> Option<NaiveTime> {
    match style {
        ClockStyle::Minutes => NaiveTime::parse_from_str(text, "%H:%M").ok(),
        ClockStyle::Seconds => NaiveTime::parse_from_str(text, "%H:%M:%S").ok(),
        ClockStyle::Micros(mark) => {
            let (whole, frac) = text.rsplit_once(mark)?;
            let t = NaiveTime::parse_from_str(whole, "%H:%M:%S").ok()?;
            t.with_nanosecond(parse_fraction(frac)? * 1_000)
        }
    }
}

/// 1 to 6 digits, right-padded to microseconds (`"5"` is 500 000 µs).
fn parse_fraction(frac: &str) -> Option<u32> {
    if frac.is_empty() || frac.len() > 6 || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let digits: u32 = frac.parse().ok()?;
    let pad = u32::try_from(6 - frac.len()).ok()?;
    Some(digits * 10u32.pow(pad))
}

/// Timestamp layouts from most to least specific.
///
/// The order is load-bearing: a less specific layout tried first could accept a
/// more specific string and lose precision.
pub const TIMESTAMP_LAYOUTS: [BuiltinLayout; 9] = [
    BuiltinLayout::new(
        "%Y-%m-%d %H:%M:%S.%f",
        Some(DateStyle::Dash),
        Some(ClockStyle::Micros('.')),
    ),
    BuiltinLayout::new(
        "%Y-%m-%d %H:%M:%S,%f",
        Some(DateStyle::Dash),
        Some(ClockStyle::Micros(',')),
    ),
    BuiltinLayout::new(
        "%Y.%m.%d %H:%M:%S.%f",
        Some(DateStyle::Dot),
        Some(ClockStyle::Micros('.')),
    ),
    BuiltinLayout::new(
        "%Y.%m.%d %H:%M:%S,%f",
        Some(DateStyle::Dot),
        Some(ClockStyle::Micros(',')),
    ),
    BuiltinLayout::new(
        "%Y-%m-%d %H:%M:%S",
        Some(DateStyle::Dash),
        Some(ClockStyle::Seconds),
    ),
    BuiltinLayout::new(
        "%Y.%m.%d %H:%M:%S",
        Some(DateStyle::Dot),
        Some(ClockStyle::Seconds),
    ),
    BuiltinLayout::new(
        "%Y-%m-%d %H:%M",
        Some(DateStyle::Dash),
        Some(ClockStyle::Minutes),
    ),
    BuiltinLayout::new("%Y-%m-%d", Some(DateStyle::Dash), None),
    BuiltinLayout::new("%H:%M", None, Some(ClockStyle::Minutes)),
];

/// Layout of a time column: built-in, or any chrono `strftime` pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimestampLayout {
    /// One of `TIMESTAMP_LAYOUTS`.
    Builtin(BuiltinLayout),
    /// Caller-supplied chrono pattern.
    Custom(String),
}

impl TimestampLayout {
    /// The most specific layout, used when writing timestamps back out.
    #[must_use]
    pub const fn canonical() -> Self {
        Self::Builtin(TIMESTAMP_LAYOUTS[0])
    }

    /// Interpret a caller-supplied pattern; built-in patterns map to their parsers.
    #[must_use]
    pub fn from_pattern(pattern: &str) -> Self {
        TIMESTAMP_LAYOUTS
            .iter()
            .find(|l| l.pattern == pattern)
            .map_or_else(|| Self::Custom(pattern.to_string()), |l| Self::Builtin(*l))
    }

    /// The pattern text.
    #[must_use]
    pub fn pattern(&self) -> &str {
        match self {
            Self::Builtin(l) => l.pattern,
            Self::Custom(p) => p,
        }
    }

    /// Parse `text`; `None` if it does not conform.
    ///
    /// Custom patterns are tried as a date-time first, then as a bare date at midnight.
    #[must_use]
    pub fn parse(&self, text: &str) -> Option<NaiveDateTime> {
        match self {
            Self::Builtin(l) => l.parse(text),
            Self::Custom(p) => NaiveDateTime::parse_from_str(text, p).ok().or_else(|| {
                NaiveDate::parse_from_str(text, p)
                    .ok()
                    .map(|d| d.and_time(NaiveTime::MIN))
            }),
        }
    }

    /// Render `dt` with this layout.
    ///
    /// # Errors
    /// Returns `TsyncError::InvalidArg` if a custom pattern cannot be rendered.
    pub fn format(&self, dt: NaiveDateTime) -> Result<String, TsyncError> {
        match self {
            Self::Builtin(l) => Ok(l.format(dt)),
            Self::Custom(p) => {
                let mut out = String::new();
                write!(out, "{}", dt.format(p)).map_err(|_| {
                    TsyncError::invalid_arg(format!("cannot format with pattern {p:?}"))
                })?;
                Ok(out)
            }
        }
    }
}

impl fmt::Display for TimestampLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pattern())
    }
}

/// Return the first layout, most specific first, that parses `sample`.
///
/// # Errors
/// Returns `TsyncError::UnknownTimestampFormat` if no layout parses it.
pub fn determine_datetime_format(sample: &str) -> Result<TimestampLayout, TsyncError> {
    TIMESTAMP_LAYOUTS
        .iter()
        .find(|l| l.parse(sample).is_some())
        .map(|l| TimestampLayout::Builtin(*l))
        .ok_or_else(|| TsyncError::unknown_timestamp(sample))
}
