use core::fmt;
use core::ops::Sub;

use chrono::{DateTime, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};
use tsync_types::TsyncError;

/// A naive wall-clock point in time.
///
/// Absolute timestamps are kept as read; offset-mode values are the base date plus the
/// elapsed seconds. Ticks are microseconds since 1970-01-01 00:00:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Instant(NaiveDateTime);

impl Instant {
    /// Wrap a naive date-time.
    #[must_use]
    pub const fn new(dt: NaiveDateTime) -> Self {
        Self(dt)
    }

    /// 1970-01-01 00:00:00, the base of numeric time columns without a base date.
    #[must_use]
    pub fn unix_epoch() -> Self {
        Self(DateTime::UNIX_EPOCH.naive_utc())
    }

    /// Build from a microsecond tick count. Returns `None` when out of range.
    #[must_use]
    pub fn from_ticks(micros: i64) -> Option<Self> {
        DateTime::from_timestamp_micros(micros).map(|dt| Self(dt.naive_utc()))
    }

    /// Microseconds since the Unix epoch.
    #[must_use]
    pub fn ticks(self) -> i64 {
        self.0.and_utc().timestamp_micros()
    }

    /// The underlying naive date-time.
    #[must_use]
    pub const fn as_naive(self) -> NaiveDateTime {
        self.0
    }

    /// `self + delta`, or `None` on overflow.
    #[must_use]
    pub fn checked_add(self, delta: TimeDelta) -> Option<Self> {
        self.0.checked_add_signed(delta).map(Self)
    }

    /// Same instant with the fractional seconds removed.
    #[must_use]
    pub fn truncate_subseconds(self) -> Self {
        self.0.with_nanosecond(0).map_or(self, Self)
    }

    /// Midnight of the same date.
    #[must_use]
    pub fn truncate_to_date(self) -> Self {
        Self(self.0.date().and_time(NaiveTime::MIN))
    }
}

impl From<NaiveDateTime> for Instant {
    fn from(dt: NaiveDateTime) -> Self {
        Self(dt)
    }
}

impl Sub for Instant {
    type Output = TimeDelta;

    fn sub(self, rhs: Self) -> TimeDelta {
        self.0 - rhs.0
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S%.6f"))
    }
}

/// Closed interval `[begin, end]` with `begin <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    begin: Instant,
    end: Instant,
}

impl TimeRange {
    /// Build a range.
    ///
    /// # Errors
    /// Returns `TsyncError::InvalidArg` if `begin > end`.
    pub fn new(begin: Instant, end: Instant) -> Result<Self, TsyncError> {
        if begin > end {
            return Err(TsyncError::invalid_arg(format!(
                "time range begins after it ends: {begin} > {end}"
            )));
        }
        Ok(Self { begin, end })
    }

    /// Inclusive lower bound.
    #[must_use]
    pub const fn begin(&self) -> Instant {
        self.begin
    }

    /// Inclusive upper bound.
    #[must_use]
    pub const fn end(&self) -> Instant {
        self.end
    }

    /// Whether `t` lies within `[begin, end]`.
    #[must_use]
    pub fn contains(&self, t: Instant) -> bool {
        self.begin <= t && t <= self.end
    }

    /// `end - begin`.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.begin
    }

    /// Intersection of two ranges, `None` when they are disjoint.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let begin = self.begin.max(other.begin);
        let end = self.end.min(other.end);
        (begin <= end).then_some(Self { begin, end })
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.begin, self.end)
    }
}
