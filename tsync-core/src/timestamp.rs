use chrono::TimeDelta;
use tsync_types::TsyncError;

use crate::format::{TIMESTAMP_LAYOUTS, TimestampLayout};
use crate::instant::Instant;

/// Parse `text` with a known layout.
///
/// # Errors
/// Returns `TsyncError::FormatMismatch` if `text` does not conform to `layout`.
pub fn parse_instant(text: &str, layout: &TimestampLayout) -> Result<Instant, TsyncError> {
    layout
        .parse(text)
        .map(Instant::new)
        .ok_or_else(|| TsyncError::format_mismatch(text, layout.pattern()))
}

/// Parse a free-standing date string (e.g. a base date) by trying every built-in
/// layout, most specific first.
///
/// ```
/// use tsync_core::str_date_to_instant;
/// let t = str_date_to_instant("2020-07-22").unwrap();
/// assert_eq!(t.to_string(), "2020-07-22 00:00:00.000000");
/// assert!(str_date_to_instant("yesterday").is_err());
/// ```
///
/// # Errors
/// Returns `TsyncError::UnknownTimestampFormat` if no layout parses `text`.
pub fn str_date_to_instant(text: &str) -> Result<Instant, TsyncError> {
    TIMESTAMP_LAYOUTS
        .iter()
        .find_map(|l| TimestampLayout::Builtin(*l).parse(text))
        .map(Instant::new)
        .ok_or_else(|| TsyncError::unknown_timestamp(text))
}

/// `base + seconds`, keeping microsecond precision.
///
/// # Errors
/// Returns `TsyncError::InvalidArg` for non-finite offsets and `TsyncError::Data` when
/// the result is out of the representable range.
pub fn offset_instant(base: Instant, seconds: f64) -> Result<Instant, TsyncError> {
    if !seconds.is_finite() {
        return Err(TsyncError::invalid_arg(format!(
            "time offset is not finite: {seconds}"
        )));
    }
    let micros = (seconds * 1_000_000.0).round();
    #[allow(clippy::cast_possible_truncation)]
    let delta = TimeDelta::microseconds(micros as i64);
    base.checked_add(delta)
        .ok_or_else(|| TsyncError::Data(format!("{base} + {seconds}s is out of range")))
}
