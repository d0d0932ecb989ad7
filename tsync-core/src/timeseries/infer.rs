use chrono::TimeDelta;

use crate::series::Series;

/// Nominal sample interval: `time[1] - time[0]`.
///
/// Only used for reporting; `None` for fewer than two rows. Later gaps are not
/// looked at.
///
/// ```
/// use tsync_core::{nominal_interval, load_str, FormatHint, RowPolicy};
/// let text = "t;v\n0;1\n2;1\n3;1\n";
/// let s = load_str(text, &FormatHint::default(), RowPolicy::Abort).unwrap().series;
/// assert_eq!(nominal_interval(&s), Some(chrono::TimeDelta::seconds(2)));
/// ```
#[must_use]
pub fn nominal_interval(series: &Series) -> Option<TimeDelta> {
    match series.index() {
        [first, second, ..] => Some(*second - *first),
        _ => None,
    }
}
