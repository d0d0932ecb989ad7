//! Row filtering and timestamp coarsening applied right after loading.

use tsync_types::{TimeTruncation, TsyncError};

use crate::instant::Instant;
use crate::series::Series;

/// Drop every row whose cell in `column` is numerically equal to `value`.
///
/// `column` defaults to the first column after the time column. Non-numeric cells
/// never match.
///
/// # Errors
/// Returns `TsyncError::InvalidArg` if the column does not exist.
pub fn remove_equal_to(
    series: Series,
    column: Option<&str>,
    value: f64,
) -> Result<Series, TsyncError> {
    let pos = series.resolve_value_column(column)?;
    #[allow(clippy::float_cmp)]
    let kept = series.retain(|_, row| row[pos].as_f64() != Some(value));
    Ok(kept)
}

/// Coarsen every timestamp, keeping row order.
#[must_use]
pub fn truncate_times(series: Series, truncation: TimeTruncation) -> Series {
    match truncation {
        TimeTruncation::Subseconds => series.map_index(Instant::truncate_subseconds),
        TimeTruncation::Date => series.map_index(Instant::truncate_to_date),
        _ => series,
    }
}
