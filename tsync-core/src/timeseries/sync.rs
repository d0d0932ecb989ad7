use core::cmp::Ordering;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use tsync_types::TsyncError;

use crate::instant::{Instant, TimeRange};
use crate::series::{Row, Series};
use crate::timeseries::infer::nominal_interval;
use crate::timeseries::resample::resample;

/// Which input of [`synchronize`] a fact refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyncSide {
    /// The first argument.
    A,
    /// The second argument.
    B,
}

/// Diagnostics of one synchronization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// `time[1] - time[0]` of A before trimming.
    pub interval_a: Option<TimeDelta>,
    /// `time[1] - time[0]` of B before trimming.
    pub interval_b: Option<TimeDelta>,
    /// Overlap both series were trimmed to.
    pub range: TimeRange,
    /// Rows of A inside the overlap.
    pub rows_a: usize,
    /// Rows of B inside the overlap.
    pub rows_b: usize,
    /// The side that was resampled, if any.
    pub resampled: Option<SyncSide>,
}

/// Aligned data produced by [`synchronize`].
#[derive(Debug, Clone, PartialEq)]
pub enum Synchronized {
    /// Both series resampled to one length and joined row by row.
    Joined(Series),
    /// Both series trimmed to the overlap, lengths untouched.
    Overlaid {
        /// Trimmed A.
        a: Series,
        /// Trimmed B.
        b: Series,
    },
}

/// Aligned data plus diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOutcome {
    /// The aligned data.
    pub aligned: Synchronized,
    /// What happened on the way.
    pub report: SyncReport,
}

fn describe(side: SyncSide, bounds: Option<(Instant, Instant)>) -> String {
    match bounds {
        Some((b, e)) => format!("{side:?} spans [{b}, {e}]"),
        None => format!("{side:?} is empty"),
    }
}

/// Intersection of the two series' time spans.
///
/// The result does not depend on argument order.
///
/// # Errors
/// Returns `TsyncError::NoOverlap` if either series is empty or inverted
/// (last timestamp before first), or if the spans are disjoint.
pub fn overlap_range(a: &Series, b: &Series) -> Result<TimeRange, TsyncError> {
    let (ba, bb) = (a.bounds(), b.bounds());
    let detail = || {
        format!(
            "{}; {}",
            describe(SyncSide::A, ba),
            describe(SyncSide::B, bb)
        )
    };
    let ((begin_a, end_a), (begin_b, end_b)) = match (ba, bb) {
        (Some(x), Some(y)) => (x, y),
        _ => return Err(TsyncError::no_overlap(detail())),
    };
    if end_a < begin_a || end_b < begin_b {
        return Err(TsyncError::no_overlap(format!("inverted range: {}", detail())));
    }
    let begin = begin_a.max(begin_b);
    let end = end_a.min(end_b);
    if begin > end {
        return Err(TsyncError::no_overlap(detail()));
    }
    TimeRange::new(begin, end)
}

/// Positional join of two equal-length series under `index`.
///
/// Column names of `b` that already exist get a `.1`, `.2`, ... suffix.
fn join_positional(a: Series, b: Series, index: Vec<Instant>) -> Result<Series, TsyncError> {
    let (mut columns, _, rows_a, _) = a.into_parts();
    let (columns_b, _, rows_b, _) = b.into_parts();
    for name in columns_b {
        let unique = unique_name(&columns, &name);
        columns.push(unique);
    }
    let rows: Vec<Row> = rows_a
        .into_iter()
        .zip(rows_b)
        .map(|(mut left, right)| {
            left.extend(right);
            left
        })
        .collect();
    Series::indexed(columns, index, rows)
}

fn unique_name(existing: &[String], name: &str) -> String {
    if !existing.iter().any(|c| c == name) {
        return name.to_string();
    }
    (1..)
        .map(|k| format!("{name}.{k}"))
        .find(|candidate| !existing.iter().any(|c| c == candidate))
        .unwrap_or_else(|| name.to_string())
}

/// Align two series on their common time span.
///
/// 1. Compute the overlap of both spans and trim both series to it (inclusive).
/// 2. Without `resample`, return both trimmed series with their time columns dropped
///    as [`Synchronized::Overlaid`]; their lengths may differ.
/// 3. With `resample`, resample the series with fewer rows up to the other's row
///    count, drop the time columns and join the rows positionally under the
///    resampled series' time axis (A's axis when no resampling was needed).
///
/// # Errors
/// - `TsyncError::NoOverlap` if the spans do not intersect, a series is empty or
///   inverted, or the overlap contains no rows of one series.
/// - Errors from [`resample`].
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "tsync_core::timeseries::synchronize",
        skip(a, b),
        fields(rows_a = a.len(), rows_b = b.len()),
        err,
    )
)]
pub fn synchronize(a: Series, b: Series, resample_enabled: bool) -> Result<SyncOutcome, TsyncError> {
    let interval_a = nominal_interval(&a);
    let interval_b = nominal_interval(&b);

    let range = overlap_range(&a, &b)?;
    let a = a.trim(&range);
    let b = b.trim(&range);
    if a.is_empty() || b.is_empty() {
        return Err(TsyncError::no_overlap(format!(
            "overlap {range} holds {} rows of A and {} rows of B",
            a.len(),
            b.len()
        )));
    }
    let (rows_a, rows_b) = (a.len(), b.len());

    #[cfg(feature = "tracing")]
    tracing::debug!(
        %range,
        rows_a,
        rows_b,
        interval_a = ?interval_a,
        interval_b = ?interval_b,
        "trimmed to overlap"
    );

    let report = |resampled| SyncReport {
        interval_a,
        interval_b,
        range,
        rows_a,
        rows_b,
        resampled,
    };

    if !resample_enabled {
        return Ok(SyncOutcome {
            aligned: Synchronized::Overlaid {
                a: a.drop_time_column(),
                b: b.drop_time_column(),
            },
            report: report(None),
        });
    }

    let (a, b, resampled) = match rows_a.cmp(&rows_b) {
        Ordering::Less => (resample(a, rows_b)?, b, Some(SyncSide::A)),
        Ordering::Greater => {
            let b = resample(b, rows_a)?;
            (a, b, Some(SyncSide::B))
        }
        Ordering::Equal => (a, b, None),
    };
    let index = match resampled {
        Some(SyncSide::B) => b.index().to_vec(),
        _ => a.index().to_vec(),
    };
    let joined = join_positional(a.drop_time_column(), b.drop_time_column(), index)?;

    Ok(SyncOutcome {
        aligned: Synchronized::Joined(joined),
        report: report(resampled),
    })
}
