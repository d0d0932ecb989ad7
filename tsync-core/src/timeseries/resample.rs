use tsync_types::TsyncError;

use crate::instant::Instant;
use crate::series::{Row, Series, Value};

/// `n` evenly spaced ticks from `first` to `last`, both endpoints exact.
fn uniform_axis(first: i64, last: i64, n: usize) -> Result<Vec<Instant>, TsyncError> {
    let span = i128::from(last) - i128::from(first);
    let steps = i128::try_from(n - 1).map_err(|_| TsyncError::InvalidResampleLength {
        requested: n,
    })?;
    (0..n)
        .map(|k| {
            let k = i128::try_from(k).unwrap_or(steps);
            let offset = span * k / steps;
            i64::try_from(i128::from(first) + offset)
                .ok()
                .and_then(Instant::from_ticks)
                .ok_or_else(|| TsyncError::Data("resampled time out of range".into()))
        })
        .collect()
}

/// Linear interpolation between two cells, or the left cell when either is not numeric.
fn interpolate(left: &Value, right: &Value, frac: f64) -> Value {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Value::Number(a + (b - a) * frac),
        _ => left.clone(),
    }
}

/// Resample onto `target_len` evenly spaced instants spanning the series.
///
/// - The new axis runs from the first to the last timestamp with spacing
///   `(last - first) / (target_len - 1)`, computed on microsecond ticks.
/// - Numeric cells are linearly interpolated between the samples bracketing each new
///   instant; other cells take the value of the last sample at or before it.
/// - With several samples at the same instant, the last one is the left knot.
/// - A keyed series keeps its time column, rewritten to the new axis.
///
/// # Errors
/// Returns `TsyncError::InvalidResampleLength` if `target_len < 2` and
/// `TsyncError::Data` for an empty series.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "tsync_core::timeseries::resample",
        skip(series),
        fields(rows = series.len()),
        err,
    )
)]
pub fn resample(series: Series, target_len: usize) -> Result<Series, TsyncError> {
    if target_len < 2 {
        return Err(TsyncError::InvalidResampleLength {
            requested: target_len,
        });
    }
    let (first, last) = series
        .bounds()
        .ok_or_else(|| TsyncError::Data("cannot resample an empty series".into()))?;

    let axis = uniform_axis(first.ticks(), last.ticks(), target_len)?;
    let (columns, index, rows, keyed) = series.into_parts();
    let knots: Vec<i64> = index.iter().map(|t| t.ticks()).collect();

    let new_rows: Vec<Row> = axis
        .iter()
        .map(|t| {
            let tick = t.ticks();
            // Number of knots at or before `tick`; at least 1 since `tick >= first`.
            let right = knots.partition_point(|&k| k <= tick);
            let left = right.saturating_sub(1);
            let mut row: Row = if right >= knots.len() {
                rows[left].clone()
            } else {
                #[allow(clippy::cast_precision_loss)]
                let frac = (tick - knots[left]) as f64 / (knots[right] - knots[left]) as f64;
                rows[left]
                    .iter()
                    .zip(&rows[right])
                    .map(|(a, b)| interpolate(a, b, frac))
                    .collect()
            };
            if keyed {
                row[0] = Value::Time(*t);
            }
            row
        })
        .collect();

    Ok(Series::from_parts(columns, axis, new_rows, keyed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_hits_both_ends() {
        let axis = uniform_axis(0, 1_000_000, 3).expect("axis");
        let ticks: Vec<i64> = axis.iter().map(|t| t.ticks()).collect();
        assert_eq!(ticks, vec![0, 500_000, 1_000_000]);
    }

    #[test]
    fn axis_of_a_single_instant_repeats_it() {
        let axis = uniform_axis(42, 42, 4).expect("axis");
        assert!(axis.iter().all(|t| t.ticks() == 42));
    }

    #[test]
    fn text_cells_hold_the_left_value() {
        let v = interpolate(&Value::Text("a".into()), &Value::Text("b".into()), 0.9);
        assert_eq!(v, Value::Text("a".into()));
        let n = interpolate(&Value::Number(1.0), &Value::Number(3.0), 0.25);
        assert_eq!(n, Value::Number(1.5));
    }
}
