use tsync_types::{TsyncError, WarmupPolicy};

use crate::series::{Series, Value};

/// Gross-error test for one trailing window.
///
/// With `avg` the window mean and `sample` its last element, returns `avg` when
/// `|avg - sample| > avg`, otherwise `sample`. Returns `None` for an empty window.
///
/// The test is relative to `avg` itself. With `avg == 0` it only fires for a non-zero
/// sample, and with a negative `avg` it fires for every sample.
///
/// ```
/// use tsync_core::filter_window;
/// assert_eq!(filter_window(&[10.0, 10.0, 10.0, 10.0, 100.0]), Some(28.0));
/// assert_eq!(filter_window(&[10.0, 10.0, 10.0, 10.0, 15.0]), Some(15.0));
/// ```
#[must_use]
pub fn filter_window(window: &[f64]) -> Option<f64> {
    let sample = *window.last()?;
    #[allow(clippy::cast_precision_loss)]
    let avg = window.iter().sum::<f64>() / window.len() as f64;
    if (avg - sample).abs() > avg {
        Some(avg)
    } else {
        Some(sample)
    }
}

/// Apply [`filter_window`] as a trailing rolling transform over one numeric column.
///
/// Windows are taken over the original values, not over already-filtered output.
/// `column` defaults to the first column after the time column. Rows before the first
/// full window follow `warmup`.
///
/// # Errors
/// Returns `TsyncError::InvalidArg` if `window` is zero, the column does not exist, or
/// a cell in it is not numeric.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "tsync_core::timeseries::filter_column",
        skip(series),
        fields(rows = series.len()),
        err,
    )
)]
pub fn filter_column(
    series: Series,
    column: Option<&str>,
    window: usize,
    warmup: WarmupPolicy,
) -> Result<Series, TsyncError> {
    if window == 0 {
        return Err(TsyncError::invalid_arg("filter window must be at least 1"));
    }
    let pos = series.resolve_value_column(column)?;
    let values: Vec<f64> = series
        .column(pos)
        .enumerate()
        .map(|(i, v)| {
            v.as_f64().ok_or_else(|| {
                TsyncError::invalid_arg(format!(
                    "column {:?} is not numeric at row {i}",
                    series.columns()[pos]
                ))
            })
        })
        .collect::<Result<_, _>>()?;

    let filtered: Vec<Option<f64>> = (0..values.len())
        .map(|i| {
            if i + 1 >= window {
                filter_window(&values[i + 1 - window..=i])
            } else {
                match warmup {
                    WarmupPolicy::Drop => None,
                    WarmupPolicy::PartialWindow => filter_window(&values[..=i]),
                    _ => Some(values[i]),
                }
            }
        })
        .collect();

    #[cfg(feature = "tracing")]
    {
        let replaced = filtered
            .iter()
            .zip(&values)
            .filter(|(f, v)| f.is_some_and(|f| f.to_bits() != v.to_bits()))
            .count();
        tracing::debug!(replaced, "gross-error filter applied");
    }

    let (columns, index, rows, keyed) = series.into_parts();
    let (index, rows) = index
        .into_iter()
        .zip(rows)
        .zip(filtered)
        .filter_map(|((t, mut row), v)| {
            let v = v?;
            row[pos] = Value::Number(v);
            Some((t, row))
        })
        .unzip();
    Ok(Series::from_parts(columns, index, rows, keyed))
}
