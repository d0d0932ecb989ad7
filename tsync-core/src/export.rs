use std::fs::File;
use std::io::Write;
use std::path::Path;

use tsync_types::TsyncError;

use crate::error::{from_csv, from_io};
use crate::format::{ResolvedFormat, TimestampLayout};
use crate::series::{Series, Value};

fn render(value: &Value, layout: &TimestampLayout, decimal_point: char) -> Result<String, TsyncError> {
    match value {
        Value::Number(v) => {
            let text = v.to_string();
            Ok(if decimal_point == '.' {
                text
            } else {
                text.replace('.', &decimal_point.to_string())
            })
        }
        Value::Text(s) => Ok(s.clone()),
        Value::Time(t) => layout.format(t.as_naive()),
    }
}

/// Write `series` as delimited text: a header row, then one row per sample.
///
/// Timestamps use the most specific built-in layout (`%Y-%m-%d %H:%M:%S.%f`). A series
/// without a time column gets a leading `time` column rendered from its index. The
/// `", "` separator is written as a bare comma.
///
/// Callers normally pass `format.for_export()?` so the separator cannot collide with
/// the decimal mark.
///
/// # Errors
/// Returns `TsyncError::Csv` or `TsyncError::Io` when writing fails.
pub fn write_series<W: Write>(
    writer: W,
    series: &Series,
    format: &ResolvedFormat,
) -> Result<(), TsyncError> {
    let layout = TimestampLayout::canonical();
    let (delimiter, _) = format.separator.delimiter();
    let mut out = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    let keyed = series.is_keyed();
    let mut header: Vec<&str> = Vec::with_capacity(series.columns().len() + 1);
    if !keyed {
        header.push("time");
    }
    header.extend(series.columns().iter().map(String::as_str));
    out.write_record(&header).map_err(from_csv)?;

    for (t, row) in series.index().iter().zip(series.rows()) {
        let mut record: Vec<String> = Vec::with_capacity(row.len() + 1);
        if !keyed {
            record.push(layout.format(t.as_naive())?);
        }
        for cell in row {
            record.push(render(cell, &layout, format.decimal_point)?);
        }
        out.write_record(&record).map_err(from_csv)?;
    }
    out.flush()
        .map_err(|e| TsyncError::io("<stream>", e.to_string()))
}

/// Write `series` to a file at `path`. See [`write_series`].
///
/// # Errors
/// Returns `TsyncError::Io` if the file cannot be created, plus any error of
/// [`write_series`].
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "tsync_core::export::export_to_path",
        skip_all,
        fields(path = %path.display(), rows = series.len()),
        err,
    )
)]
pub fn export_to_path(
    path: &Path,
    series: &Series,
    format: &ResolvedFormat,
) -> Result<(), TsyncError> {
    let file = File::create(path).map_err(|e| from_io(path, &e))?;
    write_series(file, series, format)
}
