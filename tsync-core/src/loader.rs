use std::borrow::Cow;
use std::path::Path;

use tsync_types::{FormatHint, RowPolicy, TsyncError};

use crate::error::{from_csv, from_io};
use crate::format::{
    ResolvedFormat, Separator, TimestampLayout, determine_datetime_format, determine_separator,
};
use crate::instant::Instant;
use crate::series::{Row, Series, Value};
use crate::timestamp::{offset_instant, parse_instant, str_date_to_instant};

/// What the loader resolved and how many rows it used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// File path, or `<memory>` for in-memory text.
    pub source: String,
    /// Separator and decimal mark in effect.
    pub format: ResolvedFormat,
    /// Layout of a textual time column; `None` for numeric time columns.
    pub layout: Option<TimestampLayout>,
    /// Base instant of a numeric time column.
    pub offset_base: Option<Instant>,
    /// Data rows kept.
    pub rows_read: usize,
    /// Malformed rows dropped under `RowPolicy::Skip`.
    pub rows_skipped: usize,
}

/// A loaded series together with its load report.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    /// The time-indexed series, keyed by its first column.
    pub series: Series,
    /// What was detected while loading.
    pub report: LoadReport,
}

enum TimeMode {
    Layout(TimestampLayout),
    Offset(Instant),
}

/// Load a delimited text file into a keyed series.
///
/// - The separator comes from `hint` or is detected on the first data line.
/// - A textual first column is parsed with the hinted layout, or the layout detected
///   from its first value. A numeric first column holds seconds since `hint.base_date`
///   (or since the Unix epoch when no base date is given).
/// - Rows are stably sorted by time.
///
/// # Errors
/// - `TsyncError::Io` if the file cannot be read.
/// - `TsyncError::UnknownSeparator` / `TsyncError::UnknownTimestampFormat` when
///   detection fails.
/// - `TsyncError::MalformedRow` for a row of the wrong width under `RowPolicy::Abort`.
/// - `TsyncError::FormatMismatch` when a later time value does not fit the layout.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "tsync_core::loader::load",
        skip_all,
        fields(path = %path.display(), policy = ?policy),
        err,
    )
)]
pub fn load(path: &Path, hint: &FormatHint, policy: RowPolicy) -> Result<Loaded, TsyncError> {
    let text = std::fs::read_to_string(path).map_err(|e| from_io(path, &e))?;
    load_text(path.display().to_string(), &text, hint, policy)
}

/// Load delimited text already held in memory. See [`load`].
///
/// # Errors
/// Same as [`load`], minus I/O failures.
pub fn load_str(text: &str, hint: &FormatHint, policy: RowPolicy) -> Result<Loaded, TsyncError> {
    load_text("<memory>".into(), text, hint, policy)
}

fn load_text(
    source: String,
    text: &str,
    hint: &FormatHint,
    policy: RowPolicy,
) -> Result<Loaded, TsyncError> {
    let mut lines = text.lines();
    let header = lines
        .next()
        .filter(|l| !l.trim().is_empty())
        .ok_or_else(|| TsyncError::Data(format!("{source}: no header line")))?;

    let separator = match &hint.separator {
        Some(s) => Separator::new(s.clone())?,
        // Header-only input falls back to the header line.
        None => determine_separator(
            lines.find(|l| !l.trim().is_empty()).unwrap_or(header),
        )?,
    };
    let decimal_point = hint.decimal_point.unwrap_or('.');
    let (delimiter, trim) = separator.delimiter();

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(if trim { csv::Trim::All } else { csv::Trim::None })
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(from_csv)?
        .iter()
        .map(str::to_string)
        .collect();
    let expected = columns.len();

    let mut records: Vec<(u64, csv::StringRecord)> = Vec::new();
    let mut rows_skipped = 0usize;
    for result in reader.records() {
        let record = result.map_err(from_csv)?;
        let line = record.position().map_or(0, csv::Position::line);
        if record.len() != expected {
            if matches!(policy, RowPolicy::Abort) {
                return Err(TsyncError::MalformedRow {
                    line,
                    expected,
                    found: record.len(),
                });
            }
            rows_skipped += 1;
            #[cfg(feature = "tracing")]
            tracing::warn!(
                source = %source,
                line,
                expected,
                found = record.len(),
                "skipping malformed row"
            );
            continue;
        }
        records.push((line, record));
    }

    let mode = match records.first() {
        None => None,
        Some((_, first)) => Some(time_mode(&first[0], hint, decimal_point)?),
    };

    let mut stamped: Vec<(Instant, Row)> = Vec::with_capacity(records.len());
    if let Some(mode) = &mode {
        for (line, record) in &records {
            let t = match mode {
                TimeMode::Layout(layout) => parse_instant(&record[0], layout),
                TimeMode::Offset(base) => parse_number(&record[0], decimal_point)
                    .ok_or_else(|| TsyncError::format_mismatch(&record[0], "seconds"))
                    .and_then(|secs| offset_instant(*base, secs)),
            }
            .map_err(|e| match e {
                TsyncError::FormatMismatch { text, layout } => TsyncError::FormatMismatch {
                    text: format!("{text} (line {line})"),
                    layout,
                },
                other => other,
            })?;
            let mut row: Row = Vec::with_capacity(expected);
            row.push(Value::Time(t));
            row.extend(record.iter().skip(1).map(|cell| cell_value(cell, decimal_point)));
            stamped.push((t, row));
        }
    }
    // Stable: ties keep the order they were read in.
    stamped.sort_by_key(|(t, _)| *t);
    let rows_read = stamped.len();
    let series = Series::keyed(columns, stamped.into_iter().map(|(_, r)| r).collect())?;

    let (layout, offset_base) = match mode {
        Some(TimeMode::Layout(l)) => (Some(l), None),
        Some(TimeMode::Offset(b)) => (None, Some(b)),
        None => (None, None),
    };

    #[cfg(feature = "tracing")]
    tracing::debug!(
        source = %source,
        separator = ?separator.as_str(),
        decimal_point = %decimal_point,
        layout = ?layout.as_ref().map(TimestampLayout::pattern),
        rows_read,
        rows_skipped,
        "loaded series"
    );

    Ok(Loaded {
        series,
        report: LoadReport {
            source,
            format: ResolvedFormat {
                separator,
                decimal_point,
            },
            layout,
            offset_base,
            rows_read,
            rows_skipped,
        },
    })
}

fn time_mode(first: &str, hint: &FormatHint, decimal_point: char) -> Result<TimeMode, TsyncError> {
    if let Some(pattern) = &hint.timestamp_layout {
        return Ok(TimeMode::Layout(TimestampLayout::from_pattern(pattern)));
    }
    if parse_number(first, decimal_point).is_some() {
        let base = match &hint.base_date {
            Some(b) => str_date_to_instant(b)?,
            None => Instant::unix_epoch(),
        };
        return Ok(TimeMode::Offset(base));
    }
    determine_datetime_format(first).map(TimeMode::Layout)
}

fn parse_number(cell: &str, decimal_point: char) -> Option<f64> {
    let cell = cell.trim();
    let normalized: Cow<'_, str> = if decimal_point == '.' {
        Cow::Borrowed(cell)
    } else {
        Cow::Owned(cell.replace(decimal_point, "."))
    };
    normalized.parse().ok()
}

fn cell_value(cell: &str, decimal_point: char) -> Value {
    parse_number(cell, decimal_point).map_or_else(|| Value::Text(cell.to_string()), Value::Number)
}
