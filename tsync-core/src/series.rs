use serde::{Deserialize, Serialize};
use tsync_types::TsyncError;

use crate::instant::{Instant, TimeRange};

/// A single cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Numeric cell, decimal mark already normalized.
    Number(f64),
    /// Anything that did not parse as a number.
    Text(String),
    /// Parsed timestamp; used by the time column.
    Time(Instant),
}

impl Value {
    /// Numeric content, if any.
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Timestamp content, if any.
    #[must_use]
    pub const fn as_instant(&self) -> Option<Instant> {
        match self {
            Self::Time(t) => Some(*t),
            _ => None,
        }
    }
}

/// One record, one cell per column.
pub type Row = Vec<Value>;

/// Time-indexed table.
///
/// Invariants upheld by every constructor and transform:
/// - every row has one cell per column;
/// - `index` has one entry per row and never decreases (ties keep the order read);
/// - a *keyed* series stores the index again as `Value::Time` in column 0.
///
/// A series is never edited in place. Transforms take it by value and build a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    columns: Vec<String>,
    index: Vec<Instant>,
    rows: Vec<Row>,
    keyed: bool,
}

impl Series {
    /// Build a keyed series whose first column holds the row timestamps.
    ///
    /// # Errors
    /// Returns `TsyncError::Data` if a row has the wrong width, a first cell is not
    /// `Value::Time`, or the timestamps decrease.
    pub fn keyed(columns: Vec<String>, rows: Vec<Row>) -> Result<Self, TsyncError> {
        if columns.is_empty() {
            return Err(TsyncError::Data("keyed series needs a time column".into()));
        }
        let mut index = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let t = row.first().and_then(Value::as_instant).ok_or_else(|| {
                TsyncError::Data(format!("row {i} has no timestamp in the time column"))
            })?;
            index.push(t);
        }
        Self::checked(columns, index, rows, true)
    }

    /// Build an unkeyed series from explicit timestamps.
    ///
    /// # Errors
    /// Returns `TsyncError::Data` if lengths disagree or the timestamps decrease.
    pub fn indexed(
        columns: Vec<String>,
        index: Vec<Instant>,
        rows: Vec<Row>,
    ) -> Result<Self, TsyncError> {
        Self::checked(columns, index, rows, false)
    }

    fn checked(
        columns: Vec<String>,
        index: Vec<Instant>,
        rows: Vec<Row>,
        keyed: bool,
    ) -> Result<Self, TsyncError> {
        if index.len() != rows.len() {
            return Err(TsyncError::Data(format!(
                "index has {} entries for {} rows",
                index.len(),
                rows.len()
            )));
        }
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != columns.len())
        {
            return Err(TsyncError::Data(format!(
                "row {i} has {} cells, expected {}",
                row.len(),
                columns.len()
            )));
        }
        if let Some(i) = index.windows(2).position(|w| w[1] < w[0]) {
            return Err(TsyncError::Data(format!(
                "timestamps decrease at row {}: {} after {}",
                i + 1,
                index[i + 1],
                index[i]
            )));
        }
        Ok(Self {
            columns,
            index,
            rows,
            keyed,
        })
    }

    /// Assemble a series from parts whose invariants the caller already upholds.
    pub(crate) fn from_parts(
        columns: Vec<String>,
        index: Vec<Instant>,
        rows: Vec<Row>,
        keyed: bool,
    ) -> Self {
        debug_assert_eq!(index.len(), rows.len());
        debug_assert!(index.windows(2).all(|w| w[0] <= w[1]));
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        Self {
            columns,
            index,
            rows,
            keyed,
        }
    }

    /// Split into `(columns, index, rows, keyed)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Vec<Instant>, Vec<Row>, bool) {
        (self.columns, self.index, self.rows, self.keyed)
    }

    /// Column names.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Row timestamps.
    #[must_use]
    pub fn index(&self) -> &[Instant] {
        &self.index
    }

    /// Rows in time order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the series has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether column 0 mirrors the index.
    #[must_use]
    pub const fn is_keyed(&self) -> bool {
        self.keyed
    }

    /// Name of the time column, if the series is keyed.
    #[must_use]
    pub fn time_column(&self) -> Option<&str> {
        if self.keyed {
            self.columns.first().map(String::as_str)
        } else {
            None
        }
    }

    /// Position of a column by name.
    #[must_use]
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Position of the first column that is not the time column.
    #[must_use]
    pub fn first_value_column(&self) -> Option<usize> {
        let pos = usize::from(self.keyed);
        (pos < self.columns.len()).then_some(pos)
    }

    /// Resolve a column by name, or fall back to the first value column.
    ///
    /// # Errors
    /// Returns `TsyncError::InvalidArg` if the column does not exist.
    pub fn resolve_value_column(&self, name: Option<&str>) -> Result<usize, TsyncError> {
        match name {
            Some(n) => self
                .column_position(n)
                .ok_or_else(|| TsyncError::invalid_arg(format!("unknown column {n:?}"))),
            None => self
                .first_value_column()
                .ok_or_else(|| TsyncError::invalid_arg("series has no value column")),
        }
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, pos: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().filter_map(move |r| r.get(pos))
    }

    /// First and last timestamps as stored, `None` for an empty series.
    #[must_use]
    pub fn bounds(&self) -> Option<(Instant, Instant)> {
        Some((*self.index.first()?, *self.index.last()?))
    }

    /// Keep only the rows whose timestamp lies within `range`.
    #[must_use]
    pub fn trim(self, range: &TimeRange) -> Self {
        self.retain(|t, _| range.contains(t))
    }

    /// Keep the rows for which `keep` returns true.
    pub(crate) fn retain<F>(self, mut keep: F) -> Self
    where
        F: FnMut(Instant, &Row) -> bool,
    {
        let (index, rows): (Vec<Instant>, Vec<Row>) = self
            .index
            .into_iter()
            .zip(self.rows)
            .filter(|(t, r)| keep(*t, r))
            .unzip();
        Self::from_parts(self.columns, index, rows, self.keyed)
    }

    /// Map every timestamp through a non-decreasing function, rewriting the time column.
    pub(crate) fn map_index<F>(self, f: F) -> Self
    where
        F: Fn(Instant) -> Instant,
    {
        let keyed = self.keyed;
        let index: Vec<Instant> = self.index.into_iter().map(&f).collect();
        let rows = if keyed {
            self.rows
                .into_iter()
                .zip(&index)
                .map(|(mut row, t)| {
                    row[0] = Value::Time(*t);
                    row
                })
                .collect()
        } else {
            self.rows
        };
        Self::from_parts(self.columns, index, rows, keyed)
    }

    /// Remove the time column; the index keeps carrying time.
    #[must_use]
    pub fn drop_time_column(self) -> Self {
        if !self.keyed {
            return self;
        }
        let columns = self.columns.into_iter().skip(1).collect();
        let rows = self
            .rows
            .into_iter()
            .map(|r| r.into_iter().skip(1).collect())
            .collect();
        Self::from_parts(columns, self.index, rows, false)
    }
}
