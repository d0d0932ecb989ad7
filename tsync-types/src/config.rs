//! Configuration types shared by the loader, the transforms and the orchestrator.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Caller-supplied parsing configuration. Unset fields are detected from the input.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FormatHint {
    /// Field separator, e.g. `";"` or `", "`. Detected from the first data line when unset.
    pub separator: Option<String>,
    /// Decimal mark used by numeric cells. Defaults to `.` when unset.
    pub decimal_point: Option<char>,
    /// Explicit `strftime`-style timestamp layout for the time column.
    pub timestamp_layout: Option<String>,
    /// Base date; when set, a numeric time column is read as seconds elapsed since it.
    pub base_date: Option<String>,
}

impl FormatHint {
    /// Hint with an explicit separator.
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    /// Hint with an explicit decimal mark.
    #[must_use]
    pub const fn with_decimal_point(mut self, mark: char) -> Self {
        self.decimal_point = Some(mark);
        self
    }

    /// Hint with an explicit timestamp layout.
    #[must_use]
    pub fn with_timestamp_layout(mut self, layout: impl Into<String>) -> Self {
        self.timestamp_layout = Some(layout.into());
        self
    }

    /// Hint with a base date for offset-mode time columns.
    #[must_use]
    pub fn with_base_date(mut self, base: impl Into<String>) -> Self {
        self.base_date = Some(base.into());
        self
    }
}

/// What the loader does with a row whose field count differs from the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum RowPolicy {
    /// Fail the whole load on the first malformed row.
    #[default]
    Abort,
    /// Drop the row, log it and keep loading.
    Skip,
}

/// Treatment of the first `N - 1` rows, which have no full trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum WarmupPolicy {
    /// Keep the original values unchanged.
    #[default]
    PassThrough,
    /// Remove the rows from the output.
    Drop,
    /// Apply the filter to the shorter window that is available.
    PartialWindow,
}

/// Gross-error filter settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Trailing window size, including the sample under test. Must be at least 1.
    pub window: usize,
    /// Column to filter. Defaults to the first column after the time column.
    pub column: Option<String>,
    /// Warm-up handling.
    pub warmup: WarmupPolicy,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            window: 5,
            column: None,
            warmup: WarmupPolicy::PassThrough,
        }
    }
}

/// Coarsening applied to every timestamp after loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TimeTruncation {
    /// Keep timestamps as parsed.
    #[default]
    None,
    /// Drop fractional seconds.
    Subseconds,
    /// Drop the time of day, keeping the date at midnight.
    Date,
}

/// Global configuration for the `tsync` aligner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TsyncConfig {
    /// Parsing configuration applied to every input file.
    pub hint: FormatHint,
    /// Malformed-row handling for every input file.
    pub row_policy: RowPolicy,
    /// Optional gross-error filter applied to each loaded series.
    pub filter: Option<FilterConfig>,
    /// Second file to synchronize the primary series with.
    pub sync_with: Option<PathBuf>,
    /// Resample the shorter series so both can be joined row by row.
    pub resample: bool,
    /// Drop rows whose value column equals this value.
    pub remove_equal_to: Option<f64>,
    /// Timestamp coarsening applied after loading.
    pub truncation: TimeTruncation,
}

impl Default for TsyncConfig {
    fn default() -> Self {
        Self {
            hint: FormatHint::default(),
            row_policy: RowPolicy::Abort,
            filter: None,
            sync_with: None,
            resample: false,
            remove_equal_to: None,
            truncation: TimeTruncation::None,
        }
    }
}
