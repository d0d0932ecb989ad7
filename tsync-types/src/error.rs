use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the tsync workspace.
///
/// Covers format detection failures, row-shape problems, alignment failures and the
/// ambient I/O and argument errors. Every variant carries owned strings so the error
/// can be cloned, compared and serialized alongside reports.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TsyncError {
    /// No candidate timestamp layout parses the sample.
    #[error("unknown timestamp format: {sample:?}")]
    UnknownTimestampFormat {
        /// The text that could not be matched against any layout.
        sample: String,
    },

    /// No candidate separator occurs in the sample line.
    #[error("unknown separator in line: {sample:?}")]
    UnknownSeparator {
        /// The line that was scanned.
        sample: String,
    },

    /// A row has a different field count than the header.
    #[error("malformed row at line {line}: expected {expected} fields, found {found}")]
    MalformedRow {
        /// 1-based line number in the source text.
        line: u64,
        /// Field count of the header.
        expected: usize,
        /// Field count of the offending row.
        found: usize,
    },

    /// A value does not conform to the layout chosen for its column.
    #[error("timestamp {text:?} does not match layout {layout:?}")]
    FormatMismatch {
        /// Offending text.
        text: String,
        /// Layout pattern the text was parsed with.
        layout: String,
    },

    /// Two series' time ranges do not intersect.
    #[error("no overlap: {detail}")]
    NoOverlap {
        /// Human-readable description of both ranges.
        detail: String,
    },

    /// Resampling was requested with fewer than two target points.
    #[error("invalid resample length: {requested} (must be at least 2)")]
    InvalidResampleLength {
        /// The requested number of points.
        requested: usize,
    },

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Issues with the data itself (empty input, missing rows, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// Reading or writing a file failed.
    #[error("i/o error on {path}: {msg}")]
    Io {
        /// Path involved, or `<stream>` for non-file readers and writers.
        path: String,
        /// Underlying error message.
        msg: String,
    },

    /// The delimited-text reader or writer failed.
    #[error("csv error: {0}")]
    Csv(String),
}

impl TsyncError {
    /// Helper: build an `UnknownTimestampFormat` error for a sample string.
    pub fn unknown_timestamp(sample: impl Into<String>) -> Self {
        Self::UnknownTimestampFormat {
            sample: sample.into(),
        }
    }

    /// Helper: build an `UnknownSeparator` error for a sample line.
    pub fn unknown_separator(sample: impl Into<String>) -> Self {
        Self::UnknownSeparator {
            sample: sample.into(),
        }
    }

    /// Helper: build a `FormatMismatch` error.
    pub fn format_mismatch(text: impl Into<String>, layout: impl Into<String>) -> Self {
        Self::FormatMismatch {
            text: text.into(),
            layout: layout.into(),
        }
    }

    /// Helper: build a `NoOverlap` error.
    pub fn no_overlap(detail: impl Into<String>) -> Self {
        Self::NoOverlap {
            detail: detail.into(),
        }
    }

    /// Helper: build an `InvalidArg` error.
    pub fn invalid_arg(msg: impl Into<String>) -> Self {
        Self::InvalidArg(msg.into())
    }

    /// Helper: build an `Io` error for a path.
    pub fn io(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Io {
            path: path.into(),
            msg: msg.into(),
        }
    }

    /// Whether the error stems from the input's format rather than its content.
    #[must_use]
    pub const fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownTimestampFormat { .. }
                | Self::UnknownSeparator { .. }
                | Self::MalformedRow { .. }
                | Self::FormatMismatch { .. }
        )
    }
}
