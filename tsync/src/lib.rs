//! tsync loads tabular time series whose export conventions are unknown, cleans them,
//! and aligns two of them on their common time span.
//!
//! Overview
//! - Detects the field separator and the timestamp layout of each file, or takes them
//!   from a [`FormatHint`].
//! - Accepts numeric time columns as seconds since a base date.
//! - Optionally drops placeholder rows, coarsens timestamps and replaces gross errors
//!   with a trailing-window mean.
//! - Trims two series to their overlap and, on request, resamples the shorter one so
//!   both can be joined row by row.
//!
//! Key behaviors and trade-offs
//! - Detection looks at one line (separator) and one value (layout). Mixed files fail
//!   fast with `FormatMismatch` instead of being guessed row by row.
//! - Resampling interpolates linearly. It fills the coarser series with values that
//!   were never measured; without it, both series keep their own cadence and the
//!   output holds two series of different lengths.
//! - Malformed rows abort the load by default; `RowPolicy::Skip` drops and counts them.
//!
//! Aligning a measurement with a reference recording:
//! ```rust,no_run
//! use std::path::Path;
//! use tsync::{Aligner, Output};
//!
//! let aligner = Aligner::builder()
//!     .sync_with("reference.csv")
//!     .resample(true)
//!     .build()?;
//! let aligned = aligner.run(Path::new("measurement.csv"))?;
//! if let Output::Joined(series) = &aligned.output {
//!     println!("{} aligned rows", series.len());
//! }
//! # Ok::<(), tsync::TsyncError>(())
//! ```
//!
//! The building blocks live in [`tsync_core`] and can be used directly.
#![warn(missing_docs)]

pub(crate) mod core;

pub use core::{Aligned, Aligner, AlignerBuilder, Output};

pub use tsync_core::{
    FilterConfig, FormatHint, Instant, LoadReport, ResolvedFormat, RowPolicy, Series,
    SyncReport, SyncSide, TimeRange, TimeTruncation, TsyncConfig, TsyncError, Value,
    WarmupPolicy,
};
