//! tsync-core
//!
//! Loading, normalization and alignment of tabular time series recorded with
//! unknown export conventions.
//!
//! - `format`: separator and timestamp-layout detection.
//! - `timestamp`: turning text (or a base date plus elapsed seconds) into an `Instant`.
//! - `loader`: delimited text to a time-indexed `Series`.
//! - `timeseries`: gross-error filtering, resampling, synchronization and row utilities.
//! - `export`: writing a `Series` back to delimited text.
//!
//! Every transform takes a `Series` by value and returns a new one. Nothing here is
//! asynchronous or shared between threads.
#![warn(missing_docs)]

mod error;
/// Separator and timestamp-layout detection.
pub mod format;
/// Delimited-text writer for series.
pub mod export;
/// Uniform points in time and time ranges.
pub mod instant;
/// Delimited-text loader.
pub mod loader;
/// Time-indexed tabular data.
pub mod series;
/// Timestamp parsing with layout fallback and offset mode.
pub mod timestamp;
/// Filtering, resampling and synchronization of series.
pub mod timeseries;

pub use export::{export_to_path, write_series};
pub use format::{
    ResolvedFormat, SEPARATOR_CANDIDATES, Separator, TIMESTAMP_LAYOUTS, TimestampLayout,
    determine_datetime_format, determine_separator,
};
pub use instant::{Instant, TimeRange};
pub use loader::{LoadReport, Loaded, load, load_str};
pub use series::{Row, Series, Value};
pub use timeseries::filter::{filter_column, filter_window};
pub use timeseries::infer::nominal_interval;
pub use timeseries::resample::resample;
pub use timeseries::sync::{
    SyncOutcome, SyncReport, SyncSide, Synchronized, overlap_range, synchronize,
};
pub use timeseries::util::{remove_equal_to, truncate_times};
pub use timestamp::{offset_instant, parse_instant, str_date_to_instant};
pub use tsync_types::*;
