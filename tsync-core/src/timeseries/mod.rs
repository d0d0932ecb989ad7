//! Transforms over loaded series.
//!
//! Modules include:
//! - `filter`: trailing-window gross-error suppression
//! - `infer`: nominal sample interval
//! - `resample`: uniform re-gridding by linear interpolation
//! - `sync`: overlap, trim, resample and join of two series
//! - `util`: row removal and timestamp truncation
/// Gross-error filter.
pub mod filter;
/// Sample-interval inference used for reporting.
pub mod infer;
/// Resampling onto a uniform time axis.
pub mod resample;
/// Two-series synchronization.
pub mod sync;
/// Row and timestamp utilities.
pub mod util;
