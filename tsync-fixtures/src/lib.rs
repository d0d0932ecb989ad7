//! Deterministic signal files for CI-safe tests and examples.
//!
//! Nothing here touches the network or the clock; the same inputs always render to the
//! same text.

use std::fmt::Write as _;
use std::path::Path;

use chrono::NaiveDateTime;
use tsync_core::{Instant, TsyncError, offset_instant};

mod fixtures;

pub use fixtures::{gaps, ramp, sentinel, spike};

/// A uniformly sampled signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    /// Column header of the samples.
    pub label: String,
    /// Samples per second.
    pub sample_rate: f64,
    /// Time of the first sample, in seconds.
    pub start_s: f64,
    /// Sample values.
    pub samples: Vec<f64>,
}

/// How the time column is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeAxis {
    /// Seconds with four decimals.
    #[default]
    Relative,
    /// `base + seconds` in the `%Y-%m-%d %H:%M:%S.%f` layout.
    Absolute(NaiveDateTime),
}

/// Options for [`Signal::render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Field separator text.
    pub separator: String,
    /// Write `,` instead of `.` in numbers.
    pub decimal_comma: bool,
    /// Time column style.
    pub time: TimeAxis,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            separator: ";".into(),
            decimal_comma: false,
            time: TimeAxis::Relative,
        }
    }
}

impl RenderOptions {
    /// Use `separator` between the two columns.
    #[must_use]
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Write numbers with a decimal comma.
    #[must_use]
    pub const fn decimal_comma(mut self, on: bool) -> Self {
        self.decimal_comma = on;
        self
    }

    /// Write absolute timestamps counted from `base`.
    #[must_use]
    pub const fn absolute(mut self, base: NaiveDateTime) -> Self {
        self.time = TimeAxis::Absolute(base);
        self
    }
}

impl Signal {
    /// Signal whose sample `k` lies at `start_s + k / sample_rate` seconds.
    #[must_use]
    pub fn new(label: impl Into<String>, sample_rate: f64, start_s: f64, samples: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            sample_rate,
            start_s,
            samples,
        }
    }

    /// Time of sample `k` in seconds.
    #[must_use]
    pub fn time_of(&self, k: usize) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let k = k as f64;
        self.start_s + k / self.sample_rate
    }

    /// Render as delimited text: a `Time[s]` + label header, then one line per sample.
    ///
    /// # Errors
    /// Returns `TsyncError::InvalidArg`/`TsyncError::Data` if an absolute timestamp
    /// cannot be computed.
    pub fn render(&self, opts: &RenderOptions) -> Result<String, TsyncError> {
        let number = |text: String| {
            if opts.decimal_comma {
                text.replace('.', ",")
            } else {
                text
            }
        };
        let mut out = format!("Time[s]{}{}\n", opts.separator, self.label);
        for (k, v) in self.samples.iter().enumerate() {
            let secs = self.time_of(k);
            let time = match opts.time {
                TimeAxis::Relative => number(format!("{secs:.4}")),
                TimeAxis::Absolute(base) => offset_instant(Instant::new(base), secs)?.to_string(),
            };
            let _ = writeln!(out, "{time}{}{}", opts.separator, number(format!("{v:.2}")));
        }
        Ok(out)
    }

    /// Render into a file at `path`.
    ///
    /// # Errors
    /// Returns the errors of [`Signal::render`] and `TsyncError::Io` if writing fails.
    pub fn write_to(&self, path: &Path, opts: &RenderOptions) -> Result<(), TsyncError> {
        let text = self.render(opts)?;
        std::fs::write(path, text)
            .map_err(|e| TsyncError::io(path.display().to_string(), e.to_string()))
    }
}
