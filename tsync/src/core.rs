use std::path::{Path, PathBuf};

use tsync_core::{
    LoadReport, Separator, Series, SyncReport, Synchronized, export_to_path, filter_column,
    load, remove_equal_to, synchronize, truncate_times,
};
use tsync_types::{FilterConfig, FormatHint, RowPolicy, TimeTruncation, TsyncConfig, TsyncError};

/// Loads one or two files and runs the configured cleaning and alignment stages.
#[derive(Debug, Clone)]
pub struct Aligner {
    pub(crate) cfg: TsyncConfig,
}

/// Builder for constructing an [`Aligner`] with custom configuration.
#[derive(Debug, Clone)]
pub struct AlignerBuilder {
    cfg: TsyncConfig,
}

impl Default for AlignerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AlignerBuilder {
    /// Create a new builder with defaults.
    ///
    /// Defaults: detect separator and timestamp layout, `.` as decimal mark, abort on
    /// malformed rows, no filter, no second file, no resampling, no truncation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cfg: TsyncConfig::default(),
        }
    }

    /// Replace the whole configuration, e.g. one deserialized from a file.
    #[must_use]
    pub fn config(mut self, cfg: TsyncConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Replace the parsing hint applied to every input file.
    #[must_use]
    pub fn hint(mut self, hint: FormatHint) -> Self {
        self.cfg.hint = hint;
        self
    }

    /// Use this field separator instead of detecting one.
    #[must_use]
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.cfg.hint.separator = Some(separator.into());
        self
    }

    /// Decimal mark of numeric cells.
    #[must_use]
    pub const fn decimal_point(mut self, mark: char) -> Self {
        self.cfg.hint.decimal_point = Some(mark);
        self
    }

    /// Parse the time column with this chrono pattern instead of detecting a layout.
    #[must_use]
    pub fn timestamp_layout(mut self, pattern: impl Into<String>) -> Self {
        self.cfg.hint.timestamp_layout = Some(pattern.into());
        self
    }

    /// Base date of numeric (seconds) time columns.
    #[must_use]
    pub fn base_date(mut self, base: impl Into<String>) -> Self {
        self.cfg.hint.base_date = Some(base.into());
        self
    }

    /// Malformed-row handling.
    #[must_use]
    pub const fn row_policy(mut self, policy: RowPolicy) -> Self {
        self.cfg.row_policy = policy;
        self
    }

    /// Enable the gross-error filter.
    #[must_use]
    pub fn filter(mut self, filter: FilterConfig) -> Self {
        self.cfg.filter = Some(filter);
        self
    }

    /// Synchronize the primary file with the file at `path`.
    #[must_use]
    pub fn sync_with(mut self, path: impl Into<PathBuf>) -> Self {
        self.cfg.sync_with = Some(path.into());
        self
    }

    /// Resample the shorter series during synchronization and join both row by row.
    #[must_use]
    pub const fn resample(mut self, yes: bool) -> Self {
        self.cfg.resample = yes;
        self
    }

    /// Drop rows whose value column equals `value` before any other stage.
    #[must_use]
    pub const fn remove_equal_to(mut self, value: f64) -> Self {
        self.cfg.remove_equal_to = Some(value);
        self
    }

    /// Coarsen timestamps after loading.
    #[must_use]
    pub const fn truncation(mut self, truncation: TimeTruncation) -> Self {
        self.cfg.truncation = truncation;
        self
    }

    /// Build the [`Aligner`].
    ///
    /// # Errors
    /// Returns `InvalidArg` if the separator hint is not a valid separator, the filter
    /// window is zero, the removal value is not finite, or resampling is requested
    /// without a second file.
    pub fn build(self) -> Result<Aligner, TsyncError> {
        if let Some(sep) = &self.cfg.hint.separator {
            Separator::new(sep.clone())?;
        }
        if self.cfg.filter.as_ref().is_some_and(|f| f.window == 0) {
            return Err(TsyncError::invalid_arg("filter window must be at least 1"));
        }
        if self.cfg.remove_equal_to.is_some_and(|v| !v.is_finite()) {
            return Err(TsyncError::invalid_arg(
                "remove_equal_to needs a finite value",
            ));
        }
        if self.cfg.resample && self.cfg.sync_with.is_none() {
            return Err(TsyncError::invalid_arg(
                "resampling needs a second file; set one via sync_with(...)",
            ));
        }
        Ok(Aligner { cfg: self.cfg })
    }
}

/// Data produced by [`Aligner::run`].
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// The cleaned primary series; no second file was configured.
    Single(Series),
    /// Both series resampled to one length and joined row by row.
    Joined(Series),
    /// Both series trimmed to their overlap, lengths untouched.
    Overlaid {
        /// Trimmed primary series.
        a: Series,
        /// Trimmed secondary series.
        b: Series,
    },
}

/// Result of one [`Aligner::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct Aligned {
    /// Load report of the primary file.
    pub primary: LoadReport,
    /// Load report of the second file, if one was configured.
    pub secondary: Option<LoadReport>,
    /// Synchronization diagnostics, if a second file was configured.
    pub sync: Option<SyncReport>,
    /// The aligned data.
    pub output: Output,
}

impl Aligned {
    /// Write a single or joined output to `path`, using the primary file's separator
    /// and decimal mark (with the separator moved off the decimal mark if they collide).
    ///
    /// # Errors
    /// Returns `InvalidArg` for overlaid output, whose two series have different
    /// lengths; write each side with [`tsync_core::export_to_path`] instead. Otherwise
    /// returns the errors of [`tsync_core::export_to_path`].
    pub fn export(&self, path: &Path) -> Result<(), TsyncError> {
        let series = match &self.output {
            Output::Single(s) | Output::Joined(s) => s,
            Output::Overlaid { .. } => {
                return Err(TsyncError::invalid_arg(
                    "overlaid output holds two series; export each side separately",
                ));
            }
        };
        let format = self.primary.format.clone().for_export()?;
        export_to_path(path, series, &format)
    }
}

impl Aligner {
    /// Start building a new `Aligner`.
    ///
    /// ```rust,no_run
    /// use std::path::Path;
    /// use tsync::{Aligner, FilterConfig};
    ///
    /// let aligner = Aligner::builder()
    ///     .decimal_point(',')
    ///     .separator(";")
    ///     .filter(FilterConfig::default())
    ///     .sync_with("reference.csv")
    ///     .resample(true)
    ///     .build()?;
    /// let aligned = aligner.run(Path::new("measurement.csv"))?;
    /// aligned.export(Path::new("aligned.csv"))?;
    /// # Ok::<(), tsync::TsyncError>(())
    /// ```
    #[must_use]
    pub fn builder() -> AlignerBuilder {
        AlignerBuilder::new()
    }

    /// The configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &TsyncConfig {
        &self.cfg
    }

    /// Load `primary`, clean it, and synchronize it with the configured second file.
    ///
    /// Stage order per file: load, remove-equal-to, truncate, filter. Both files use
    /// the same hint and row policy.
    ///
    /// # Errors
    /// Propagates the first error of any stage.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "tsync::core::run",
            skip_all,
            fields(
                primary = %primary.display(),
                secondary = ?self.cfg.sync_with,
                resample = self.cfg.resample,
            ),
            err,
        )
    )]
    pub fn run(&self, primary: &Path) -> Result<Aligned, TsyncError> {
        let (a, primary_report) = self.prepare(primary)?;
        let Some(second) = &self.cfg.sync_with else {
            return Ok(Aligned {
                primary: primary_report,
                secondary: None,
                sync: None,
                output: Output::Single(a),
            });
        };

        let (b, secondary_report) = self.prepare(second)?;
        let outcome = synchronize(a, b, self.cfg.resample)?;
        let output = match outcome.aligned {
            Synchronized::Joined(s) => Output::Joined(s),
            Synchronized::Overlaid { a, b } => Output::Overlaid { a, b },
        };
        Ok(Aligned {
            primary: primary_report,
            secondary: Some(secondary_report),
            sync: Some(outcome.report),
            output,
        })
    }

    /// Load one file and apply the per-file stages.
    fn prepare(&self, path: &Path) -> Result<(Series, LoadReport), TsyncError> {
        let loaded = load(path, &self.cfg.hint, self.cfg.row_policy)?;
        let mut series = loaded.series;

        if let Some(value) = self.cfg.remove_equal_to {
            #[cfg(feature = "tracing")]
            let before = series.len();
            series = remove_equal_to(series, None, value)?;
            #[cfg(feature = "tracing")]
            tracing::debug!(
                path = %path.display(),
                value,
                removed = before - series.len(),
                "removed placeholder rows"
            );
        }

        series = truncate_times(series, self.cfg.truncation);

        if let Some(f) = &self.cfg.filter {
            series = filter_column(series, f.column.as_deref(), f.window, f.warmup)?;
        }
        Ok((series, loaded.report))
    }
}
