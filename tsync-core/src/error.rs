//! Conversions from third-party errors into `TsyncError`.

use std::path::Path;

use tsync_types::TsyncError;

pub fn from_csv(err: csv::Error) -> TsyncError {
    match err.kind() {
        csv::ErrorKind::Io(io) => TsyncError::io("<stream>", io.to_string()),
        _ => TsyncError::Csv(err.to_string()),
    }
}

pub fn from_io(path: &Path, err: &std::io::Error) -> TsyncError {
    TsyncError::io(path.display().to_string(), err.to_string())
}
