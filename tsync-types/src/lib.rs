//! tsync-specific error taxonomy and configuration primitives shared by every crate
//! in the workspace.
#![warn(missing_docs)]

mod config;
mod error;

pub use config::{FilterConfig, FormatHint, RowPolicy, TimeTruncation, TsyncConfig, WarmupPolicy};
pub use error::TsyncError;
