//! Error types for picobench-core
//!
//! Everything upstream of the report writer is recoverable and devolves to
//! `NA`/`undecided` cells (see [`crate::report`]); the writer is the only
//! step that can fail, so this enum has a single live variant.

use std::io;

/// Error type for [`crate::generate_report`].
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The report output stream rejected a write.
    #[error("failed to write report: {0}")]
    Output(#[from] io::Error),
}

/// Result type alias using [`EngineError`].
pub type Result<T> = std::result::Result<T, EngineError>;
