//! Error types for record emission.

use thiserror::Error;

/// A handler failed to emit a record.
///
/// This is the only error a handler returns. The router passes it back to
/// the caller unchanged.
#[derive(Debug, Error)]
pub enum LogError {
    /// Writing the rendered record to the output stream failed.
    #[error("failed to write log record: {0}")]
    Write(#[from] std::io::Error),
}

/// Result type for handler operations.
pub type LogResult<T> = Result<T, LogError>;
