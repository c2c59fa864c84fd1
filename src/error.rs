//! Error types for yieldtab library.

use std::io;
use thiserror::Error;

/// Result type alias for yieldtab operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur around a parse.
///
/// Content problems inside the text dump are never reported here; they are
/// counted in [`ParseStats`](crate::parser::ParseStats) instead.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A configured pattern failed to compile.
    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    /// JSON could not be read or written.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error during rendering (JSON, script).
    #[error("Rendering error: {0}")]
    Render(String),

    /// A script file does not hold the expected constant assignment.
    #[error("Script format error: {0}")]
    ScriptFormat(String),

    /// A stored yield entry cannot be read back into a record.
    #[error("Invalid record for {entity} / {description}: {reason}")]
    InvalidRecord {
        /// Entity key of the offending entry
        entity: String,
        /// Product description of the offending entry
        description: String,
        /// What was wrong with it
        reason: String,
    },
}
