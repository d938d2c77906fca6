//! Unified error type for steadyforge.
//!
//! Only failures that stop the whole batch are modelled here. A stage that
//! fails for a single file is ordinary control flow and never becomes an
//! [`Error`]. Each variant maps to a process exit code via
//! [`Error::exit_code`].

use std::path::Path;

/// Unified error type covering the fatal failure modes of a batch run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The batch cannot start: bad directory, unwritable output, etc.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// An external tool (ffmpeg) is missing or could not be run.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to the process exit code used by the CLI.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Config(_) => 2,
            Error::Tool { .. } => 3,
            Error::Io { .. } => 1,
            Error::Internal(_) => 1,
        }
    }

    /// Convenience constructor for [`Error::Config`].
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Configuration error about a directory, carrying the underlying cause.
    pub fn directory(what: &str, path: &Path, source: impl std::fmt::Display) -> Self {
        Error::Config(format!("{what} {}: {source}", path.display()))
    }

    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
