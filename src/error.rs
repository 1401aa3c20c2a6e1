//! Error types
//!
//! Only configuration problems are fatal. Terminal failures are reported so
//! the caller can fall back to plain tree output.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Invalid startup configuration, reported before any scan begins.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("--chars-per-token must be greater than 0 (got {0})")]
    InvalidCharsPerToken(f64),

    #[error("invalid --exclude-path-regex '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

/// Failure of the interactive terminal layer.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// stdin or stdout is not attached to a terminal
    #[error("not an interactive terminal")]
    NotATerminal,

    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
}
