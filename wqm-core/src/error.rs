/// Error types for the WQM core library
use std::path::PathBuf;
use thiserror::Error;

/// A required input source could not be read. The process cannot serve
/// without all three sources, so these abort startup.
#[derive(Error, Debug)]
pub enum StartupError {
    /// Source file could not be opened
    #[error("Failed to open {source_name} source at {}: {source}", path.display())]
    SourceMissing {
        source_name: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    /// Source is readable but lacks a column of its fixed schema
    #[error("{source_name} source is missing required column {column}")]
    MissingColumn {
        source_name: &'static str,
        column: &'static str,
    },

    /// Source is not well-formed CSV
    #[error("Failed to parse {source_name} CSV: {source}")]
    Csv {
        source_name: &'static str,
        source: csv::Error,
    },
}

/// A malformed event payload from the view host.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Date string is not ISO-8601 "YYYY-MM-DD"
    #[error("Invalid date {input:?}: {source}")]
    InvalidDate {
        input: String,
        source: chrono::ParseError,
    },

    /// Event could not be decoded at all
    #[error("Invalid event: {0}")]
    InvalidEvent(String),
}

/// Type alias for Results using StartupError
pub type Result<T> = std::result::Result<T, StartupError>;
