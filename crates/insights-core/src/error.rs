use std::path::PathBuf;
use thiserror::Error;

/// All errors produced while loading and converting event data.
#[derive(Error, Debug)]
pub enum InsightsError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source contained no header line.
    #[error("Missing header row in {0}")]
    MissingHeader(PathBuf),

    /// The header line could not be used to name columns.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// The text is not well-formed comma-delimited data.
    #[error("Malformed CSV at line {line}: {message}")]
    MalformedCsv { line: usize, message: String },

    /// A data row does not have one cell per header column.
    #[error("Row at line {line} has {found} fields, expected {expected}")]
    FieldCount {
        line: usize,
        found: usize,
        expected: usize,
    },

    /// A required column is not present in the header.
    #[error("Row at line {line} is missing required column {column}")]
    MissingColumn { line: usize, column: String },

    /// An identifier cell could not be read as an integer.
    #[error("Invalid integer for {column} at line {line}: {value:?}")]
    InvalidInteger {
        line: usize,
        column: String,
        value: String,
    },

    /// A timestamp cell did not match `YYYY-MM-DD HH:MM:SS`.
    #[error("Invalid timestamp format at line {line}: {value:?}")]
    TimestampParse { line: usize, value: String },

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl InsightsError {
    /// `true` for errors caused by the content of the data rather than by
    /// access to it.
    pub fn is_format_error(&self) -> bool {
        !matches!(self, InsightsError::FileRead { .. } | InsightsError::Io(_))
    }
}

/// Convenience alias used throughout the insights crates.
pub type Result<T> = std::result::Result<T, InsightsError>;
