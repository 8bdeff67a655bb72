//! Error handling for the reader, writer and command-line layers.
//!
//! The classification core is total and never returns errors; everything in
//! here belongs to the collaborators that move data in and out of it.

pub mod util;

use std::io;
use std::path::PathBuf;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Specialized error type for SRAG processing
#[derive(Debug, thiserror::Error)]
pub enum SragError {
    /// Error opening, reading or writing a file
    #[error("IO error on {}: {source}", path.display())]
    Io {
        /// Path of the file involved
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Error reading or writing delimited data
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error processing Arrow data
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error processing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error converting rows to Arrow arrays
    #[error("Arrow serialization error: {0}")]
    SerdeArrow(#[from] serde_arrow::Error),

    /// Error writing the JSON run summary
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input does not have the expected shape
    #[error("Schema error: {0}")]
    Schema(String),

    /// Column expected in a record batch is missing
    #[error("Column not found: {column}")]
    ColumnNotFound {
        /// Name of the missing column
        column: String,
    },

    /// Column has a type that cannot be used
    #[error("Column '{column}' has unexpected type, expected {expected}")]
    InvalidDataType {
        /// Name of the column
        column: String,
        /// Human-readable expected type
        expected: String,
    },

    /// Region code cannot be normalized
    #[error("Invalid region code: '{0}'")]
    InvalidRegion(String),

    /// Lab, symptom or week cell is not an integer code
    #[error("Invalid code '{value}' in column {column}")]
    InvalidCode {
        /// Column holding the value
        column: String,
        /// Raw cell content
        value: String,
    },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SragError {
    /// Wrap an IO error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for SRAG reader and writer operations
pub type Result<T> = std::result::Result<T, SragError>;
