//! Error types for temperature ingest.

use thiserror::Error;

/// Errors raised while reading or normalizing temperature readings.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The document could not be read from disk.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The document is not well-formed XML or does not have the expected shape.
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// A reading is missing one of its elements.
    #[error("Reading {index}: missing <{element}> element")]
    MissingElement { index: usize, element: &'static str },

    /// A reading's value is not a finite decimal number.
    #[error("Reading {index}: value {value:?} is not a finite number")]
    InvalidValue { index: usize, value: String },

    /// A reading's date and time do not form a valid timestamp.
    #[error("Reading {index}: {datetime:?} is not a valid timestamp")]
    InvalidTimestamp { index: usize, datetime: String },
}

impl IngestError {
    /// Create a malformed document error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedDocument(msg.into())
    }

    /// Create an invalid value error.
    pub fn invalid_value(index: usize, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            index,
            value: value.into(),
        }
    }

    /// Create an invalid timestamp error.
    pub fn invalid_timestamp(index: usize, datetime: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            index,
            datetime: datetime.into(),
        }
    }

    /// Index of the offending reading, when the error is tied to one.
    pub fn reading_index(&self) -> Option<usize> {
        match self {
            Self::MissingElement { index, .. }
            | Self::InvalidValue { index, .. }
            | Self::InvalidTimestamp { index, .. } => Some(*index),
            Self::Io { .. } | Self::MalformedDocument(_) => None,
        }
    }
}
