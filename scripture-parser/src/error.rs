use std::result;

use thiserror::Error;

/// Error types for chapter normalization
///
/// Only integration defects are meant to reach callers. Payload problems are
/// absorbed by the format parsers and turned into the "content unavailable"
/// block instead.
#[derive(Error, Debug)]
pub enum NormalizeError {
    /// The format identifier does not name a supported source format
    #[error("Unsupported source format: {0}")]
    UnsupportedFormat(String),

    /// Chapter numbers start at 1
    #[error("Invalid chapter number: {chapter}")]
    InvalidChapter { chapter: u32 },

    /// Book identifier was empty or blank
    #[error("Invalid book identifier: {book_id:?}")]
    InvalidBookId { book_id: String },

    /// JSON envelope could not be decoded
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = result::Result<T, NormalizeError>;
