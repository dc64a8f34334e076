//! Error types for swiftspeak-core.

use thiserror::Error;

/// Result type alias using CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by scoring, scheduling, and record validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("reference text is empty")]
    InvalidReference,

    #[error("grade {grade} is outside 0..=5")]
    InvalidGrade { grade: i64 },

    #[error("malformed {record} record: {reason}")]
    MalformedRecord { record: &'static str, reason: String },
}

impl CoreError {
    pub fn malformed(record: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            record,
            reason: reason.into(),
        }
    }
}
