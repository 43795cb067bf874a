//! Error types for the casting engine.

use thiserror::Error;

/// Result type alias for casting operations.
pub type CastResult<T> = Result<T, CastError>;

/// Errors that can occur while casting or decoding hexagrams.
///
/// Both variants indicate a defect in the caller or in the codec; nothing
/// here is transient and nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CastError {
    /// A numeric input was outside the domain the casting rules are defined on.
    #[error("invalid input for {field}: {value} ({reason})")]
    InvalidInput {
        field: &'static str,
        value: i64,
        reason: &'static str,
    },

    /// A line pattern did not match any trigram.
    #[error("no trigram matches line pattern {pattern:#05b}")]
    LookupFailure { pattern: u8 },
}

impl CastError {
    /// Create an input error for a value that must be positive.
    pub fn non_positive(field: &'static str, value: i64) -> Self {
        Self::InvalidInput {
            field,
            value,
            reason: "must be a positive integer",
        }
    }

    /// Create an input error for a value outside its allowed range.
    pub fn out_of_range(field: &'static str, value: i64, reason: &'static str) -> Self {
        Self::InvalidInput {
            field,
            value,
            reason,
        }
    }
}
