// =============================================================================
// Analysis errors
// =============================================================================
//
// Every fatal condition of an analysis call. Degraded-but-usable output (a
// missing EMA reading, an empty level list) is never an error.

use thiserror::Error;

/// Errors surfaced by series construction, configuration and the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// The price series has zero points.
    #[error("price series is empty")]
    EmptySeries,

    /// The series is too short to form the current reading of `indicator`.
    #[error("insufficient history for {indicator}: required {required} points, got {available}")]
    InsufficientHistory {
        indicator: &'static str,
        required: usize,
        available: usize,
    },

    /// A price point failed validation while building a series.
    #[error("invalid price point at index {index}: {reason}")]
    InvalidPoint { index: usize, reason: String },

    /// The analysis configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_history_message_names_indicator() {
        let err = AnalysisError::InsufficientHistory {
            indicator: "MACD",
            required: 34,
            available: 20,
        };
        assert_eq!(
            err.to_string(),
            "insufficient history for MACD: required 34 points, got 20"
        );
    }
}
