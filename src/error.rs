//! Error types for the floodcast library.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, FloodcastError>;

/// Errors that can occur while running the forecasting pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FloodcastError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// The normal-equation matrix could not be inverted.
    #[error("singular matrix: normal equations have no unique solution")]
    SingularMatrix,

    /// The differencing loop failed to reach stationarity within its cap.
    #[error("differencing did not converge within {max_steps} steps")]
    DifferencingDiverged { max_steps: usize },

    /// Date-related error.
    #[error("date error: {0}")]
    DateError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = FloodcastError::EmptyData;
        assert_eq!(err.to_string(), "empty input data");

        let err = FloodcastError::InsufficientData { needed: 14, got: 9 };
        assert_eq!(
            err.to_string(),
            "insufficient data: need at least 14, got 9"
        );

        let err = FloodcastError::SingularMatrix;
        assert_eq!(
            err.to_string(),
            "singular matrix: normal equations have no unique solution"
        );

        let err = FloodcastError::DifferencingDiverged { max_steps: 10 };
        assert_eq!(
            err.to_string(),
            "differencing did not converge within 10 steps"
        );

        let err = FloodcastError::InvalidParameter("k must be positive".to_string());
        assert_eq!(err.to_string(), "invalid parameter: k must be positive");
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = FloodcastError::SingularMatrix;
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
