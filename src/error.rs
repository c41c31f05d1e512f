//! Error types for outerplanar MIS requests.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pipeline stage an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validation,
    Solving,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Validation => f.write_str("validation"),
            Stage::Solving => f.write_str("solving"),
        }
    }
}

/// Top-level error type for MIS requests.
#[derive(Debug, Error)]
pub enum MisError {
    /// The validator decided the graph is not outerplanar.
    #[error("graph is not outerplanar")]
    NotOuterplanar,

    /// An internal invariant broke while deciding outerplanarity.
    #[error("internal failure while validating outerplanarity: {0}")]
    ValidationFailure(String),

    /// Malformed input: dangling edge endpoint or self-loop.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// More nodes than the configured limit.
    #[error("graph has {nodes} nodes, limit is {limit}")]
    TooLarge { nodes: usize, limit: usize },

    /// Time budget ran out.
    #[error("{stage} exceeded its time budget of {limit:?}")]
    Timeout { stage: Stage, limit: Duration },

    /// The caller raised the cancellation flag.
    #[error("{stage} was cancelled")]
    Cancelled { stage: Stage },

    /// Solver precondition violated (e.g. a non-independent result).
    #[error("internal error: {0}")]
    Internal(String),

    /// I/O error wrapper.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotOuterplanar,
    ValidationFailure,
    InvalidGraph,
    TooLarge,
    Timeout,
    Cancelled,
    Internal,
}

impl MisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MisError::NotOuterplanar => ErrorKind::NotOuterplanar,
            MisError::ValidationFailure(_) => ErrorKind::ValidationFailure,
            MisError::InvalidGraph(_) => ErrorKind::InvalidGraph,
            MisError::TooLarge { .. } => ErrorKind::TooLarge,
            MisError::Timeout { .. } => ErrorKind::Timeout,
            MisError::Cancelled { .. } => ErrorKind::Cancelled,
            MisError::Internal(_) | MisError::Io(_) | MisError::Json(_) => ErrorKind::Internal,
        }
    }

    /// `true` when the caller can fix the request and retry.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::NotOuterplanar
                | ErrorKind::InvalidGraph
                | ErrorKind::TooLarge
                | ErrorKind::Timeout
                | ErrorKind::Cancelled
        )
    }

    /// Message safe to hand to a caller. Internal failures lose their detail.
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::ValidationFailure => {
                "internal error while validating outerplanarity".to_string()
            }
            ErrorKind::Internal => "internal error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for MIS operations.
pub type Result<T> = std::result::Result<T, MisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failure_hides_detail() {
        let err = MisError::ValidationFailure("lowpt missing for (3, 1)".into());
        assert_eq!(err.kind(), ErrorKind::ValidationFailure);
        assert!(!err.is_user_error());
        assert!(!err.public_message().contains("lowpt"));
    }

    #[test]
    fn not_outerplanar_is_user_facing() {
        let err = MisError::NotOuterplanar;
        assert!(err.is_user_error());
        assert_eq!(err.public_message(), "graph is not outerplanar");
    }

    #[test]
    fn timeout_message_names_stage() {
        let err = MisError::Timeout {
            stage: Stage::Solving,
            limit: Duration::from_millis(5),
        };
        assert!(err.to_string().starts_with("solving exceeded"));
        assert_eq!(err.kind(), ErrorKind::Timeout);
    }
}
