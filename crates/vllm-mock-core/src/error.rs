//! Shared error type across vllm-mock crates.

use thiserror::Error;

/// Stable error codes (logged and asserted on by tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Metric name registered twice.
    DuplicateMetric,
    /// Metric name never registered.
    UnknownMetric,
    /// Operation does not match the metric kind.
    InvalidKind,
    /// Label set does not match the descriptor's label names.
    LabelMismatch,
    /// Negative counter delta or non-finite sample.
    InvalidValue,
    /// Malformed descriptor (name, labels, range, buckets).
    InvalidDescriptor,
    /// Invalid configuration file.
    BadConfig,
    /// Internal error (I/O, bind failure).
    Internal,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::DuplicateMetric => "DUPLICATE_METRIC",
            ErrorCode::UnknownMetric => "UNKNOWN_METRIC",
            ErrorCode::InvalidKind => "INVALID_KIND",
            ErrorCode::LabelMismatch => "LABEL_MISMATCH",
            ErrorCode::InvalidValue => "INVALID_VALUE",
            ErrorCode::InvalidDescriptor => "INVALID_DESCRIPTOR",
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MockError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum MockError {
    #[error("metric already registered: {0}")]
    DuplicateMetric(String),
    #[error("unknown metric: {0}")]
    UnknownMetric(String),
    #[error("metric {name} is a {actual}, not a {expected}")]
    InvalidKind {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("metric {name} expects labels {expected:?}, got {got:?}")]
    LabelMismatch {
        name: String,
        expected: Vec<String>,
        got: Vec<String>,
    },
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl MockError {
    pub fn code(&self) -> ErrorCode {
        match self {
            MockError::DuplicateMetric(_) => ErrorCode::DuplicateMetric,
            MockError::UnknownMetric(_) => ErrorCode::UnknownMetric,
            MockError::InvalidKind { .. } => ErrorCode::InvalidKind,
            MockError::LabelMismatch { .. } => ErrorCode::LabelMismatch,
            MockError::InvalidValue { .. } => ErrorCode::InvalidValue,
            MockError::InvalidDescriptor(_) => ErrorCode::InvalidDescriptor,
            MockError::BadConfig(_) => ErrorCode::BadConfig,
            MockError::Internal(_) => ErrorCode::Internal,
        }
    }
}
