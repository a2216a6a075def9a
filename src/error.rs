//! Error types for cqlwrap.
//!
//! Driver failures are carried verbatim in [`ExecutionError`]; everything the
//! facade itself detects (result shape, empty results, reuse of a submitted
//! batch) has its own variant so callers can branch on it.

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by queries, batches and iterators.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The session could not complete the call.
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// Destinations don't match the row returned.
    #[error("result shape mismatch: {0}")]
    Shape(#[from] ShapeError),

    /// A single-row read found nothing.
    #[error("no rows in result set")]
    NoRows,

    /// The batch was already submitted.
    #[error("batch has already been submitted")]
    Consumed,

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NoRows)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Error::Execution(ExecutionError {
                kind: ExecutionErrorKind::Timeout,
                ..
            })
        )
    }
}

/// Broad classification of a driver failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionErrorKind {
    Transport,
    Timeout,
    Unavailable,
    Rejected,
    Other,
}

impl std::fmt::Display for ExecutionErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ExecutionErrorKind::Transport => "transport",
            ExecutionErrorKind::Timeout => "timeout",
            ExecutionErrorKind::Unavailable => "unavailable",
            ExecutionErrorKind::Rejected => "rejected",
            ExecutionErrorKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// Failure reported by a [`Session`](crate::session::Session).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} error: {message}")]
pub struct ExecutionError {
    pub kind: ExecutionErrorKind,
    pub message: String,
}

impl ExecutionError {
    pub fn new(kind: ExecutionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ExecutionErrorKind::Transport, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ExecutionErrorKind::Timeout, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ExecutionErrorKind::Unavailable, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(ExecutionErrorKind::Rejected, message)
    }
}

/// Mismatch between a row and the destinations it is scanned into.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("expected {expected} destinations, row has {found} columns")]
    ColumnCount { expected: usize, found: usize },

    #[error("column {column}: cannot scan {found} into {expected}")]
    Type {
        column: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Conditional result without a boolean `[applied]` column.
    #[error("conditional result has no boolean [applied] column")]
    MissingApplied,
}
