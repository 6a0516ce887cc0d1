//! Error types for query orchestration.

use crate::types::Phase;

/// Reasons raw user input cannot become a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("query cannot be empty")]
    EmptyInput,
}

/// Errors from the chat session.
///
/// Backend failures are not listed here: they are rendered to the user as
/// part of a completed exchange.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("a query is already in progress")]
    Busy,
    #[error("invalid session transition: {from} -> {to}")]
    InvalidTransition { from: Phase, to: Phase },
}

impl ChatError {
    /// Errors a surface recovers from by simply waiting for the next input.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ChatError::Validation(_) | ChatError::Busy)
    }
}
