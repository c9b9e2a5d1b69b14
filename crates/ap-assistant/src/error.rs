//! Completion service error types.

use thiserror::Error;

/// Errors raised by a fallback responder.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion service unavailable: {0}")]
    Unavailable(String),

    #[error("malformed completion response: {0}")]
    Malformed(String),

    #[error("completion service disabled")]
    Disabled,

    #[error("invalid completion configuration: {0}")]
    Config(String),
}

/// Convenience alias for completion results.
pub type CompletionResult<T> = Result<T, CompletionError>;
