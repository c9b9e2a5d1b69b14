//! Record source error types.

use thiserror::Error;

/// Errors raised while fetching inventory records.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("record source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("malformed sheet response: {0}")]
    Malformed(String),

    #[error("invalid source configuration: {0}")]
    Config(String),
}

/// Convenience alias for record source results.
pub type SheetResult<T> = Result<T, SheetError>;
