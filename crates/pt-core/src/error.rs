//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// Errors raised by `pt-core`, currently configuration validation only.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("configuration error: {field} {reason}")]
    Config {
        field:  &'static str,
        reason: &'static str,
    },
}

/// Shorthand result type for `pt-core`.
pub type CoreResult<T> = Result<T, CoreError>;
