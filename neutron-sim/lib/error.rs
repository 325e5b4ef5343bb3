//! Errors raised by the spin-evolution engine.

use thiserror::Error;

/// Failure modes of state construction and integration.
///
/// Every violation is reported to the caller as-is; nothing is clamped,
/// rounded, or retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A ket was given with the wrong number of real components.
    #[error("invalid state: expected 4 real components, got {len}")]
    InvalidState { len: usize },

    /// A field selector or time/step combination could not be accepted.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl Error {
    pub(crate) fn param<S: Into<String>>(msg: S) -> Self {
        Self::InvalidParameter(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
