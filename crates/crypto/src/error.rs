//! Local error types for the `dime-crypto` crate.

use thiserror::Error;

/// Errors surfaced by the primitive wrappers.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key material could not be parsed or constructed.
    #[error("invalid key: {0}")]
    InvalidKey(String),
    /// A signature blob could not be parsed.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),
    /// A caller-supplied buffer was the wrong shape.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The underlying primitive returned an error.
    #[error("operation failed: {0}")]
    OperationFailed(String),
}
