//! Core error types for the signet library.

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors surfaced by signet, keychain and envelope operations.
///
/// Every fallible operation returns one of these kinds together with a
/// human-readable detail string; there is no internal retry and no
/// side-channel error state.
#[derive(Debug, Error)]
pub enum SignetError {
    /// A caller-supplied argument was null, empty or out of range.
    #[error("bad parameter: {0}")]
    BadParam(String),
    /// The encoding violates the binary format: length mismatch, bad magic,
    /// overlong field, duplicate unique field or misordered fields.
    #[error("malformed encoding: {0}")]
    Format(String),
    /// A field required for the attempted operation is absent.
    #[error("incomplete signet: {0}")]
    Incomplete(String),
    /// A cryptographic primitive failed.
    #[error("cryptographic failure: {0}")]
    Crypto(String),
    /// An underlying read or write failed.
    #[error("i/o failure: {0}")]
    Io(String),
    /// A precondition violation not covered by the other kinds.
    #[error("unspecified failure: {0}")]
    Unspec(String),
}

impl ErrorCode for SignetError {
    fn code(&self) -> &'static str {
        match self {
            Self::BadParam(_) => "SIGNET_BAD_PARAM",
            Self::Format(_) => "SIGNET_FORMAT",
            Self::Incomplete(_) => "SIGNET_INCOMPLETE",
            Self::Crypto(_) => "SIGNET_CRYPTO",
            Self::Io(_) => "SIGNET_IO",
            Self::Unspec(_) => "SIGNET_UNSPEC",
        }
    }
}

impl From<std::io::Error> for SignetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(SignetError::BadParam(String::new()).code(), "SIGNET_BAD_PARAM");
        assert_eq!(SignetError::Format(String::new()).code(), "SIGNET_FORMAT");
        assert_eq!(SignetError::Incomplete(String::new()).code(), "SIGNET_INCOMPLETE");
        assert_eq!(SignetError::Crypto(String::new()).code(), "SIGNET_CRYPTO");
        assert_eq!(SignetError::Io(String::new()).code(), "SIGNET_IO");
        assert_eq!(SignetError::Unspec(String::new()).code(), "SIGNET_UNSPEC");
    }

    #[test]
    fn io_errors_convert() {
        let err: SignetError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, SignetError::Io(_)));
    }
}
