//! Owned secret buffers that wipe on drop.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// A container for sensitive data that zeroizes on drop.
///
/// Used for decoded keychain bodies and every other intermediate that holds
/// private key material; dropping the container on any path, including
/// unwind, overwrites the bytes before the allocation is released.
#[derive(Zeroize, ZeroizeOnDrop, Default)]
pub struct SensitiveBytes(pub Vec<u8>);

impl SensitiveBytes {
    /// Wraps an existing buffer.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Read access to the protected bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Length of the protected buffer.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for SensitiveBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SensitiveBytes({} bytes)", self.0.len())
    }
}
