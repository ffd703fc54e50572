//! Cryptographic hash functions using dcrypt.

use crate::error::CryptoError;
use dcrypt::algorithms::hash::sha2::Sha256;
use dcrypt::algorithms::hash::HashFunction as DcryptHashFunction;
use dcrypt::algorithms::ByteSerializable;

/// Byte length of a SHA-256 digest.
pub const SHA256_SIZE: usize = 32;

/// Computes the SHA-256 digest of `data`.
pub fn sha256(data: &[u8]) -> Result<[u8; SHA256_SIZE], CryptoError> {
    let digest = Sha256::digest(data)
        .map_err(|e| CryptoError::OperationFailed(format!("SHA-256 failed: {}", e)))?;
    digest
        .to_bytes()
        .as_slice()
        .try_into()
        .map_err(|_| CryptoError::OperationFailed("SHA-256 digest has unexpected length".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vector() {
        // FIPS 180-2 test vector for "abc".
        let digest = sha256(b"abc").unwrap();
        let expected = [
            0xba, 0x78, 0x16, 0xbf, 0x8f, 0x01, 0xcf, 0xea, 0x41, 0x41, 0x40, 0xde, 0x5d, 0xae,
            0x22, 0x23, 0xb0, 0x03, 0x61, 0xa3, 0x96, 0x17, 0x7a, 0x9c, 0xb4, 0x10, 0xff, 0x61,
            0xf2, 0x00, 0x15, 0xad,
        ];
        assert_eq!(digest, expected);
    }

    #[test]
    fn empty_input() {
        let digest = sha256(b"").unwrap();
        assert_eq!(
            digest[..4],
            [0xe3, 0xb0, 0xc4, 0x42],
            "empty-string digest prefix"
        );
    }
}
