//! secp256k1 encryption keys using dcrypt's ECDH implementation.
//!
//! Signets pin a single named curve for encryption keys; the wrappers here
//! expose exactly what the signet and keychain formats need: key generation,
//! the 33-byte compressed public serialization, and an opaque private blob
//! (`scalar || compressed point`) for keychain storage.

use crate::error::CryptoError;
use dcrypt::api::Kem;
use dcrypt::kem::ecdh::{EcdhK256, EcdhK256PublicKey, EcdhK256SecretKey};
use dcrypt::prelude::SerializeSecret;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

/// Byte length of a compressed curve point.
pub const EC_PUBLIC_KEY_SIZE: usize = 33;
/// Byte length of a curve scalar.
pub const EC_SECRET_KEY_SIZE: usize = 32;
/// Byte length of the private serialization: scalar plus compressed point.
pub const EC_PRIVATE_BLOB_SIZE: usize = EC_SECRET_KEY_SIZE + EC_PUBLIC_KEY_SIZE;

/// A curve encryption key pair.
#[derive(Clone)]
pub struct EncryptionKeyPair {
    public_key: EcdhK256PublicKey,
    secret_key: EcdhK256SecretKey,
}

impl EncryptionKeyPair {
    /// Generates a fresh key pair from the OS entropy pool.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut rng = OsRng;
        let (public_key, secret_key) = EcdhK256::keypair(&mut rng).map_err(|e| {
            CryptoError::OperationFailed(format!("curve keypair generation failed: {}", e))
        })?;

        Ok(Self {
            public_key,
            secret_key,
        })
    }

    /// The 33-byte compressed public point.
    pub fn public_bytes(&self) -> Vec<u8> {
        self.public_key.to_bytes()
    }

    /// Serializes the private half into the opaque keychain blob.
    ///
    /// The blob carries the scalar followed by the compressed public point,
    /// so deserialization never has to re-derive the point.
    pub fn to_private_blob(&self) -> Zeroizing<Vec<u8>> {
        let mut blob = Zeroizing::new(Vec::with_capacity(EC_PRIVATE_BLOB_SIZE));
        blob.extend_from_slice(&self.secret_key.to_bytes_zeroizing());
        blob.extend_from_slice(&self.public_key.to_bytes());
        blob
    }

    /// Reconstructs a key pair from a private blob.
    pub fn from_private_blob(blob: &[u8]) -> Result<Self, CryptoError> {
        if blob.len() != EC_PRIVATE_BLOB_SIZE {
            return Err(CryptoError::InvalidKey(format!(
                "invalid private key blob length: expected {}, got {}",
                EC_PRIVATE_BLOB_SIZE,
                blob.len()
            )));
        }

        let (scalar, point) = blob.split_at(EC_SECRET_KEY_SIZE);
        let secret_key = EcdhK256SecretKey::from_bytes(scalar)
            .map_err(|e| CryptoError::InvalidKey(format!("failed to parse curve scalar: {}", e)))?;
        let public_key = EcdhK256PublicKey::from_bytes(point)
            .map_err(|e| CryptoError::InvalidKey(format!("failed to parse curve point: {}", e)))?;

        Ok(Self {
            public_key,
            secret_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_key_sizes() {
        let kp = EncryptionKeyPair::generate().unwrap();
        assert_eq!(kp.public_bytes().len(), EC_PUBLIC_KEY_SIZE);
        assert_eq!(kp.to_private_blob().len(), EC_PRIVATE_BLOB_SIZE);
    }

    #[test]
    fn private_blob_round_trip() {
        let kp = EncryptionKeyPair::generate().unwrap();
        let restored = EncryptionKeyPair::from_private_blob(&kp.to_private_blob()).unwrap();
        assert_eq!(kp.public_bytes(), restored.public_bytes());
    }

    #[test]
    fn rejects_truncated_blob() {
        let kp = EncryptionKeyPair::generate().unwrap();
        let blob = kp.to_private_blob().to_vec();
        assert!(EncryptionKeyPair::from_private_blob(&blob[..EC_SECRET_KEY_SIZE]).is_err());
    }
}
