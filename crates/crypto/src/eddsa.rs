//! Ed25519 signing primitives using dcrypt.

use crate::error::CryptoError;
use dcrypt::api::Signature as SignatureTrait;
use rand::rngs::OsRng;
use zeroize::Zeroize;

// Import dcrypt Ed25519 module with module qualification
use dcrypt::sign::eddsa;

/// Byte length of an Ed25519 seed, private scalar and public point.
pub const ED25519_KEY_SIZE: usize = 32;
/// Byte length of an Ed25519 signature.
pub const ED25519_SIG_SIZE: usize = 64;

/// An Ed25519 signing key pair.
///
/// The secret half lives inside dcrypt's zeroizing container; exporting it
/// through [`SigningKeyPair::seed`] is the only way to obtain the raw bytes.
#[derive(Clone)]
pub struct SigningKeyPair {
    public_key: eddsa::Ed25519PublicKey,
    secret_key: eddsa::Ed25519SecretKey,
}

/// An Ed25519 public verification key.
#[derive(Clone)]
pub struct SigningPublicKey(eddsa::Ed25519PublicKey);

impl SigningKeyPair {
    /// Generates a fresh key pair from the OS entropy pool.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut rng = OsRng;
        let (public_key, secret_key) = eddsa::Ed25519::keypair(&mut rng).map_err(|e| {
            CryptoError::OperationFailed(format!("Ed25519 keypair generation failed: {}", e))
        })?;

        Ok(Self {
            public_key,
            secret_key,
        })
    }

    /// Reconstructs a key pair from a 32-byte seed.
    pub fn from_seed(seed: &[u8]) -> Result<Self, CryptoError> {
        if seed.len() != ED25519_KEY_SIZE {
            return Err(CryptoError::InvalidKey(format!(
                "invalid Ed25519 seed length: expected {}, got {}",
                ED25519_KEY_SIZE,
                seed.len()
            )));
        }

        let mut buf = [0u8; ED25519_KEY_SIZE];
        buf.copy_from_slice(seed);
        let secret_key = eddsa::Ed25519SecretKey::from_seed(&buf).map_err(|e| {
            CryptoError::InvalidKey(format!("failed to create secret key from seed: {}", e))
        });
        buf.zeroize();
        let secret_key = secret_key?;

        let public_key = secret_key
            .public_key()
            .map_err(|e| CryptoError::InvalidKey(format!("public key derivation failed: {}", e)))?;

        Ok(Self {
            public_key,
            secret_key,
        })
    }

    /// The public half of this key pair.
    pub fn public(&self) -> SigningPublicKey {
        SigningPublicKey(self.public_key.clone())
    }

    /// The public key serialized to its 32-byte form.
    pub fn public_bytes(&self) -> Vec<u8> {
        self.public_key.to_bytes().to_vec()
    }

    /// The raw 32-byte private seed.
    pub fn seed(&self) -> &[u8] {
        self.secret_key.seed()
    }

    /// Signs a message, returning the 64-byte signature.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let signature = eddsa::Ed25519::sign(message, &self.secret_key)
            .map_err(|e| CryptoError::OperationFailed(format!("Ed25519 sign failed: {}", e)))?;
        Ok(signature.to_bytes().to_vec())
    }
}

impl SigningPublicKey {
    /// Parses a 32-byte public key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != ED25519_KEY_SIZE {
            return Err(CryptoError::InvalidKey(format!(
                "invalid Ed25519 public key length: expected {}, got {}",
                ED25519_KEY_SIZE,
                bytes.len()
            )));
        }
        eddsa::Ed25519PublicKey::from_bytes(bytes)
            .map(Self)
            .map_err(|e| CryptoError::InvalidKey(format!("failed to parse public key: {}", e)))
    }

    /// The 32-byte serialized form.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes().to_vec()
    }

    /// Verifies a 64-byte signature over a message.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        let signature = eddsa::Ed25519Signature::from_bytes(signature)
            .map_err(|e| CryptoError::InvalidSignature(format!("failed to parse signature: {}", e)))?;
        eddsa::Ed25519::verify(message, &signature, &self.0)
            .map_err(|e| CryptoError::InvalidSignature(format!("verification failed: {}", e)))
    }
}

impl PartialEq for SigningPublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for SigningPublicKey {}

impl std::fmt::Debug for SigningPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SigningPublicKey({:02x?})", self.to_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify() {
        let kp = SigningKeyPair::generate().unwrap();
        let msg = b"the quick brown fox";
        let sig = kp.sign(msg).unwrap();
        assert_eq!(sig.len(), ED25519_SIG_SIZE);
        kp.public().verify(msg, &sig).unwrap();
    }

    #[test]
    fn tampered_message_fails() {
        let kp = SigningKeyPair::generate().unwrap();
        let sig = kp.sign(b"original").unwrap();
        assert!(kp.public().verify(b"tampered", &sig).is_err());
    }

    #[test]
    fn seed_round_trip_preserves_public_half() {
        let kp = SigningKeyPair::generate().unwrap();
        let restored = SigningKeyPair::from_seed(kp.seed()).unwrap();
        assert_eq!(kp.public_bytes(), restored.public_bytes());
    }

    #[test]
    fn rejects_short_key_material() {
        assert!(SigningKeyPair::from_seed(&[0u8; 16]).is_err());
        assert!(SigningPublicKey::from_bytes(&[0u8; 31]).is_err());
    }
}
