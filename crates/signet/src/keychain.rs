//! The private keychain: the `*_KEYS` counterpart file of a signet.
//!
//! Format: `magic[2] || length[3]` followed by the signing-key record
//! (`fid || 0x20 || seed[32]`, mandatory, always first) and the
//! encryption-key record (`fid || u2be(len) || blob`). Records ahead of the
//! encryption key carry a 1-byte length, which leaves room for future
//! secondary signing keys in organizational files without a format break.
//!
//! Every intermediate buffer holding key material is zeroized before
//! release, on error paths included.

use crate::armor;
use crate::wire;
use dime_crypto::eddsa::ED25519_KEY_SIZE;
use dime_crypto::{EncryptionKeyPair, SigningKeyPair};
use dime_types::dime::{DimeNumber, KeysKind, KEYCHAIN_PEM_TAG, KEYS_HEADER_SIZE};
use dime_types::error::SignetError;
use dime_types::fields::{keys_org_fid, keys_user_fid};
use dime_types::Result;
use std::path::Path;
use zeroize::Zeroizing;

/// The private key material behind a signet.
pub struct Keychain {
    kind: KeysKind,
    signing: SigningKeyPair,
    encryption: EncryptionKeyPair,
}

impl Keychain {
    /// Wraps existing key pairs.
    pub fn new(kind: KeysKind, signing: SigningKeyPair, encryption: EncryptionKeyPair) -> Self {
        Self {
            kind,
            signing,
            encryption,
        }
    }

    /// Generates a fresh signing and encryption pair.
    pub fn generate(kind: KeysKind) -> Result<Self> {
        let signing = SigningKeyPair::generate().map_err(|e| SignetError::Crypto(e.to_string()))?;
        let encryption =
            EncryptionKeyPair::generate().map_err(|e| SignetError::Crypto(e.to_string()))?;
        log::debug!("generated fresh keychain material");
        Ok(Self::new(kind, signing, encryption))
    }

    /// The keychain kind.
    pub fn kind(&self) -> KeysKind {
        self.kind
    }

    /// The signing key pair.
    pub fn signing(&self) -> &SigningKeyPair {
        &self.signing
    }

    /// The encryption key pair.
    pub fn encryption(&self) -> &EncryptionKeyPair {
        &self.encryption
    }

    fn record_fids(kind: KeysKind) -> (u8, u8) {
        match kind {
            KeysKind::Org => (keys_org_fid::POK, keys_org_fid::ENC),
            KeysKind::User => (keys_user_fid::SIGN, keys_user_fid::ENC),
        }
    }

    fn serialize(&self) -> Result<Zeroizing<Vec<u8>>> {
        let (sign_fid, enc_fid) = Self::record_fids(self.kind);
        let enc_blob = self.encryption.to_private_blob();
        if enc_blob.len() > dime_types::dime::UNSIGNED_MAX_2_BYTE as usize {
            return Err(SignetError::Format(
                "encryption key serialization exceeds its 2-byte length prefix".into(),
            ));
        }

        let body_len = 1 + 1 + ED25519_KEY_SIZE + 1 + 2 + enc_blob.len();
        let mut out = Zeroizing::new(Vec::with_capacity(KEYS_HEADER_SIZE + body_len));
        wire::put_u2be(&mut out, self.kind.magic().as_u16());
        wire::put_u3be(&mut out, body_len as u32)?;
        out.push(sign_fid);
        out.push(ED25519_KEY_SIZE as u8);
        out.extend_from_slice(self.signing.seed());
        out.push(enc_fid);
        wire::put_u2be(&mut out, enc_blob.len() as u16);
        out.extend_from_slice(&enc_blob);
        Ok(out)
    }

    fn check_length(bytes: &[u8]) -> Result<()> {
        if bytes.len() < KEYS_HEADER_SIZE {
            return Err(SignetError::BadParam("keys buffer shorter than header".into()));
        }
        let declared = wire::get_u3be(bytes, 2)? as usize;
        if declared != bytes.len() - KEYS_HEADER_SIZE {
            return Err(SignetError::Format(
                "declared length does not match input size".into(),
            ));
        }
        Ok(())
    }

    fn kind_of(bytes: &[u8]) -> Result<KeysKind> {
        Self::check_length(bytes)?;
        let magic = wire::get_u2be(bytes, 0)?;
        DimeNumber::from_magic(magic)
            .and_then(KeysKind::from_magic)
            .ok_or_else(|| SignetError::Format("DIME number is not a keys file type".into()))
    }

    fn deserialize(bytes: &[u8]) -> Result<Self> {
        let kind = Self::kind_of(bytes)?;
        let (sign_fid, enc_fid) = Self::record_fids(kind);

        // The signing-key record must sit directly after the header.
        let mut at = KEYS_HEADER_SIZE;
        if wire::get_u8(bytes, at)? != sign_fid {
            return Err(SignetError::Format("no signing key record found".into()));
        }
        at += 1;
        if wire::get_u8(bytes, at)? as usize != ED25519_KEY_SIZE {
            return Err(SignetError::Format("invalid signing key size".into()));
        }
        at += 1;
        let seed = wire::take(bytes, at, ED25519_KEY_SIZE)?;
        let signing =
            SigningKeyPair::from_seed(seed).map_err(|e| SignetError::Crypto(e.to_string()))?;

        // Locate the encryption record, skipping any 1-byte-length records
        // (the signing key and future secondary signing keys).
        let mut at = KEYS_HEADER_SIZE;
        loop {
            let fid = wire::get_u8(bytes, at)?;
            at += 1;
            if fid == enc_fid {
                break;
            }
            at += 1 + wire::get_u8(bytes, at)? as usize;
            if at >= bytes.len() {
                return Err(SignetError::Format(
                    "no private encryption key in keys buffer".into(),
                ));
            }
        }
        let enc_len = wire::get_u2be(bytes, at)? as usize;
        at += 2;
        let blob = wire::take(bytes, at, enc_len)?;
        let encryption = EncryptionKeyPair::from_private_blob(blob)
            .map_err(|e| SignetError::Crypto(e.to_string()))?;

        Ok(Self::new(kind, signing, encryption))
    }

    /// Writes the keychain as a PEM file, wiping every intermediate.
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let serial = self.serialize()?;
        armor::write_pem_file_secret(path, KEYCHAIN_PEM_TAG, &serial)
    }

    /// Reads a keychain back from a PEM file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let body = armor::read_pem_file_secret(path, KEYCHAIN_PEM_TAG)?;
        Self::deserialize(body.as_slice())
    }

    /// Retrieves only the signing key from a keychain file.
    pub fn fetch_sign_key(path: &Path) -> Result<SigningKeyPair> {
        Ok(Self::from_file(path)?.signing)
    }

    /// Retrieves only the encryption key from a keychain file.
    pub fn fetch_enc_key(path: &Path) -> Result<EncryptionKeyPair> {
        Ok(Self::from_file(path)?.encryption)
    }
}

impl std::fmt::Debug for Keychain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keychain").field("kind", &self.kind).finish()
    }
}
