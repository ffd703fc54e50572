//! # DIME Crypto Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free code. Panics are disallowed in non-test code to promote
//! robust error handling.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]
//! # DIME Cryptography
//!
//! Wrappers around the dcrypt primitives the signet subsystem consumes:
//! Ed25519 signing, curve encryption keys, SHA-256 fingerprint digests and
//! zeroizing secret containers. The signet core treats this crate as its
//! injected crypto capability; nothing here knows about signet formats.

pub mod ecdh;
pub mod error;
pub mod eddsa;
pub mod hash;
pub mod secret;

pub use ecdh::EncryptionKeyPair;
pub use error::CryptoError;
pub use eddsa::{SigningKeyPair, SigningPublicKey};
pub use hash::sha256;
pub use secret::SensitiveBytes;
