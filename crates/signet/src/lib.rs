//! # DIME Signet Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free code. Panics are disallowed in non-test code to promote
//! robust error handling.
#![cfg_attr(
    not(test),
    deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)
)]
#![forbid(unsafe_code)]
//! # DIME Signets & Keychains
//!
//! The signet subsystem of the dark-mail protocol family: the typed,
//! length-prefixed, field-tagged container format for identity documents,
//! the state classifier that verifies the cascade of internal signatures,
//! the chain-of-custody rules linking successive user signets, and the
//! private keychain files carrying the matching secret keys.
//!
//! The library is synchronous and holds no process-wide mutable state; the
//! crypto primitives come from `dime-crypto` and the field vocabulary from
//! `dime-types`.

pub mod armor;
pub mod envelope;
pub mod keychain;
pub mod signet;
pub mod verify;
pub mod wire;

pub use keychain::Keychain;
pub use signet::Signet;
pub use verify::{classify, verify_chain_of_custody};
