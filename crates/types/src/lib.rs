#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # DIME Signet Types
//!
//! This crate is the foundational library for the DIME signet subsystem,
//! containing the magic-number and field-catalog definitions, the signet
//! state lattice, and the shared error taxonomy.
//!
//! ## Architectural Role
//!
//! As the base crate, `dime-types` has minimal dependencies and is itself a
//! dependency for every other crate in the workspace. This structure keeps
//! the binary-format vocabulary (field identifiers, size limits, catalog
//! rules) in one canonical place.

/// A top-level, crate-wide `Result` type alias with a default error type.
pub type Result<T, E = crate::error::SignetError> = std::result::Result<T, E>;

/// DIME magic numbers, record kinds and format limits.
pub mod dime;
/// The shared error taxonomy and stable error codes.
pub mod error;
/// Static field catalogs and well-known field identifiers.
pub mod fields;
/// The signet state lattice.
pub mod state;
