//! The signet state lattice.

use std::fmt;

/// Classification of a single signet.
///
/// Ordering reflects the lattice: every invalid state sorts below `Ssr`,
/// and the valid stages ascend `Ssr → Crypto → Full → Id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SignetState {
    /// Not yet classified.
    Unknown,
    /// Violates the field format or carries a duplicate unique field.
    Malformed,
    /// Exceeds the maximum signet size.
    Overflow,
    /// Missing fields required for any valid category.
    Incomplete,
    /// The chain-of-custody signature does not verify.
    BrokenCoc,
    /// One or more signatures do not verify.
    Invalid,
    /// Valid signet signing request (self-signed only).
    Ssr,
    /// Valid cryptographic signet.
    Crypto,
    /// Valid full signet.
    Full,
    /// Valid full signet with identifier and identifiable signature.
    Id,
}

impl SignetState {
    /// Whether the signet reached at least the SSR stage.
    pub fn is_valid(self) -> bool {
        self >= Self::Ssr
    }
}

impl fmt::Display for SignetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unknown => "unknown",
            Self::Malformed => "malformed",
            Self::Overflow => "overflow",
            Self::Incomplete => "incomplete",
            Self::BrokenCoc => "broken chain of custody",
            Self::Invalid => "invalid",
            Self::Ssr => "ssr",
            Self::Crypto => "cryptographic",
            Self::Full => "full",
            Self::Id => "identified",
        };
        f.write_str(label)
    }
}
