//! Origin and destination envelope blocks.
//!
//! The message layer stores the originator and recipient bindings as small
//! newline-delimited ASCII chunks. The signet core only formats and parses
//! these blocks; what surrounds them belongs to the message format.

use dime_types::error::SignetError;
use dime_types::Result;

/// Which envelope chunk a block belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkType {
    /// The author's binding.
    Origin,
    /// The recipient's binding.
    Destination,
}

impl ChunkType {
    fn role(self) -> &'static str {
        match self {
            Self::Origin => "Author",
            Self::Destination => "Recipient",
        }
    }
}

/// A parsed origin or destination block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeBlock {
    /// Author or recipient mail address.
    pub user_id: String,
    /// Origin or destination domain.
    pub org_id: String,
    /// Base64 of the user's cryptographic signet.
    pub user_signet: String,
    /// Base64 fingerprint of the organizational signet.
    pub org_fingerprint: String,
}

/// Formats the envelope block for one chunk.
pub fn format_envelope(
    chunk: ChunkType,
    user_id: &str,
    org_id: &str,
    user_signet_b64: &str,
    org_fingerprint_b64: &str,
) -> Result<String> {
    for (label, value) in [
        ("user id", user_id),
        ("org id", org_id),
        ("user signet", user_signet_b64),
        ("org fingerprint", org_fingerprint_b64),
    ] {
        if value.is_empty() || value.contains('\n') {
            return Err(SignetError::BadParam(format!("invalid {}", label)));
        }
    }
    Ok(format!(
        "{}: {}\nOrganization: {}\nFingerprint: {}\nSignet: {}\n",
        chunk.role(),
        user_id,
        org_id,
        org_fingerprint_b64,
        user_signet_b64
    ))
}

/// Parses an envelope block of the given chunk type.
pub fn parse_envelope(bytes: &[u8], chunk: ChunkType) -> Result<EnvelopeBlock> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| SignetError::Format("envelope block is not valid UTF-8".into()))?;
    let mut lines = text.lines();

    let role_prefix = format!("{}: ", chunk.role());
    let user_id = expect_line(lines.next(), &role_prefix)?;
    let org_id = expect_line(lines.next(), "Organization: ")?;
    let org_fingerprint = expect_line(lines.next(), "Fingerprint: ")?;
    let user_signet = expect_line(lines.next(), "Signet: ")?;
    if lines.next().is_some_and(|l| !l.is_empty()) {
        return Err(SignetError::Format("trailing data after envelope block".into()));
    }

    Ok(EnvelopeBlock {
        user_id,
        org_id,
        user_signet,
        org_fingerprint,
    })
}

fn expect_line(line: Option<&str>, prefix: &str) -> Result<String> {
    let line = line.ok_or_else(|| SignetError::Format("envelope block truncated".into()))?;
    line.strip_prefix(prefix)
        .filter(|rest| !rest.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| SignetError::Format(format!("expected line starting with {:?}", prefix)))
}
