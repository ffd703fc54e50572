//! DIME magic numbers, record kinds and format limits.
//!
//! Every DIME file starts with a two-byte big-endian magic number that
//! discriminates the file kind, followed by a three-byte big-endian payload
//! length. The constants here are the single source of truth for both the
//! signet and keychain formats.

/// Size of the `magic[2] || length[3]` header on signet files.
pub const SIGNET_HEADER_SIZE: usize = 5;

/// Size of the `magic[2] || length[3]` header on keychain files.
pub const KEYS_HEADER_SIZE: usize = 5;

/// Largest legal signet file: the 3-byte length ceiling plus the header.
pub const SIGNET_MAX_SIZE: usize = 16_777_220;

/// Longest name a named (undefined) field may carry.
pub const FIELD_NAME_MAX_SIZE: usize = 255;

/// Largest value representable in a 1-byte length prefix.
pub const UNSIGNED_MAX_1_BYTE: u32 = 255;
/// Largest value representable in a 2-byte length prefix.
pub const UNSIGNED_MAX_2_BYTE: u32 = 65_535;
/// Largest value representable in a 3-byte length prefix.
pub const UNSIGNED_MAX_3_BYTE: u32 = 16_777_215;

/// PEM tag wrapping a serialized signet.
pub const SIGNET_PEM_TAG: &str = "SIGNET";

/// PEM tag wrapping a serialized private keychain.
pub const KEYCHAIN_PEM_TAG: &str = "SIGNET PRIVATE KEYCHAIN";

/// The magic numbers assigned to DIME file kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum DimeNumber {
    /// File contains an organizational signet.
    OrgSignet = 1776,
    /// File contains a user signet.
    UserSignet = 1789,
    /// File contains a signet signing request.
    Ssr = 1216,
    /// File contains organizational private keys.
    OrgKeys = 1952,
    /// File contains user private keys.
    UserKeys = 2013,
    /// File contains message tracing data.
    MsgTracing = 1837,
    /// File contains an encrypted message.
    EncryptedMsg = 1847,
}

impl DimeNumber {
    /// Decodes a magic number, or `None` for an unassigned value.
    pub fn from_magic(magic: u16) -> Option<Self> {
        match magic {
            1776 => Some(Self::OrgSignet),
            1789 => Some(Self::UserSignet),
            1216 => Some(Self::Ssr),
            1952 => Some(Self::OrgKeys),
            2013 => Some(Self::UserKeys),
            1837 => Some(Self::MsgTracing),
            1847 => Some(Self::EncryptedMsg),
            _ => None,
        }
    }

    /// The wire value of this magic number.
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Human-readable label for diagnostics and dumps.
    pub fn label(self) -> &'static str {
        match self {
            Self::OrgSignet => "organizational signet",
            Self::UserSignet => "user signet",
            Self::Ssr => "signet signing request",
            Self::OrgKeys => "organizational keychain",
            Self::UserKeys => "user keychain",
            Self::MsgTracing => "message tracing record",
            Self::EncryptedMsg => "encrypted message",
        }
    }
}

/// The three signet kinds, derived from the file magic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignetKind {
    /// Organizational signet, anchored by the primary organizational key.
    Org,
    /// User signet, countersigned by an organization.
    User,
    /// Signet signing request: a user signet awaiting countersignature.
    Ssr,
}

impl SignetKind {
    /// The magic number serializing this kind.
    pub fn magic(self) -> DimeNumber {
        match self {
            Self::Org => DimeNumber::OrgSignet,
            Self::User => DimeNumber::UserSignet,
            Self::Ssr => DimeNumber::Ssr,
        }
    }

    /// Maps a decoded magic number back to a signet kind.
    pub fn from_magic(number: DimeNumber) -> Option<Self> {
        match number {
            DimeNumber::OrgSignet => Some(Self::Org),
            DimeNumber::UserSignet => Some(Self::User),
            DimeNumber::Ssr => Some(Self::Ssr),
            _ => None,
        }
    }
}

/// The two keychain kinds, derived from the file magic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeysKind {
    /// Private counterparts of an organizational signet.
    Org,
    /// Private counterparts of a user signet.
    User,
}

impl KeysKind {
    /// The magic number serializing this kind.
    pub fn magic(self) -> DimeNumber {
        match self {
            Self::Org => DimeNumber::OrgKeys,
            Self::User => DimeNumber::UserKeys,
        }
    }

    /// Maps a decoded magic number back to a keychain kind.
    pub fn from_magic(number: DimeNumber) -> Option<Self> {
        match number {
            DimeNumber::OrgKeys => Some(Self::Org),
            DimeNumber::UserKeys => Some(Self::User),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_round_trip() {
        for number in [
            DimeNumber::OrgSignet,
            DimeNumber::UserSignet,
            DimeNumber::Ssr,
            DimeNumber::OrgKeys,
            DimeNumber::UserKeys,
            DimeNumber::MsgTracing,
            DimeNumber::EncryptedMsg,
        ] {
            assert_eq!(DimeNumber::from_magic(number.as_u16()), Some(number));
        }
        assert_eq!(DimeNumber::from_magic(0), None);
        assert_eq!(DimeNumber::from_magic(1777), None);
    }

    #[test]
    fn signet_kind_magics() {
        assert_eq!(SignetKind::Org.magic().as_u16(), 1776);
        assert_eq!(SignetKind::User.magic().as_u16(), 1789);
        assert_eq!(SignetKind::Ssr.magic().as_u16(), 1216);
        assert_eq!(SignetKind::from_magic(DimeNumber::OrgKeys), None);
    }

    #[test]
    fn keys_kind_magics() {
        assert_eq!(KeysKind::Org.magic().as_u16(), 1952);
        assert_eq!(KeysKind::User.magic().as_u16(), 2013);
        assert_eq!(KeysKind::from_magic(DimeNumber::Ssr), None);
    }
}
