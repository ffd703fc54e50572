//! Static field catalogs for the three signet kinds.
//!
//! Each catalog maps a field identifier (1..255) to the structural rules for
//! that field: whether it is required for a valid signet, whether it may
//! repeat, how its name and data lengths are encoded, and how its payload is
//! rendered in dumps. The catalogs are immutable after initialization and
//! shared by every parser and builder in the process.

use crate::dime::SignetKind;
use crate::error::SignetError;
use once_cell::sync::Lazy;

/// Byte length of an Ed25519 public signing-key field.
pub const SIGNING_KEY_FIELD_SIZE: u32 = 32;
/// Byte length of a compressed curve public encryption-key field.
pub const ENCRYPTION_KEY_FIELD_SIZE: u32 = 33;
/// Byte length of an Ed25519 signature field.
pub const SIGNATURE_FIELD_SIZE: u32 = 64;
/// Byte length of a secondary organizational key field: one permission
/// byte followed by the 32-byte public key.
pub const SOK_FIELD_SIZE: u32 = 33;

/// Dump format of a field payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDataKind {
    /// Rendered as base64.
    B64,
    /// Rendered as lowercase hex.
    Hex,
    /// PNG image data, rendered as a size annotation.
    Png,
    /// UTF-8 text.
    Unicode,
}

/// Structural rules for one field identifier within one signet kind.
#[derive(Debug, Clone, Copy)]
pub struct FieldKey {
    /// The signet is incomplete without this field.
    pub required: bool,
    /// At most one occurrence of this field is permitted.
    pub unique: bool,
    /// Width of the name-length preamble: 0 (no name) or 1.
    pub bytes_name_size: u8,
    /// Width of the data-length prefix: 0 (fixed size), 1, 2 or 3.
    pub bytes_data_size: u8,
    /// Fixed payload size; meaningful only when `bytes_data_size` is 0.
    pub data_size: u32,
    /// Dump format for the payload.
    pub data_kind: FieldDataKind,
    /// Human label.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
}

impl FieldKey {
    const fn fixed(
        required: bool,
        unique: bool,
        data_size: u32,
        data_kind: FieldDataKind,
        name: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            required,
            unique,
            bytes_name_size: 0,
            bytes_data_size: 0,
            data_size,
            data_kind,
            name,
            description,
        }
    }

    const fn variable(
        unique: bool,
        bytes_data_size: u8,
        data_kind: FieldDataKind,
        name: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            required: false,
            unique,
            bytes_name_size: 0,
            bytes_data_size,
            data_size: 0,
            data_kind,
            name,
            description,
        }
    }

    const fn named(name: &'static str, description: &'static str) -> Self {
        Self {
            required: false,
            unique: false,
            bytes_name_size: 1,
            bytes_data_size: 2,
            data_size: 0,
            data_kind: FieldDataKind::Unicode,
            name,
            description,
        }
    }
}

/// Organizational signet field identifiers.
#[allow(missing_docs)]
pub mod org_fid {
    /// The Ed25519 public signing key of the signet holder.
    pub const POK: u8 = 1;
    /// Secondary organizational signing keys.
    pub const SOK: u8 = 2;
    /// The curve public encryption key of the signet holder.
    pub const ENC_KEY: u8 = 3;
    /// Organizational signature over all previous fields.
    pub const CRYPTO_SIG: u8 = 4;
    pub const NAME: u8 = 16;
    pub const ADDRESS: u8 = 17;
    pub const PROVINCE: u8 = 18;
    pub const COUNTRY: u8 = 19;
    pub const POSTAL: u8 = 20;
    pub const PHONE: u8 = 21;
    pub const LANGUAGE: u8 = 22;
    pub const CURRENCY: u8 = 23;
    pub const CRYPTOCURRENCY: u8 = 24;
    pub const MOTTO: u8 = 25;
    pub const EXTENSIONS: u8 = 26;
    pub const MSG_SIZE_LIM: u8 = 27;
    pub const WEBSITE: u8 = 160;
    pub const ABUSE: u8 = 200;
    pub const ADMIN: u8 = 201;
    pub const SUPPORT: u8 = 202;
    pub const WEB_HOST: u8 = 203;
    pub const WEB_LOCATION: u8 = 204;
    pub const WEB_CERT: u8 = 205;
    pub const MAIL_HOST: u8 = 206;
    pub const MAIL_CERT: u8 = 207;
    pub const ONION_ACCESS_HOST: u8 = 208;
    pub const ONION_ACCESS_CERT: u8 = 209;
    pub const ONION_DELIVERY_HOST: u8 = 210;
    pub const ONION_DELIVERY_CERT: u8 = 211;
    /// Caller-named attribute field.
    pub const UNDEFINED: u8 = 251;
    /// Organizational photo.
    pub const PHOTO: u8 = 252;
    /// Organizational signature over all preceding fields.
    pub const FULL_SIG: u8 = 253;
    /// Organizational signet identifier.
    pub const ID: u8 = 254;
    /// Organizational signature following the identifier field.
    pub const ID_SIG: u8 = 255;
}

/// User signet field identifiers.
#[allow(missing_docs)]
pub mod user_fid {
    /// The Ed25519 public signing key of the signet holder.
    pub const SIGN_KEY: u8 = 1;
    /// The curve public encryption key of the signet holder.
    pub const ENC_KEY: u8 = 2;
    /// Alternative encryption keys for the user.
    pub const ALT_KEY: u8 = 3;
    /// Chain-of-custody signature by the user's previous signing key.
    pub const COC_SIG: u8 = 4;
    /// User self-signature with the user's signing key.
    pub const SSR_SIG: u8 = 5;
    /// Initial countersignature by the organization's signing key.
    pub const CRYPTO_SIG: u8 = 6;
    pub const NAME: u8 = 16;
    pub const ADDRESS: u8 = 17;
    pub const PROVINCE: u8 = 18;
    pub const COUNTRY: u8 = 19;
    pub const POSTAL: u8 = 20;
    pub const PHONE: u8 = 21;
    pub const LANGUAGE: u8 = 22;
    pub const CURRENCY: u8 = 23;
    pub const CRYPTOCURRENCY: u8 = 24;
    pub const MOTTO: u8 = 25;
    pub const EXTENSIONS: u8 = 26;
    pub const MSG_SIZE_LIM: u8 = 27;
    pub const CODECS: u8 = 93;
    pub const TITLE: u8 = 94;
    pub const EMPLOYER: u8 = 95;
    pub const GENDER: u8 = 96;
    pub const ALMA_MATER: u8 = 97;
    pub const SUPERVISOR: u8 = 98;
    pub const POLITICAL_PARTY: u8 = 99;
    pub const ALTERNATE_ADDRESS: u8 = 200;
    pub const RESUME: u8 = 201;
    pub const ENDORSEMENTS: u8 = 202;
    /// Caller-named attribute field.
    pub const UNDEFINED: u8 = 251;
    /// User photo.
    pub const PHOTO: u8 = 252;
    /// Final organizational signature.
    pub const FULL_SIG: u8 = 253;
    /// User signet identifier.
    pub const ID: u8 = 254;
    /// Organizational signature following the identifier field.
    pub const ID_SIG: u8 = 255;
}

/// SSR field identifiers (the user cryptographic prefix only).
#[allow(missing_docs)]
pub mod ssr_fid {
    pub const SIGN_KEY: u8 = 1;
    pub const ENC_KEY: u8 = 2;
    pub const ALT_KEY: u8 = 3;
    pub const COC_SIG: u8 = 4;
    pub const SSR_SIG: u8 = 5;
}

/// Organizational keychain record identifiers.
#[allow(missing_docs)]
pub mod keys_org_fid {
    pub const POK: u8 = 1;
    pub const SOK: u8 = 2;
    pub const ENC: u8 = 3;
}

/// User keychain record identifiers.
#[allow(missing_docs)]
pub mod keys_user_fid {
    pub const SIGN: u8 = 1;
    pub const ENC: u8 = 2;
}

bitflags::bitflags! {
    /// Signing scopes granted to a secondary organizational key.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SokPermissions: u8 {
        /// May sign signets.
        const SIGNET = 1;
        /// May sign messages.
        const MSG = 2;
        /// May sign TLS certificates.
        const TLS = 4;
        /// May sign software releases.
        const SOFTWARE = 8;
    }
}

/// A decoded secondary organizational key field: one permission byte
/// followed by the 32-byte Ed25519 public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sok {
    /// Signing scopes granted to this key.
    pub permissions: SokPermissions,
    /// The public signing key.
    pub key: [u8; 32],
}

impl Sok {
    /// Encodes the field payload.
    pub fn encode(&self) -> [u8; SOK_FIELD_SIZE as usize] {
        let mut out = [0u8; SOK_FIELD_SIZE as usize];
        out[0] = self.permissions.bits();
        out[1..].copy_from_slice(&self.key);
        out
    }

    /// Decodes a SOK field payload.
    pub fn decode(data: &[u8]) -> Result<Self, SignetError> {
        if data.len() != SOK_FIELD_SIZE as usize {
            return Err(SignetError::Format(format!(
                "secondary key field expects {} bytes, got {}",
                SOK_FIELD_SIZE,
                data.len()
            )));
        }
        let (head, tail) = data.split_at(1);
        let permissions = SokPermissions::from_bits(head[0]).ok_or_else(|| {
            SignetError::Format(format!("unknown secondary key permission bits {:#04x}", head[0]))
        })?;
        let mut key = [0u8; 32];
        key.copy_from_slice(tail);
        Ok(Self { permissions, key })
    }
}

type Catalog = [Option<FieldKey>; 256];

fn profile_attributes(table: &mut Catalog) {
    use FieldDataKind::Unicode;
    let attrs: [(u8, &'static str, &'static str); 12] = [
        (16, "Name", "Name of the signet holder"),
        (17, "Address", "Street address"),
        (18, "Province", "Province or state"),
        (19, "Country", "Country"),
        (20, "Postal-Code", "Postal code"),
        (21, "Phone-Number", "Phone number"),
        (22, "Language", "Preferred language"),
        (23, "Currency", "Preferred currency"),
        (24, "Cryptocurrency", "Cryptocurrency wallet address"),
        (25, "Motto", "Motto"),
        (26, "Extensions", "Supported protocol extensions"),
        (27, "Message-Size-Limit", "Largest accepted message size"),
    ];
    for (id, name, description) in attrs {
        table[id as usize] = Some(FieldKey::variable(true, 2, Unicode, name, description));
    }
}

static ORG_FIELD_KEYS: Lazy<Catalog> = Lazy::new(|| {
    use FieldDataKind::{Hex, Png, Unicode, B64};
    let mut t: Catalog = [None; 256];
    t[org_fid::POK as usize] = Some(FieldKey::fixed(
        true,
        true,
        SIGNING_KEY_FIELD_SIZE,
        Hex,
        "Primary-Organizational-Key",
        "Ed25519 public signing key of the organization",
    ));
    t[org_fid::SOK as usize] = Some(FieldKey::fixed(
        false,
        false,
        SOK_FIELD_SIZE,
        Hex,
        "Secondary-Organizational-Key",
        "Scoped secondary Ed25519 signing key",
    ));
    t[org_fid::ENC_KEY as usize] = Some(FieldKey::fixed(
        true,
        true,
        ENCRYPTION_KEY_FIELD_SIZE,
        Hex,
        "Encryption-Key",
        "Compressed curve public encryption key",
    ));
    t[org_fid::CRYPTO_SIG as usize] = Some(FieldKey::fixed(
        true,
        true,
        SIGNATURE_FIELD_SIZE,
        B64,
        "Cryptographic-Signature",
        "Organizational signature over the cryptographic fields",
    ));
    profile_attributes(&mut t);
    t[org_fid::WEBSITE as usize] = Some(FieldKey::variable(
        true,
        2,
        Unicode,
        "Website",
        "Organization website",
    ));
    let endpoints: [(u8, &'static str, FieldDataKind); 12] = [
        (org_fid::ABUSE, "Abuse", Unicode),
        (org_fid::ADMIN, "Admin", Unicode),
        (org_fid::SUPPORT, "Support", Unicode),
        (org_fid::WEB_HOST, "Web-Host", Unicode),
        (org_fid::WEB_LOCATION, "Web-Location", Unicode),
        (org_fid::WEB_CERT, "Web-Certificate", B64),
        (org_fid::MAIL_HOST, "Mail-Host", Unicode),
        (org_fid::MAIL_CERT, "Mail-Certificate", B64),
        (org_fid::ONION_ACCESS_HOST, "Onion-Access-Host", Unicode),
        (org_fid::ONION_ACCESS_CERT, "Onion-Access-Certificate", B64),
        (org_fid::ONION_DELIVERY_HOST, "Onion-Delivery-Host", Unicode),
        (org_fid::ONION_DELIVERY_CERT, "Onion-Delivery-Certificate", B64),
    ];
    for (id, name, kind) in endpoints {
        t[id as usize] = Some(FieldKey::variable(true, 2, kind, name, "Service endpoint"));
    }
    t[org_fid::UNDEFINED as usize] = Some(FieldKey::named(
        "Undefined-Field",
        "Caller-named attribute",
    ));
    t[org_fid::PHOTO as usize] = Some(FieldKey::variable(
        true,
        3,
        Png,
        "Photo",
        "Organizational photo",
    ));
    t[org_fid::FULL_SIG as usize] = Some(FieldKey::fixed(
        false,
        true,
        SIGNATURE_FIELD_SIZE,
        B64,
        "Full-Signature",
        "Organizational signature over all preceding fields",
    ));
    t[org_fid::ID as usize] = Some(FieldKey::variable(
        true,
        2,
        Unicode,
        "Signet-Identifier",
        "Organizational signet identifier",
    ));
    t[org_fid::ID_SIG as usize] = Some(FieldKey::fixed(
        false,
        true,
        SIGNATURE_FIELD_SIZE,
        B64,
        "Identifiable-Signature",
        "Organizational signature covering the identifier",
    ));
    t
});

fn user_crypto_prefix(table: &mut Catalog) {
    use FieldDataKind::{Hex, B64};
    table[user_fid::SIGN_KEY as usize] = Some(FieldKey::fixed(
        true,
        true,
        SIGNING_KEY_FIELD_SIZE,
        Hex,
        "Signing-Key",
        "Ed25519 public signing key of the user",
    ));
    table[user_fid::ENC_KEY as usize] = Some(FieldKey::fixed(
        true,
        true,
        ENCRYPTION_KEY_FIELD_SIZE,
        Hex,
        "Encryption-Key",
        "Compressed curve public encryption key",
    ));
    table[user_fid::ALT_KEY as usize] = Some(FieldKey::variable(
        false,
        1,
        B64,
        "Alternate-Encryption-Key",
        "Alternative encryption key",
    ));
    table[user_fid::COC_SIG as usize] = Some(FieldKey::fixed(
        false,
        true,
        SIGNATURE_FIELD_SIZE,
        B64,
        "Chain-Of-Custody-Signature",
        "Signature by the user's previous signing key",
    ));
    table[user_fid::SSR_SIG as usize] = Some(FieldKey::fixed(
        true,
        true,
        SIGNATURE_FIELD_SIZE,
        B64,
        "Self-Signature",
        "User self-signature over the cryptographic fields",
    ));
}

static USER_FIELD_KEYS: Lazy<Catalog> = Lazy::new(|| {
    use FieldDataKind::{Png, Unicode, B64};
    let mut t: Catalog = [None; 256];
    user_crypto_prefix(&mut t);
    t[user_fid::CRYPTO_SIG as usize] = Some(FieldKey::fixed(
        false,
        true,
        SIGNATURE_FIELD_SIZE,
        B64,
        "Cryptographic-Signature",
        "Countersignature by the issuing organization",
    ));
    profile_attributes(&mut t);
    let extended: [(u8, &'static str); 7] = [
        (user_fid::CODECS, "Codecs"),
        (user_fid::TITLE, "Title"),
        (user_fid::EMPLOYER, "Employer"),
        (user_fid::GENDER, "Gender"),
        (user_fid::ALMA_MATER, "Alma-Mater"),
        (user_fid::SUPERVISOR, "Supervisor"),
        (user_fid::POLITICAL_PARTY, "Political-Party"),
    ];
    for (id, name) in extended {
        t[id as usize] = Some(FieldKey::variable(true, 2, Unicode, name, "User attribute"));
    }
    t[user_fid::ALTERNATE_ADDRESS as usize] = Some(FieldKey::variable(
        false,
        2,
        Unicode,
        "Alternate-Address",
        "Additional mail address",
    ));
    t[user_fid::RESUME as usize] = Some(FieldKey::variable(
        true,
        3,
        B64,
        "Resume",
        "Resume document",
    ));
    t[user_fid::ENDORSEMENTS as usize] = Some(FieldKey::variable(
        true,
        2,
        B64,
        "Endorsements",
        "Third-party endorsements",
    ));
    t[user_fid::UNDEFINED as usize] = Some(FieldKey::named(
        "Undefined-Field",
        "Caller-named attribute",
    ));
    t[user_fid::PHOTO as usize] = Some(FieldKey::variable(true, 3, Png, "Photo", "User photo"));
    t[user_fid::FULL_SIG as usize] = Some(FieldKey::fixed(
        false,
        true,
        SIGNATURE_FIELD_SIZE,
        B64,
        "Full-Signature",
        "Organizational signature over all preceding fields",
    ));
    t[user_fid::ID as usize] = Some(FieldKey::variable(
        true,
        2,
        Unicode,
        "Signet-Identifier",
        "User signet identifier",
    ));
    t[user_fid::ID_SIG as usize] = Some(FieldKey::fixed(
        false,
        true,
        SIGNATURE_FIELD_SIZE,
        B64,
        "Identifiable-Signature",
        "Organizational signature covering the identifier",
    ));
    t
});

static SSR_FIELD_KEYS: Lazy<Catalog> = Lazy::new(|| {
    let mut t: Catalog = [None; 256];
    user_crypto_prefix(&mut t);
    t
});

/// The full catalog for a signet kind.
pub fn field_keys(kind: SignetKind) -> &'static Catalog {
    match kind {
        SignetKind::Org => &ORG_FIELD_KEYS,
        SignetKind::User => &USER_FIELD_KEYS,
        SignetKind::Ssr => &SSR_FIELD_KEYS,
    }
}

/// Looks up the catalog entry for one field id, or `None` when the id is
/// undefined for the kind.
pub fn field_key(kind: SignetKind, id: u8) -> Option<&'static FieldKey> {
    field_keys(kind)[id as usize].as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_fields_per_kind() {
        for id in [org_fid::POK, org_fid::ENC_KEY, org_fid::CRYPTO_SIG] {
            assert!(field_key(SignetKind::Org, id).unwrap().required);
        }
        for id in [user_fid::SIGN_KEY, user_fid::ENC_KEY, user_fid::SSR_SIG] {
            assert!(field_key(SignetKind::User, id).unwrap().required);
            assert!(field_key(SignetKind::Ssr, id).unwrap().required);
        }
        assert!(!field_key(SignetKind::User, user_fid::CRYPTO_SIG).unwrap().required);
    }

    #[test]
    fn signature_fields_are_sixty_four_bytes() {
        for (kind, id) in [
            (SignetKind::Org, org_fid::CRYPTO_SIG),
            (SignetKind::Org, org_fid::FULL_SIG),
            (SignetKind::Org, org_fid::ID_SIG),
            (SignetKind::User, user_fid::COC_SIG),
            (SignetKind::User, user_fid::SSR_SIG),
            (SignetKind::User, user_fid::CRYPTO_SIG),
            (SignetKind::User, user_fid::FULL_SIG),
            (SignetKind::User, user_fid::ID_SIG),
            (SignetKind::Ssr, ssr_fid::SSR_SIG),
        ] {
            let key = field_key(kind, id).unwrap();
            assert_eq!(key.bytes_data_size, 0);
            assert_eq!(key.data_size, SIGNATURE_FIELD_SIZE);
            assert!(key.unique);
        }
    }

    #[test]
    fn kind_catalogs_are_disjoint_where_expected() {
        // User-only cryptographic ids are undefined for org signets.
        assert!(field_key(SignetKind::Org, 5).is_none());
        assert!(field_key(SignetKind::Org, 6).is_none());
        // SSRs carry nothing beyond the cryptographic prefix.
        for id in 6..=255u8 {
            assert!(field_key(SignetKind::Ssr, id).is_none(), "ssr id {id}");
        }
    }

    #[test]
    fn named_field_shape() {
        let key = field_key(SignetKind::Org, org_fid::UNDEFINED).unwrap();
        assert_eq!(key.bytes_name_size, 1);
        assert_eq!(key.bytes_data_size, 2);
        assert!(!key.unique);
    }

    #[test]
    fn sok_permission_bits() {
        let all = SokPermissions::SIGNET
            | SokPermissions::MSG
            | SokPermissions::TLS
            | SokPermissions::SOFTWARE;
        assert_eq!(all.bits(), 15);
        assert_eq!(SokPermissions::from_bits(16), None);
    }

    #[test]
    fn sok_encode_decode() {
        let sok = Sok {
            permissions: SokPermissions::SIGNET | SokPermissions::TLS,
            key: [0x7E; 32],
        };
        let encoded = sok.encode();
        assert_eq!(encoded[0], 5);
        assert_eq!(Sok::decode(&encoded).unwrap(), sok);
        assert!(Sok::decode(&encoded[1..]).is_err());

        let mut bad_bits = encoded;
        bad_bits[0] = 0xF0;
        assert!(Sok::decode(&bad_bits).is_err());
    }
}
