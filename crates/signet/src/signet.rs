//! The signet container: parse, serialize, field access and the builder.
//!
//! A signet is a 5-byte header followed by a stream of field records in
//! non-decreasing field-id order. The container owns the payload bytes and
//! an index from field id to the offset of the byte immediately after the
//! id's first occurrence; the index is rebuilt from scratch on every parse
//! and after every mutation.

use crate::armor;
use crate::wire;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use dime_crypto::{sha256, SigningKeyPair};
use dime_types::dime::{SignetKind, SIGNET_HEADER_SIZE, SIGNET_MAX_SIZE, SIGNET_PEM_TAG};
use dime_types::error::SignetError;
use dime_types::fields::{field_key, org_fid, user_fid, FieldDataKind, FieldKey, Sok};
use dime_types::Result;
use std::io::Write;
use std::path::Path;

/// One decoded field record, borrowing the container payload.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Record<'a> {
    pub id: u8,
    pub name: Option<&'a [u8]>,
    pub data: &'a [u8],
    /// Offset of the id byte within the payload.
    pub start: usize,
    /// Offset one past the last data byte.
    pub end: usize,
}

/// A parsed or under-construction signet.
#[derive(Clone)]
pub struct Signet {
    kind: SignetKind,
    payload: Vec<u8>,
    /// Offset of the byte after the first occurrence of each field id.
    field_index: [Option<u32>; 256],
    frozen: bool,
}

impl Signet {
    /// Creates an empty builder-phase signet of the given kind.
    pub fn new(kind: SignetKind) -> Self {
        Self {
            kind,
            payload: Vec::new(),
            field_index: [None; 256],
            frozen: false,
        }
    }

    /// Parses a serialized signet, validating the header, the field stream
    /// and catalog conformance.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < SIGNET_HEADER_SIZE {
            return Err(SignetError::Format("buffer shorter than signet header".into()));
        }
        if bytes.len() > SIGNET_MAX_SIZE {
            return Err(SignetError::Format("buffer exceeds the maximum signet size".into()));
        }

        let magic = wire::get_u2be(bytes, 0)?;
        let number = dime_types::dime::DimeNumber::from_magic(magic)
            .ok_or_else(|| SignetError::Format(format!("unrecognized DIME magic {}", magic)))?;
        let kind = SignetKind::from_magic(number).ok_or_else(|| {
            SignetError::Format(format!("DIME number is not a signet type: {}", number.label()))
        })?;

        let declared = wire::get_u3be(bytes, 2)? as usize;
        if declared != bytes.len() - SIGNET_HEADER_SIZE {
            return Err(SignetError::Format(format!(
                "declared length {} does not match the {} payload bytes present",
                declared,
                bytes.len() - SIGNET_HEADER_SIZE
            )));
        }

        let payload = wire::take(bytes, SIGNET_HEADER_SIZE, declared)?.to_vec();
        let mut signet = Self {
            kind,
            payload,
            field_index: [None; 256],
            frozen: false,
        };
        signet.reindex()?;
        Ok(signet)
    }

    /// The signet kind.
    pub fn kind(&self) -> SignetKind {
        self.kind
    }

    /// The raw field stream.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Whether the builder phase has ended.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Ends the builder phase; all further mutation is rejected.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Serializes the signet: header plus field stream.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(SIGNET_HEADER_SIZE + self.payload.len());
        wire::put_u2be(&mut out, self.kind.magic().as_u16());
        // The payload length is kept below the 3-byte ceiling by every
        // mutation path, so the header write cannot fail.
        let [_, b1, b2, b3] = (self.payload.len() as u32).to_be_bytes();
        out.extend_from_slice(&[b1, b2, b3]);
        out.extend_from_slice(&self.payload);
        out
    }

    /// The serialized signet as standard base64.
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.serialize())
    }

    /// Parses a signet from standard base64.
    pub fn from_base64(text: &str) -> Result<Self> {
        let bytes = BASE64
            .decode(text.as_bytes())
            .map_err(|e| SignetError::Format(format!("invalid base64: {}", e)))?;
        Self::parse(&bytes)
    }

    /// Reads a signet from a PEM file.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::parse(&armor::read_pem_file(path, SIGNET_PEM_TAG)?)
    }

    /// Writes the signet to a PEM file.
    pub fn to_file(&self, path: &Path) -> Result<()> {
        armor::write_pem_file(path, SIGNET_PEM_TAG, &self.serialize())
    }

    /// Returns the data of the first occurrence of `id`, if present.
    pub fn get_field(&self, id: u8) -> Option<&[u8]> {
        let after_id = self.field_index[id as usize]? as usize;
        let key = field_key(self.kind, id)?;
        self.decode_record(id, key, after_id - 1).ok().map(|r| r.data)
    }

    /// Returns the data of every occurrence of `id`, in payload order.
    pub fn get_fields(&self, id: u8) -> Vec<&[u8]> {
        self.records()
            .filter(|r| r.id == id)
            .map(|r| r.data)
            .collect()
    }

    /// The name attached to the first occurrence of a named field.
    pub fn get_field_name(&self, id: u8) -> Option<&[u8]> {
        self.records().find(|r| r.id == id).and_then(|r| r.name)
    }

    /// Inserts or replaces an unnamed field in ascending id order.
    ///
    /// Unique fields are replaced in place; repeatable fields are appended
    /// after the last existing occurrence of the same id.
    pub fn set_field(&mut self, id: u8, data: &[u8]) -> Result<()> {
        let key = self.writable_key(id)?;
        if key.bytes_name_size != 0 {
            return Err(SignetError::BadParam(format!(
                "field {} carries a name; use set_named_field",
                id
            )));
        }
        self.insert_record(id, key, None, data)
    }

    /// Inserts a named (caller-labelled) field in ascending id order.
    pub fn set_named_field(&mut self, id: u8, name: &[u8], data: &[u8]) -> Result<()> {
        let key = self.writable_key(id)?;
        if key.bytes_name_size == 0 {
            return Err(SignetError::BadParam(format!(
                "field {} does not carry a name",
                id
            )));
        }
        if name.is_empty() || name.len() > dime_types::dime::FIELD_NAME_MAX_SIZE {
            return Err(SignetError::BadParam(format!(
                "field name length {} out of range",
                name.len()
            )));
        }
        self.insert_record(id, key, Some(name), data)
    }

    /// Removes the `occurrence`-th record with the given id (zero-based).
    pub fn remove_field(&mut self, id: u8, occurrence: usize) -> Result<()> {
        if self.frozen {
            return Err(SignetError::Unspec("signet is frozen".into()));
        }
        let range = self
            .records()
            .filter(|r| r.id == id)
            .nth(occurrence)
            .map(|r| r.start..r.end)
            .ok_or_else(|| {
                SignetError::BadParam(format!("field {} occurrence {} not present", id, occurrence))
            })?;
        self.payload.drain(range);
        self.reindex()
    }

    /// SHA-256 fingerprint of the header and every field record with id
    /// strictly below `cutoff_id`.
    ///
    /// The 3-byte length in the hashed header is recomputed for the covered
    /// prefix, so a fingerprint taken before later fields were appended
    /// remains reproducible afterwards.
    pub fn fingerprint(&self, cutoff_id: u8) -> Result<[u8; 32]> {
        let prefix_len = self
            .records()
            .find(|r| r.id >= cutoff_id)
            .map(|r| r.start)
            .unwrap_or(self.payload.len());
        let prefix = wire::take(&self.payload, 0, prefix_len)?;

        let mut message = Vec::with_capacity(SIGNET_HEADER_SIZE + prefix_len);
        wire::put_u2be(&mut message, self.kind.magic().as_u16());
        wire::put_u3be(&mut message, prefix_len as u32)?;
        message.extend_from_slice(prefix);

        sha256(&message).map_err(|e| SignetError::Crypto(e.to_string()))
    }

    /// SHA-256 fingerprint of the entire serialized signet.
    pub fn fingerprint_full(&self) -> Result<[u8; 32]> {
        sha256(&self.serialize()).map_err(|e| SignetError::Crypto(e.to_string()))
    }

    /// Signs the SSR self-signature with the holder's signing key.
    pub fn sign_ssr(&mut self, signing_key: &SigningKeyPair) -> Result<()> {
        match self.kind {
            SignetKind::User | SignetKind::Ssr => {}
            SignetKind::Org => {
                return Err(SignetError::BadParam(
                    "organizational signets carry no SSR signature".into(),
                ))
            }
        }
        self.require(user_fid::SIGN_KEY)?;
        self.require(user_fid::ENC_KEY)?;
        self.sign_field(user_fid::SSR_SIG, signing_key)
    }

    /// Signs the chain-of-custody signature with the holder's previous
    /// signing key.
    pub fn sign_coc(&mut self, previous_key: &SigningKeyPair) -> Result<()> {
        match self.kind {
            SignetKind::User | SignetKind::Ssr => {}
            SignetKind::Org => {
                return Err(SignetError::BadParam(
                    "organizational signets carry no chain of custody".into(),
                ))
            }
        }
        self.require(user_fid::SIGN_KEY)?;
        self.sign_field(user_fid::COC_SIG, previous_key)
    }

    /// Signs the cryptographic signature: the organization's self-signature
    /// on an org signet, or its countersignature on a user signet.
    pub fn sign_crypto(&mut self, org_key: &SigningKeyPair) -> Result<()> {
        match self.kind {
            SignetKind::Org => {
                self.require(org_fid::POK)?;
                self.require(org_fid::ENC_KEY)?;
                self.sign_field(org_fid::CRYPTO_SIG, org_key)
            }
            SignetKind::User => {
                self.require(user_fid::SSR_SIG)?;
                self.sign_field(user_fid::CRYPTO_SIG, org_key)
            }
            SignetKind::Ssr => Err(SignetError::BadParam(
                "signing requests take no organizational signature".into(),
            )),
        }
    }

    /// Signs the full signature covering every preceding field.
    pub fn sign_full(&mut self, org_key: &SigningKeyPair) -> Result<()> {
        let crypto_sig = match self.kind {
            SignetKind::Org => org_fid::CRYPTO_SIG,
            SignetKind::User => user_fid::CRYPTO_SIG,
            SignetKind::Ssr => {
                return Err(SignetError::BadParam(
                    "signing requests take no organizational signature".into(),
                ))
            }
        };
        self.require(crypto_sig)?;
        self.sign_field(org_fid::FULL_SIG, org_key)
    }

    /// Sets the identifier field and signs the identifiable signature.
    pub fn sign_id(&mut self, identifier: &[u8], org_key: &SigningKeyPair) -> Result<()> {
        if self.kind == SignetKind::Ssr {
            return Err(SignetError::BadParam(
                "signing requests take no identifier".into(),
            ));
        }
        if identifier.is_empty() {
            return Err(SignetError::BadParam("empty signet identifier".into()));
        }
        self.require(org_fid::FULL_SIG)?;
        self.set_field(org_fid::ID, identifier)?;
        self.sign_field(org_fid::ID_SIG, org_key)
    }

    /// Appends a secondary organizational key field.
    pub fn add_sok(&mut self, sok: &Sok) -> Result<()> {
        if self.kind != SignetKind::Org {
            return Err(SignetError::BadParam(
                "only organizational signets carry secondary keys".into(),
            ));
        }
        self.set_field(org_fid::SOK, &sok.encode())
    }

    /// Decodes every secondary organizational key field.
    pub fn soks(&self) -> Result<Vec<Sok>> {
        self.get_fields(org_fid::SOK)
            .into_iter()
            .map(Sok::decode)
            .collect()
    }

    /// Renders every field with its catalog label.
    pub fn dump(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(
            out,
            "{} ({} payload bytes)",
            self.kind.magic().label(),
            self.payload.len()
        )?;
        for record in self.records() {
            let label = field_key(self.kind, record.id)
                .map(|k| k.name)
                .unwrap_or("Unknown-Field");
            let rendered = self.render(record.id, record.data);
            match record.name {
                Some(name) => writeln!(
                    out,
                    "  [{:3}] {} ({}): {}",
                    record.id,
                    label,
                    String::from_utf8_lossy(name),
                    rendered
                )?,
                None => writeln!(out, "  [{:3}] {}: {}", record.id, label, rendered)?,
            }
        }
        Ok(())
    }

    fn render(&self, id: u8, data: &[u8]) -> String {
        let kind = field_key(self.kind, id)
            .map(|k| k.data_kind)
            .unwrap_or(FieldDataKind::Hex);
        match kind {
            FieldDataKind::Hex => hex::encode(data),
            FieldDataKind::B64 => BASE64.encode(data),
            FieldDataKind::Png => format!("[PNG image, {} bytes]", data.len()),
            FieldDataKind::Unicode => String::from_utf8_lossy(data).into_owned(),
        }
    }

    /// Iterates over the decoded field records in payload order.
    pub(crate) fn records(&self) -> RecordIter<'_> {
        RecordIter {
            signet: self,
            at: 0,
        }
    }

    fn writable_key(&self, id: u8) -> Result<&'static FieldKey> {
        if self.frozen {
            return Err(SignetError::Unspec("signet is frozen".into()));
        }
        field_key(self.kind, id).ok_or_else(|| {
            SignetError::BadParam(format!("field id {} undefined for this signet kind", id))
        })
    }

    fn require(&self, id: u8) -> Result<()> {
        if self.field_index[id as usize].is_none() {
            let label = field_key(self.kind, id).map(|k| k.name).unwrap_or("field");
            return Err(SignetError::Incomplete(format!(
                "{} (field {}) is not present",
                label, id
            )));
        }
        Ok(())
    }

    fn sign_field(&mut self, sig_id: u8, key: &SigningKeyPair) -> Result<()> {
        let digest = self.fingerprint(sig_id)?;
        let signature = key
            .sign(&digest)
            .map_err(|e| SignetError::Crypto(e.to_string()))?;
        self.set_field(sig_id, &signature)
    }

    fn insert_record(
        &mut self,
        id: u8,
        key: &'static FieldKey,
        name: Option<&[u8]>,
        data: &[u8],
    ) -> Result<()> {
        let max = match key.bytes_data_size {
            0 => key.data_size as usize,
            1 => dime_types::dime::UNSIGNED_MAX_1_BYTE as usize,
            2 => dime_types::dime::UNSIGNED_MAX_2_BYTE as usize,
            3 => dime_types::dime::UNSIGNED_MAX_3_BYTE as usize,
            width => {
                return Err(SignetError::Unspec(format!(
                    "catalog declares impossible length width {}",
                    width
                )))
            }
        };
        if key.bytes_data_size == 0 {
            if data.len() != key.data_size as usize {
                return Err(SignetError::Format(format!(
                    "{} expects exactly {} bytes, got {}",
                    key.name, key.data_size, data.len()
                )));
            }
        } else if data.len() > max {
            return Err(SignetError::Format(format!(
                "{} data length {} exceeds its {}-byte length prefix",
                key.name,
                data.len(),
                key.bytes_data_size
            )));
        }

        // Unique fields are replaced rather than duplicated.
        if key.unique && self.field_index[id as usize].is_some() {
            self.remove_field(id, 0)?;
        }

        let mut record = Vec::with_capacity(1 + 1 + name.map_or(0, <[u8]>::len) + 3 + data.len());
        record.push(id);
        if let Some(name) = name {
            record.push(name.len() as u8);
            record.extend_from_slice(name);
        }
        match key.bytes_data_size {
            0 => {}
            1 => record.push(data.len() as u8),
            2 => wire::put_u2be(&mut record, data.len() as u16),
            _ => wire::put_u3be(&mut record, data.len() as u32)?,
        }
        record.extend_from_slice(data);

        if self.payload.len() + record.len() > dime_types::dime::UNSIGNED_MAX_3_BYTE as usize {
            return Err(SignetError::Format("signet size limit exceeded".into()));
        }

        // Repeated ids append after the last existing occurrence.
        let offset = self
            .records()
            .find(|r| r.id > id)
            .map(|r| r.start)
            .unwrap_or(self.payload.len());
        self.payload.splice(offset..offset, record);
        self.reindex()
    }

    fn decode_record(&self, id: u8, key: &'static FieldKey, start: usize) -> Result<Record<'_>> {
        let mut at = start + 1; // past the id byte
        let name = if key.bytes_name_size == 1 {
            let name_len = wire::get_u8(&self.payload, at)? as usize;
            at += 1;
            let name = wire::take(&self.payload, at, name_len)?;
            at += name_len;
            Some(name)
        } else {
            None
        };
        let data_len = match key.bytes_data_size {
            0 => key.data_size as usize,
            1 => {
                let len = wire::get_u8(&self.payload, at)? as usize;
                at += 1;
                len
            }
            2 => {
                let len = wire::get_u2be(&self.payload, at)? as usize;
                at += 2;
                len
            }
            _ => {
                let len = wire::get_u3be(&self.payload, at)? as usize;
                at += 3;
                len
            }
        };
        let data = wire::take(&self.payload, at, data_len)?;
        Ok(Record {
            id,
            name,
            data,
            start,
            end: at + data_len,
        })
    }

    /// Rebuilds the field index, validating the whole field stream.
    fn reindex(&mut self) -> Result<()> {
        let mut index: [Option<u32>; 256] = [None; 256];
        let mut at = 0usize;
        let mut previous_id = 0u8;

        while at < self.payload.len() {
            let id = wire::get_u8(&self.payload, at)?;
            let key = field_key(self.kind, id).ok_or_else(|| {
                SignetError::Format(format!("field id {} undefined for this signet kind", id))
            })?;
            if id < previous_id {
                return Err(SignetError::Format(format!(
                    "field id {} out of order after {}",
                    id, previous_id
                )));
            }
            match index[id as usize] {
                Some(_) if key.unique => {
                    return Err(SignetError::Format(format!(
                        "duplicate occurrence of unique field {} ({})",
                        id, key.name
                    )));
                }
                Some(_) => {}
                None => index[id as usize] = Some(at as u32 + 1),
            }
            let record = self.decode_record(id, key, at)?;
            at = record.end;
            previous_id = id;
        }

        self.field_index = index;
        Ok(())
    }
}

impl PartialEq for Signet {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.payload == other.payload
    }
}

impl Eq for Signet {}

impl std::fmt::Debug for Signet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signet")
            .field("kind", &self.kind)
            .field("payload_len", &self.payload.len())
            .field("frozen", &self.frozen)
            .finish()
    }
}

pub(crate) struct RecordIter<'a> {
    signet: &'a Signet,
    at: usize,
}

impl<'a> Iterator for RecordIter<'a> {
    type Item = Record<'a>;

    fn next(&mut self) -> Option<Record<'a>> {
        if self.at >= self.signet.payload.len() {
            return None;
        }
        let id = *self.signet.payload.get(self.at)?;
        let key = field_key(self.signet.kind, id)?;
        let record = self.signet.decode_record(id, key, self.at).ok()?;
        self.at = record.end;
        Some(record)
    }
}
