//! PEM framing and strict base64 for signet and keychain files.
//!
//! A DIME file on disk is a single PEM block whose body is the base64 of the
//! binary record. Decoding is strict: the tag must match exactly and only
//! standard line folds are tolerated inside the body. The `*_secret`
//! variants keep every intermediate in a zeroizing buffer for key-bearing
//! content.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use dime_crypto::SensitiveBytes;
use dime_types::error::SignetError;
use dime_types::Result;
use std::fs;
use std::path::Path;
use zeroize::Zeroizing;

const LINE_WIDTH: usize = 64;

fn begin_marker(tag: &str) -> String {
    format!("-----BEGIN {}-----", tag)
}

fn end_marker(tag: &str) -> String {
    format!("-----END {}-----", tag)
}

/// Wraps `body` into a PEM block with the given tag.
pub fn pem_encode(tag: &str, body: &[u8]) -> String {
    let folded = fold(&BASE64.encode(body));
    format!("{}\n{}{}\n", begin_marker(tag), folded, end_marker(tag))
}

fn fold(b64: &str) -> String {
    let mut out = String::with_capacity(b64.len() + b64.len() / LINE_WIDTH + 1);
    let mut rest = b64;
    while !rest.is_empty() {
        let split = rest.len().min(LINE_WIDTH);
        let (line, tail) = rest.split_at(split);
        out.push_str(line);
        out.push('\n');
        rest = tail;
    }
    out
}

/// Extracts and decodes the body of a PEM block with the given tag.
///
/// The tag must match exactly; a missing or mismatched marker is a `Format`
/// error.
pub fn pem_decode(text: &str, tag: &str) -> Result<Vec<u8>> {
    let body = collect_body(text, tag)?;
    decode_body(&body)
}

/// As [`pem_decode`], but returns a zeroizing buffer and wipes the folded
/// base64 intermediate before returning on every path.
pub fn pem_decode_secret(text: &str, tag: &str) -> Result<SensitiveBytes> {
    let body = Zeroizing::new(collect_body(text, tag)?);
    decode_body(&body).map(SensitiveBytes::new)
}

fn collect_body(text: &str, tag: &str) -> Result<String> {
    let begin = begin_marker(tag);
    let end = end_marker(tag);
    let mut body = String::new();
    let mut inside = false;
    let mut complete = false;

    for line in text.lines() {
        let line = line.trim_end();
        if !inside {
            if line == begin {
                inside = true;
            } else if line.starts_with("-----BEGIN ") {
                return Err(SignetError::Format(format!(
                    "PEM tag mismatch: expected {:?}",
                    tag
                )));
            }
        } else if line == end {
            complete = true;
            break;
        } else {
            body.push_str(line);
        }
    }

    if !inside {
        return Err(SignetError::Format(format!(
            "no PEM block with tag {:?}",
            tag
        )));
    }
    if !complete {
        return Err(SignetError::Format(format!(
            "unterminated PEM block with tag {:?}",
            tag
        )));
    }
    Ok(body)
}

fn decode_body(body: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(body.as_bytes())
        .map_err(|e| SignetError::Format(format!("invalid base64 in PEM body: {}", e)))
}

/// Reads and decodes a PEM file with the given tag.
pub fn read_pem_file(path: &Path, tag: &str) -> Result<Vec<u8>> {
    let text = fs::read_to_string(path)
        .map_err(|e| SignetError::Io(format!("could not read {}: {}", path.display(), e)))?;
    pem_decode(&text, tag)
}

/// Encodes `body` and writes it as a PEM file.
pub fn write_pem_file(path: &Path, tag: &str, body: &[u8]) -> Result<()> {
    fs::write(path, pem_encode(tag, body))
        .map_err(|e| SignetError::Io(format!("could not write {}: {}", path.display(), e)))
}

/// Reads a key-bearing PEM file, wiping the raw text and the base64
/// intermediate before returning.
pub fn read_pem_file_secret(path: &Path, tag: &str) -> Result<SensitiveBytes> {
    let raw = Zeroizing::new(
        fs::read(path)
            .map_err(|e| SignetError::Io(format!("could not read {}: {}", path.display(), e)))?,
    );
    let text = std::str::from_utf8(&raw)
        .map_err(|_| SignetError::Format("PEM file is not valid UTF-8".into()))?;
    pem_decode_secret(text, tag)
}

/// Writes a key-bearing PEM file, wiping the armored text before returning.
pub fn write_pem_file_secret(path: &Path, tag: &str, body: &[u8]) -> Result<()> {
    let text = Zeroizing::new(pem_encode(tag, body));
    fs::write(path, text.as_bytes())
        .map_err(|e| SignetError::Io(format!("could not write {}: {}", path.display(), e)))
}
