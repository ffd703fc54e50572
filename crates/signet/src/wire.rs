//! Big-endian integer packing for the DIME wire format.
//!
//! The signet and keychain formats use only two integer widths: 2 bytes for
//! magic numbers and medium length prefixes, 3 bytes for payload lengths.
//! Every read here is bounds-checked; a short buffer is a `Format` error,
//! never a panic.

use dime_types::dime::UNSIGNED_MAX_3_BYTE;
use dime_types::error::SignetError;
use dime_types::Result;

/// Appends a 2-byte big-endian integer.
pub fn put_u2be(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_be_bytes());
}

/// Appends a 3-byte big-endian integer.
///
/// Values above the 3-byte ceiling are a `Format` error.
pub fn put_u3be(buf: &mut Vec<u8>, value: u32) -> Result<()> {
    if value > UNSIGNED_MAX_3_BYTE {
        return Err(SignetError::Format(format!(
            "value {} exceeds the 3-byte length ceiling",
            value
        )));
    }
    let [_, b1, b2, b3] = value.to_be_bytes();
    buf.extend_from_slice(&[b1, b2, b3]);
    Ok(())
}

/// Reads a 2-byte big-endian integer at `at`.
pub fn get_u2be(buf: &[u8], at: usize) -> Result<u16> {
    let end = at
        .checked_add(2)
        .ok_or_else(|| SignetError::Format("offset overflow".into()))?;
    let bytes = buf
        .get(at..end)
        .ok_or_else(|| SignetError::Format("buffer too short for 2-byte integer".into()))?;
    let mut value = [0u8; 2];
    value.copy_from_slice(bytes);
    Ok(u16::from_be_bytes(value))
}

/// Reads a 3-byte big-endian integer at `at`.
pub fn get_u3be(buf: &[u8], at: usize) -> Result<u32> {
    let end = at
        .checked_add(3)
        .ok_or_else(|| SignetError::Format("offset overflow".into()))?;
    let bytes = buf
        .get(at..end)
        .ok_or_else(|| SignetError::Format("buffer too short for 3-byte integer".into()))?;
    let mut value = [0u8; 4];
    value[1..].copy_from_slice(bytes);
    Ok(u32::from_be_bytes(value))
}

/// Reads one byte at `at`.
pub fn get_u8(buf: &[u8], at: usize) -> Result<u8> {
    buf.get(at)
        .copied()
        .ok_or_else(|| SignetError::Format("buffer too short for 1-byte integer".into()))
}

/// Extracts `len` bytes starting at `at`.
pub fn take(buf: &[u8], at: usize, len: usize) -> Result<&[u8]> {
    let end = at
        .checked_add(len)
        .ok_or_else(|| SignetError::Format("offset overflow".into()))?;
    buf.get(at..end)
        .ok_or_else(|| SignetError::Format("declared length exceeds remaining buffer".into()))
}
