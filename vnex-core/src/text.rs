//! Legacy text decoding for entry names.
//!
//! Engine containers from the era predate UTF-8; names are typically
//! Shift_JIS. Valid UTF-8 passes through unchanged so modern repacks keep
//! working.

use crate::error::{Result, VnexError};
use encoding_rs::SHIFT_JIS;

/// Decode entry-name bytes: UTF-8 when valid, Shift_JIS otherwise.
pub fn decode_name(bytes: &[u8]) -> Result<String> {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return Ok(s.to_owned());
    }
    let (decoded, _, had_errors) = SHIFT_JIS.decode(bytes);
    if had_errors {
        return Err(VnexError::encoding(format!(
            "entry name is neither UTF-8 nor Shift_JIS: {bytes:02x?}"
        )));
    }
    Ok(decoded.into_owned())
}
