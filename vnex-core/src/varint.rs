//! Format-specific variable-length integers.
//!
//! Several engine directories pack offsets, sizes, and even the individual
//! character codes of entry names as a big-endian-grouped varint: each byte
//! contributes its top 7 bits to the accumulated value, and a set low bit
//! marks the final byte. The accumulated value is right-shifted by one at
//! the end to drop the terminator flag.
//!
//! This decoding is byte-for-byte compatible with the containers that use
//! it; it is not LEB128.

use crate::error::{Result, VnexError};
use crate::stream::MemoryStream;

/// Maximum encoded length of a 32-bit value (5 bytes of 7 payload bits).
const MAX_BYTES: u32 = 5;

/// Read one packed u32 from the stream.
pub fn read_packed_u32(stream: &mut MemoryStream<'_>) -> Result<u32> {
    let mut value: u32 = 0;
    let mut read = 0u32;
    while value & 1 == 0 {
        if read == MAX_BYTES {
            return Err(VnexError::corrupt(
                stream.tell(),
                "packed integer longer than 5 bytes",
            ));
        }
        value = (value << 7) | stream.read_u8()? as u32;
        read += 1;
    }
    Ok(value >> 1)
}
