//! Big-endian base-128 integers.
//!
//! Each byte carries 7 bits, most significant group first; every byte except the last has the
//! continuation bit `0x80` set. A `u32` takes at most 5 bytes. A leading `0x80` byte (an empty
//! group with a continuation) is reserved as the null marker and never produced by
//! [`write_varint`].

use crate::error::{PayloadError, PayloadResult};

pub const MAX_VARINT_BYTES: usize = 5;
pub const NULL_MARKER: u8 = 0x80;

/// Number of bytes [`write_varint`] emits for `value`.
pub fn varint_len(value: u32) -> usize {
    let bits = 32 - value.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

pub fn write_varint(buf: &mut Vec<u8>, value: u32) {
    let len = varint_len(value);
    for group in (0..len).rev() {
        let bits = ((value >> (7 * group)) & 0x7F) as u8;
        buf.push(if group == 0 { bits } else { bits | 0x80 });
    }
}

/// Decode the varint at `pos`, returning the value and the position after it.
pub fn read_varint(data: &[u8], pos: usize) -> PayloadResult<(u32, usize)> {
    let first = *data
        .get(pos)
        .ok_or(PayloadError::UnexpectedEof { offset: pos })?;
    if first == NULL_MARKER {
        return Err(PayloadError::InvalidVarint { offset: pos });
    }

    let mut value: u64 = 0;
    for i in 0..MAX_VARINT_BYTES {
        let at = pos + i;
        let byte = *data
            .get(at)
            .ok_or(PayloadError::UnexpectedEof { offset: at })?;
        value = (value << 7) | u64::from(byte & 0x7F);
        if byte & 0x80 == 0 {
            let value =
                u32::try_from(value).map_err(|_| PayloadError::InvalidVarint { offset: pos })?;
            return Ok((value, at + 1));
        }
    }
    Err(PayloadError::InvalidVarint { offset: pos })
}

/// [`read_varint`] widened to a length or count.
pub(crate) fn read_len(data: &[u8], pos: usize) -> PayloadResult<(usize, usize)> {
    let (value, next) = read_varint(data, pos)?;
    Ok((value as usize, next))
}
