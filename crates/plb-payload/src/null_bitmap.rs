//! Null bitmaps written at the start of every vector.
//!
//! `[varint byteLength][bytes]`, where `byteLength` is:
//! - `0` when no row is null (no bytes follow);
//! - the row count when every row is null (no bytes follow, and the vector write ends there);
//! - `ceil(rows / 8)` otherwise, with bit `i % 8` of byte `i / 8` set for null row `i`.

use crate::error::{PayloadError, PayloadResult};
use crate::varint::{read_len, write_varint};
use crate::wire::{slice, to_u32};
use bytes::Bytes;
use plb_vector::ValueVector;

/// Decoded null bitmap. Lookups read the stored bytes directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NullBitmap {
    NoNulls,
    AllNull,
    Bitmap(Bytes),
}

/// What [`write_null_bitmap`] found in the written range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nulls {
    None,
    Some,
    All,
}

impl NullBitmap {
    pub fn is_null(&self, row: usize) -> bool {
        match self {
            NullBitmap::NoNulls => false,
            NullBitmap::AllNull => true,
            NullBitmap::Bitmap(bits) => bit(bits, row),
        }
    }

    pub fn has_nulls(&self) -> bool {
        !matches!(self, NullBitmap::NoNulls)
    }

    /// Read a bitmap for `row_count` rows at `pos`, returning it and the position after it.
    pub fn read(data: &Bytes, pos: usize, row_count: usize) -> PayloadResult<(Self, usize)> {
        let (byte_len, next) = read_len(data, pos)?;
        if byte_len == 0 {
            return Ok((NullBitmap::NoNulls, next));
        }
        if byte_len == row_count {
            return Ok((NullBitmap::AllNull, next));
        }
        if byte_len != row_count.div_ceil(8) {
            return Err(PayloadError::corrupt(
                pos,
                format!("null bitmap of {byte_len} bytes for {row_count} rows"),
            ));
        }
        let bits = slice(data, next, byte_len)?;
        Ok((NullBitmap::Bitmap(bits), next + byte_len))
    }
}

/// Bit `index` of a little-endian-within-byte bit array; `false` past the end.
pub(crate) fn bit(bits: &[u8], index: usize) -> bool {
    bits.get(index / 8)
        .map_or(false, |byte| (byte >> (index % 8)) & 1 == 1)
}

/// Pack `values` eight to a byte, first value in the least significant bit.
pub(crate) fn pack_bits(values: impl ExactSizeIterator<Item = bool>) -> Vec<u8> {
    let mut out = vec![0u8; values.len().div_ceil(8)];
    for (i, set) in values.enumerate() {
        if set {
            out[i / 8] |= 1 << (i % 8);
        }
    }
    out
}

/// Write the bitmap for rows `from..to` of `vector`.
pub fn write_null_bitmap(
    buf: &mut Vec<u8>,
    vector: &dyn ValueVector,
    from: usize,
    to: usize,
) -> PayloadResult<Nulls> {
    let row_count = to - from;
    let nulls: Vec<bool> = (from..to).map(|row| vector.is_null(row)).collect();
    let null_count = nulls.iter().filter(|&&n| n).count();

    if null_count == 0 {
        write_varint(buf, 0);
        return Ok(Nulls::None);
    }
    if null_count == row_count {
        write_varint(buf, to_u32(row_count)?);
        return Ok(Nulls::All);
    }
    let bits = pack_bits(nulls.into_iter());
    write_varint(buf, to_u32(bits.len())?);
    buf.extend_from_slice(&bits);
    Ok(Nulls::Some)
}
