//! Value pools shared by every column of one write.
//!
//! Pooled values (64-bit numbers, date-times, strings and decimals) are appended to the buffer
//! once and then referenced by absolute position.

use crate::error::PayloadResult;
use crate::varint::write_varint;
use crate::wire::{position, to_u32};
use ahash::AHashMap;
use num_bigint::BigInt;
use plb_types::{Decimal, Utf8String};

#[derive(Debug, Default)]
pub(crate) struct WriteCache {
    int64: AHashMap<i64, u32>,
    float64: AHashMap<u64, u32>,
    string: AHashMap<Utf8String, u32>,
    decimal: AHashMap<(BigInt, u32), u32>,
}

impl WriteCache {
    pub(crate) fn clear(&mut self) {
        self.int64.clear();
        self.float64.clear();
        self.string.clear();
        self.decimal.clear();
    }

    /// Also used for date-times, which store their epoch milliseconds.
    pub(crate) fn intern_int64(&mut self, buf: &mut Vec<u8>, value: i64) -> PayloadResult<u32> {
        if let Some(&pos) = self.int64.get(&value) {
            return Ok(pos);
        }
        let pos = position(buf)?;
        buf.extend_from_slice(&value.to_be_bytes());
        self.int64.insert(value, pos);
        Ok(pos)
    }

    /// Keyed by bit pattern: `-0.0` and `0.0` are distinct, equal NaNs share an entry.
    pub(crate) fn intern_float64(&mut self, buf: &mut Vec<u8>, value: f64) -> PayloadResult<u32> {
        let bits = value.to_bits();
        if let Some(&pos) = self.float64.get(&bits) {
            return Ok(pos);
        }
        let pos = position(buf)?;
        buf.extend_from_slice(&bits.to_be_bytes());
        self.float64.insert(bits, pos);
        Ok(pos)
    }

    pub(crate) fn intern_string(
        &mut self,
        buf: &mut Vec<u8>,
        value: &Utf8String,
    ) -> PayloadResult<u32> {
        if let Some(&pos) = self.string.get(value) {
            return Ok(pos);
        }
        let pos = position(buf)?;
        let bytes = value.as_bytes();
        write_varint(buf, to_u32(bytes.len())?);
        buf.extend_from_slice(bytes);
        self.string.insert(value.clone(), pos);
        Ok(pos)
    }

    /// Keyed by `(unscaled, scale)`, so `1.0` and `1.00` are pooled separately. The unscaled
    /// value is written in its shortest big-endian two's complement form.
    pub(crate) fn intern_decimal(
        &mut self,
        buf: &mut Vec<u8>,
        value: &Decimal,
    ) -> PayloadResult<u32> {
        let key = value.canonical_key();
        if let Some(&pos) = self.decimal.get(&key) {
            return Ok(pos);
        }
        let pos = position(buf)?;
        let unscaled = key.0.to_signed_bytes_be();
        write_varint(buf, to_u32(unscaled.len())?);
        buf.extend_from_slice(&unscaled);
        write_varint(buf, key.1);
        self.decimal.insert(key, pos);
        Ok(pos)
    }
}
