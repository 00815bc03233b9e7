//! Bounds-checked big-endian field access over a payload buffer.

use crate::error::{PayloadError, PayloadResult};
use bytes::Bytes;

/// Fail unless `len` bytes are available at `pos`.
pub(crate) fn ensure(data: &[u8], pos: usize, len: usize) -> PayloadResult<()> {
    match pos.checked_add(len) {
        Some(end) if end <= data.len() => Ok(()),
        _ => Err(PayloadError::UnexpectedEof {
            offset: data.len().min(pos),
        }),
    }
}

fn array<const N: usize>(data: &[u8], pos: usize) -> PayloadResult<[u8; N]> {
    ensure(data, pos, N)?;
    let mut out = [0u8; N];
    out.copy_from_slice(&data[pos..pos + N]);
    Ok(out)
}

pub(crate) fn read_u8(data: &[u8], pos: usize) -> PayloadResult<u8> {
    data.get(pos)
        .copied()
        .ok_or(PayloadError::UnexpectedEof { offset: pos })
}

pub(crate) fn read_u32(data: &[u8], pos: usize) -> PayloadResult<u32> {
    array::<4>(data, pos).map(u32::from_be_bytes)
}

pub(crate) fn read_u64(data: &[u8], pos: usize) -> PayloadResult<u64> {
    array::<8>(data, pos).map(u64::from_be_bytes)
}

/// Zero-copy view of `len` bytes at `pos`.
pub(crate) fn slice(data: &Bytes, pos: usize, len: usize) -> PayloadResult<Bytes> {
    ensure(data, pos, len)?;
    Ok(data.slice(pos..pos + len))
}

/// `count * width` bytes, rejecting counts that overflow the address space.
pub(crate) fn span(count: usize, width: usize) -> PayloadResult<usize> {
    count.checked_mul(width).ok_or(PayloadError::TooLarge)
}

/// Resolve a reference read from a header; `0` marks a null row and is invalid here.
pub(crate) fn deref(data: &[u8], header_pos: usize) -> PayloadResult<usize> {
    match read_u32(data, header_pos)? {
        0 => Err(PayloadError::corrupt(
            header_pos,
            "missing reference on a non-null row",
        )),
        target => Ok(target as usize),
    }
}

pub(crate) fn put_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_be_bytes());
}

pub(crate) fn patch_u32(buf: &mut [u8], pos: usize, value: u32) {
    buf[pos..pos + 4].copy_from_slice(&value.to_be_bytes());
}

/// Current buffer length as a reference target.
pub(crate) fn position(buf: &[u8]) -> PayloadResult<u32> {
    u32::try_from(buf.len()).map_err(|_| PayloadError::TooLarge)
}

pub(crate) fn to_u32(value: usize) -> PayloadResult<u32> {
    u32::try_from(value).map_err(|_| PayloadError::TooLarge)
}
