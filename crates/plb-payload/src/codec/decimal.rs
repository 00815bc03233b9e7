use super::{collect, write_pooled, Section};
use crate::error::{PayloadError, PayloadResult};
use crate::null_bitmap::Nulls;
use crate::varint::{read_len, read_varint};
use crate::wire::{deref, ensure};
use crate::writer::PayloadWriter;
use num_bigint::BigInt;
use plb_types::{Decimal, ValueResult};
use plb_vector::{LiteralVector, Value, ValueVector, VectorRef};
use std::sync::Arc;

/// Reference layout over `[varint len][unscaled, two's complement][varint scale]` entries.
pub(super) fn encode(
    w: &mut PayloadWriter,
    vector: &dyn ValueVector,
    nulls: Nulls,
) -> PayloadResult<()> {
    let values = collect(vector, |row| vector.get_decimal(row))?;
    write_pooled(
        w,
        &values,
        nulls,
        |a, b| a.canonical_key() == b.canonical_key(),
        |cache, buf, value| cache.intern_decimal(buf, value),
    )
}

fn read_entry(data: &[u8], pos: usize) -> PayloadResult<Decimal> {
    let (len, start) = read_len(data, pos)?;
    if len == 0 {
        return Err(PayloadError::corrupt(pos, "empty decimal"));
    }
    ensure(data, start, len)?;
    let unscaled = BigInt::from_signed_bytes_be(&data[start..start + len]);
    let (scale, _) = read_varint(data, start + len)?;
    Ok(Decimal::from_parts(unscaled, scale))
}

pub(super) fn decode(section: Section) -> PayloadResult<VectorRef> {
    if section.is_literal()? {
        let value = read_entry(&section.data, deref(&section.data, section.start)?)?;
        return Ok(
            LiteralVector::with_type(section.ty, Value::Decimal(value), section.rows).into_ref(),
        );
    }
    section.ensure_rows(section.start, 4)?;
    Ok(Arc::new(DecimalColumn { section }))
}

#[derive(Debug)]
struct DecimalColumn {
    section: Section,
}

impl ValueVector for DecimalColumn {
    section_vector!();

    fn get_decimal(&self, row: usize) -> ValueResult<Decimal> {
        self.section.check(row);
        match self.section.target(row)? {
            Some(target) => Ok(read_entry(&self.section.data, target)?),
            None => Ok(Decimal::zero()),
        }
    }
}
