use super::{collect, Section, LITERAL, REGULAR};
use crate::error::PayloadResult;
use crate::null_bitmap::{bit, pack_bits, Nulls};
use crate::wire::read_u8;
use crate::writer::PayloadWriter;
use plb_types::ValueResult;
use plb_vector::{LiteralVector, Value, ValueVector, VectorRef};
use std::sync::Arc;

/// LITERAL: one byte. REGULAR: packed bits, `ceil(rows / 8)` bytes.
pub(super) fn encode(
    w: &mut PayloadWriter,
    vector: &dyn ValueVector,
    nulls: Nulls,
) -> PayloadResult<()> {
    let values = collect(vector, |row| vector.get_boolean(row))?;
    if let Some(&value) = w.literal_candidate(&values, nulls, |a, b| a == b) {
        w.buf.extend_from_slice(&[LITERAL, u8::from(value)]);
        return Ok(());
    }
    w.buf.push(REGULAR);
    let bits = pack_bits(values.iter().map(|v| v.unwrap_or(false)));
    w.buf.extend_from_slice(&bits);
    Ok(())
}

pub(super) fn decode(section: Section) -> PayloadResult<VectorRef> {
    if section.is_literal()? {
        let value = read_u8(&section.data, section.start)? != 0;
        return Ok(
            LiteralVector::with_type(section.ty, Value::Boolean(value), section.rows).into_ref(),
        );
    }
    crate::wire::ensure(&section.data, section.start, section.rows.div_ceil(8))?;
    Ok(Arc::new(BooleanColumn { section }))
}

#[derive(Debug)]
struct BooleanColumn {
    section: Section,
}

impl ValueVector for BooleanColumn {
    section_vector!();

    fn get_boolean(&self, row: usize) -> ValueResult<bool> {
        self.section.check(row);
        Ok(bit(&self.section.data[self.section.start..], row))
    }
}
