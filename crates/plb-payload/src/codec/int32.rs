use super::{collect, Section, LITERAL, REGULAR};
use crate::error::PayloadResult;
use crate::null_bitmap::Nulls;
use crate::wire::read_u32;
use crate::writer::PayloadWriter;
use plb_types::ValueResult;
use plb_vector::{LiteralVector, Value, ValueVector, VectorRef};
use std::sync::Arc;

/// LITERAL: 4 bytes. REGULAR: 4 bytes per row, zero for null rows.
pub(super) fn encode(
    w: &mut PayloadWriter,
    vector: &dyn ValueVector,
    nulls: Nulls,
) -> PayloadResult<()> {
    let values = collect(vector, |row| vector.get_int32(row))?;
    if let Some(&value) = w.literal_candidate(&values, nulls, |a, b| a == b) {
        w.buf.push(LITERAL);
        w.buf.extend_from_slice(&value.to_be_bytes());
        return Ok(());
    }
    w.buf.push(REGULAR);
    for value in &values {
        w.buf.extend_from_slice(&value.unwrap_or(0).to_be_bytes());
    }
    Ok(())
}

pub(super) fn decode(section: Section) -> PayloadResult<VectorRef> {
    if section.is_literal()? {
        let value = read_u32(&section.data, section.start)? as i32;
        return Ok(
            LiteralVector::with_type(section.ty, Value::Int32(value), section.rows).into_ref(),
        );
    }
    section.ensure_rows(section.start, 4)?;
    Ok(Arc::new(Int32Column { section }))
}

#[derive(Debug)]
struct Int32Column {
    section: Section,
}

impl ValueVector for Int32Column {
    section_vector!();

    fn get_int32(&self, row: usize) -> ValueResult<i32> {
        self.section.check(row);
        Ok(read_u32(&self.section.data, self.section.start + row * 4)? as i32)
    }
}
