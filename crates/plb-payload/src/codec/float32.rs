use super::{collect, Section, LITERAL, REGULAR};
use crate::error::PayloadResult;
use crate::null_bitmap::Nulls;
use crate::wire::read_u32;
use crate::writer::PayloadWriter;
use plb_types::ValueResult;
use plb_vector::{LiteralVector, Value, ValueVector, VectorRef};
use std::sync::Arc;

/// Same layout as int32, holding IEEE-754 bit patterns.
pub(super) fn encode(
    w: &mut PayloadWriter,
    vector: &dyn ValueVector,
    nulls: Nulls,
) -> PayloadResult<()> {
    let values = collect(vector, |row| vector.get_float32(row))?;
    if let Some(&value) = w.literal_candidate(&values, nulls, |a, b| a.to_bits() == b.to_bits()) {
        w.buf.push(LITERAL);
        w.buf.extend_from_slice(&value.to_bits().to_be_bytes());
        return Ok(());
    }
    w.buf.push(REGULAR);
    for value in &values {
        w.buf
            .extend_from_slice(&value.map_or(0, f32::to_bits).to_be_bytes());
    }
    Ok(())
}

pub(super) fn decode(section: Section) -> PayloadResult<VectorRef> {
    if section.is_literal()? {
        let value = f32::from_bits(read_u32(&section.data, section.start)?);
        return Ok(
            LiteralVector::with_type(section.ty, Value::Float32(value), section.rows).into_ref(),
        );
    }
    section.ensure_rows(section.start, 4)?;
    Ok(Arc::new(Float32Column { section }))
}

#[derive(Debug)]
struct Float32Column {
    section: Section,
}

impl ValueVector for Float32Column {
    section_vector!();

    fn get_float32(&self, row: usize) -> ValueResult<f32> {
        self.section.check(row);
        let bits = read_u32(&self.section.data, self.section.start + row * 4)?;
        Ok(f32::from_bits(bits))
    }
}
