use super::{collect, write_pooled, Section};
use crate::error::PayloadResult;
use crate::null_bitmap::Nulls;
use crate::writer::PayloadWriter;
use plb_types::ValueResult;
use plb_vector::{LiteralVector, Value, ValueVector, VectorRef};
use std::sync::Arc;

pub(super) fn encode(
    w: &mut PayloadWriter,
    vector: &dyn ValueVector,
    nulls: Nulls,
) -> PayloadResult<()> {
    let values = collect(vector, |row| vector.get_float64(row))?;
    write_pooled(
        w,
        &values,
        nulls,
        |a, b| a.to_bits() == b.to_bits(),
        |cache, buf, &value| cache.intern_float64(buf, value),
    )
}

pub(super) fn decode(section: Section) -> PayloadResult<VectorRef> {
    if section.is_literal()? {
        let value = f64::from_bits(section.literal_u64()?);
        return Ok(
            LiteralVector::with_type(section.ty, Value::Float64(value), section.rows).into_ref(),
        );
    }
    section.ensure_rows(section.start, 4)?;
    Ok(Arc::new(Float64Column { section }))
}

#[derive(Debug)]
struct Float64Column {
    section: Section,
}

impl ValueVector for Float64Column {
    section_vector!();

    fn get_float64(&self, row: usize) -> ValueResult<f64> {
        self.section.check(row);
        Ok(f64::from_bits(self.section.pooled_u64(row)?))
    }
}
