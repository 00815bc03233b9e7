use super::{collect, write_pooled, Section};
use crate::error::PayloadResult;
use crate::null_bitmap::Nulls;
use crate::writer::PayloadWriter;
use plb_types::ValueResult;
use plb_vector::{LiteralVector, Value, ValueVector, VectorRef};
use std::sync::Arc;

/// Reference layout over 8-byte pool entries.
pub(super) fn encode(
    w: &mut PayloadWriter,
    vector: &dyn ValueVector,
    nulls: Nulls,
) -> PayloadResult<()> {
    let values = collect(vector, |row| vector.get_int64(row))?;
    write_pooled(w, &values, nulls, |a, b| a == b, |cache, buf, &value| {
        cache.intern_int64(buf, value)
    })
}

pub(super) fn decode(section: Section) -> PayloadResult<VectorRef> {
    if section.is_literal()? {
        let value = section.literal_u64()? as i64;
        return Ok(
            LiteralVector::with_type(section.ty, Value::Int64(value), section.rows).into_ref(),
        );
    }
    section.ensure_rows(section.start, 4)?;
    Ok(Arc::new(Int64Column { section }))
}

#[derive(Debug)]
struct Int64Column {
    section: Section,
}

impl ValueVector for Int64Column {
    section_vector!();

    fn get_int64(&self, row: usize) -> ValueResult<i64> {
        self.section.check(row);
        Ok(self.section.pooled_u64(row)? as i64)
    }
}
