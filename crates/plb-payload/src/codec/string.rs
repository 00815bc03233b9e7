use super::{collect, write_pooled, Section};
use crate::error::PayloadResult;
use crate::null_bitmap::Nulls;
use crate::varint::read_len;
use crate::wire::{deref, slice};
use crate::writer::PayloadWriter;
use bytes::Bytes;
use plb_types::{Utf8String, ValueResult};
use plb_vector::{LiteralVector, Value, ValueVector, VectorRef};
use std::sync::Arc;

/// Reference layout over `[varint len][utf8]` pool entries.
pub(super) fn encode(
    w: &mut PayloadWriter,
    vector: &dyn ValueVector,
    nulls: Nulls,
) -> PayloadResult<()> {
    let values = collect(vector, |row| vector.get_string(row))?;
    write_pooled(w, &values, nulls, |a, b| a == b, |cache, buf, value| {
        cache.intern_string(buf, value)
    })
}

fn read_entry(data: &Bytes, pos: usize) -> PayloadResult<Utf8String> {
    let (len, start) = read_len(data, pos)?;
    Ok(Utf8String::from_utf8(slice(data, start, len)?))
}

pub(super) fn decode(section: Section) -> PayloadResult<VectorRef> {
    if section.is_literal()? {
        let value = read_entry(&section.data, deref(&section.data, section.start)?)?;
        return Ok(
            LiteralVector::with_type(section.ty, Value::String(value), section.rows).into_ref(),
        );
    }
    section.ensure_rows(section.start, 4)?;
    Ok(Arc::new(StringColumn { section }))
}

/// Strings alias the payload buffer; nothing is copied until a caller asks for `&str`.
#[derive(Debug)]
struct StringColumn {
    section: Section,
}

impl ValueVector for StringColumn {
    section_vector!();

    fn get_string(&self, row: usize) -> ValueResult<Utf8String> {
        self.section.check(row);
        match self.section.target(row)? {
            Some(target) => Ok(read_entry(&self.section.data, target)?),
            None => Ok(Utf8String::empty()),
        }
    }
}
