use super::{collect, decode as decode_vector, Section, REGULAR};
use crate::error::{PayloadError, PayloadResult};
use crate::varint::{read_len, write_varint};
use crate::wire::{deref, ensure, patch_u32, position, span, to_u32};
use crate::writer::PayloadWriter;
use bytes::Bytes;
use plb_types::{Schema, ValueResult};
use plb_vector::{LiteralVector, TupleVector, ValueVector, VectorRef};
use std::sync::Arc;

/// REGULAR only: `[varint columnCount]` then a reference header; each target is a tuple cell.
pub(super) fn encode(
    w: &mut PayloadWriter,
    vector: &dyn ValueVector,
    schema: &Schema,
) -> PayloadResult<()> {
    let values = collect(vector, |row| vector.get_table(row))?;
    w.buf.push(REGULAR);
    write_varint(&mut w.buf, to_u32(schema.len())?);
    let header = w.reserve_refs(values.len())?;
    for (row, value) in values.iter().enumerate() {
        if let Some(tuple) = value {
            let target = position(&w.buf)?;
            patch_u32(&mut w.buf, header + row * 4, target);
            write_tuple_cell(w, tuple.row_count(), schema, |ordinal| {
                tuple.column(ordinal).map(|column| column.as_ref())
            })?;
        }
    }
    Ok(())
}

/// Write `[varint rowCount][columnCount x u32 column offsets][column vector writes]`.
///
/// Schema columns that `column` has no vector for are written as all-null.
pub(super) fn write_tuple_cell<'a>(
    w: &mut PayloadWriter,
    rows: usize,
    schema: &Schema,
    column: impl Fn(usize) -> Option<&'a dyn ValueVector>,
) -> PayloadResult<()> {
    write_varint(&mut w.buf, to_u32(rows)?);
    let offsets = w.reserve_refs(schema.len())?;
    for (ordinal, slot) in schema.columns().iter().enumerate() {
        let target = position(&w.buf)?;
        patch_u32(&mut w.buf, offsets + ordinal * 4, target);
        match column(ordinal) {
            Some(vector) => w.write_vector(vector, &slot.ty)?,
            None => w.write_vector(&LiteralVector::null(slot.ty.clone(), rows), &slot.ty)?,
        }
    }
    Ok(())
}

/// Read a tuple cell written with `stored_columns` columns as `schema`.
///
/// Stored columns past the end of `schema` are skipped; schema columns past the stored ones
/// read as null.
pub(super) fn read_tuple_cell(
    data: &Bytes,
    pos: usize,
    stored_columns: usize,
    schema: &Schema,
) -> PayloadResult<TupleVector> {
    let (rows, offsets) = read_len(data, pos)?;
    ensure(data, offsets, span(stored_columns, 4)?)?;
    let columns = schema
        .columns()
        .iter()
        .enumerate()
        .map(|(ordinal, slot)| {
            if ordinal >= stored_columns {
                return Ok(LiteralVector::null(slot.ty.clone(), rows).into_ref());
            }
            let target = deref(data, offsets + ordinal * 4)?;
            let vector = decode_vector(data, target, &slot.ty)?;
            if vector.size() != rows {
                return Err(PayloadError::corrupt(
                    target,
                    format!(
                        "column {ordinal} has {} rows in a tuple of {rows}",
                        vector.size()
                    ),
                ));
            }
            Ok(vector)
        })
        .collect::<PayloadResult<Vec<_>>>()?;
    Ok(TupleVector::with_row_count(schema.clone(), rows, columns)?)
}

pub(super) fn decode(section: Section, schema: &Schema) -> PayloadResult<VectorRef> {
    section.expect_regular()?;
    let (stored_columns, header) = read_len(&section.data, section.start)?;
    section.ensure_rows(header, 4)?;
    Ok(Arc::new(TableColumn {
        section,
        schema: schema.clone(),
        stored_columns,
        header,
    }))
}

/// Each cell is decoded into a fresh [`TupleVector`] on access.
#[derive(Debug)]
struct TableColumn {
    section: Section,
    schema: Schema,
    stored_columns: usize,
    header: usize,
}

impl ValueVector for TableColumn {
    section_vector!();

    fn get_table(&self, row: usize) -> ValueResult<TupleVector> {
        self.section.check(row);
        if self.section.is_null(row) {
            return Ok(TupleVector::empty());
        }
        let data = &self.section.data;
        let target = deref(data, self.header + row * 4)?;
        Ok(read_tuple_cell(
            data,
            target,
            self.stored_columns,
            &self.schema,
        )?)
    }
}
