use super::table::{read_tuple_cell, write_tuple_cell};
use super::{collect, Section, REGULAR};
use crate::error::{PayloadError, PayloadResult};
use crate::varint::{read_len, write_varint};
use crate::wire::to_u32;
use crate::writer::PayloadWriter;
use plb_types::{ResolvedType, Schema, ValueResult};
use plb_vector::{ObjectVector, TupleVector, Value, ValueVector, VectorRef};
use std::sync::Arc;

/// REGULAR only: `[varint columnCount]` then one inline tuple cell with a row per object.
pub(super) fn encode(
    w: &mut PayloadWriter,
    vector: &dyn ValueVector,
    schema: &Schema,
) -> PayloadResult<()> {
    let objects = collect(vector, |row| vector.get_object(row))?;
    w.buf.push(REGULAR);
    write_varint(&mut w.buf, to_u32(schema.len())?);
    let fields: Vec<FieldColumn<'_>> = schema
        .columns()
        .iter()
        .enumerate()
        .map(|(ordinal, column)| FieldColumn {
            ty: column.ty.clone(),
            objects: &objects,
            ordinal,
        })
        .collect();
    write_tuple_cell(w, objects.len(), schema, |ordinal| {
        fields.get(ordinal).map(|field| field as &dyn ValueVector)
    })
}

/// One field of every object, gathered into a column for writing.
#[derive(Debug)]
struct FieldColumn<'a> {
    ty: ResolvedType,
    objects: &'a [Option<ObjectVector>],
    ordinal: usize,
}

impl ValueVector for FieldColumn<'_> {
    fn resolved_type(&self) -> &ResolvedType {
        &self.ty
    }

    fn size(&self) -> usize {
        self.objects.len()
    }

    fn is_null(&self, row: usize) -> bool {
        self.objects[row]
            .as_ref()
            .map_or(true, |object| object.is_null(self.ordinal))
    }

    fn get_any(&self, row: usize) -> ValueResult<Value> {
        match &self.objects[row] {
            Some(object) => object.get_any(self.ordinal),
            None => Ok(Value::Null),
        }
    }
}

pub(super) fn decode(section: Section, schema: &Schema) -> PayloadResult<VectorRef> {
    section.expect_regular()?;
    let (stored_columns, cell) = read_len(&section.data, section.start)?;
    let tuple = read_tuple_cell(&section.data, cell, stored_columns, schema)?;
    if tuple.row_count() != section.rows {
        return Err(PayloadError::corrupt(
            cell,
            format!(
                "object fields hold {} rows for {} objects",
                tuple.row_count(),
                section.rows
            ),
        ));
    }
    Ok(Arc::new(ObjectColumn { section, tuple }))
}

/// Objects share one decoded tuple; row `r` is object `r`.
#[derive(Debug)]
struct ObjectColumn {
    section: Section,
    tuple: TupleVector,
}

impl ValueVector for ObjectColumn {
    section_vector!();

    fn get_object(&self, row: usize) -> ValueResult<ObjectVector> {
        self.section.check(row);
        ObjectVector::new(self.tuple.clone(), row)
    }
}
