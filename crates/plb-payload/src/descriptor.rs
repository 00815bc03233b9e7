//! Binary type descriptors.
//!
//! A descriptor is one wire tag byte. `Array` is followed by the element descriptor; `Table` and
//! `Object` are followed by `[varint columnCount]` and one descriptor per column. Column names
//! are not stored, so decoded schemas carry synthesized `{type}_{ordinal}` names.

use crate::error::{PayloadError, PayloadResult};
use crate::varint::{read_len, write_varint};
use crate::wire::{read_u8, to_u32};
use plb_types::{synthesized_column_name, Column, ResolvedType, Schema, Type};

/// Deepest nesting accepted when reading, so hostile input cannot exhaust the stack.
pub const MAX_DEPTH: usize = 64;

pub fn write_descriptor(buf: &mut Vec<u8>, ty: &ResolvedType) -> PayloadResult<()> {
    let tag = ty
        .tag()
        .wire_tag()
        .ok_or_else(|| PayloadError::UnsupportedType(ty.clone()))?;
    buf.push(tag);
    match ty {
        ResolvedType::Array(element) => write_descriptor(buf, element),
        ResolvedType::Table(schema) | ResolvedType::Object(schema) => {
            write_varint(buf, to_u32(schema.len())?);
            for column in schema.columns() {
                write_descriptor(buf, &column.ty)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Decode the descriptor at `pos`, returning the type and the position after it.
pub fn read_descriptor(data: &[u8], pos: usize) -> PayloadResult<(ResolvedType, usize)> {
    read_at_depth(data, pos, 0)
}

fn read_at_depth(data: &[u8], pos: usize, depth: usize) -> PayloadResult<(ResolvedType, usize)> {
    if depth > MAX_DEPTH {
        return Err(PayloadError::corrupt(pos, "type nesting too deep"));
    }
    let tag = read_u8(data, pos)?;
    let ty = Type::from_wire_tag(tag).ok_or(PayloadError::UnknownTypeTag(tag))?;
    let next = pos + 1;
    match ty {
        Type::Array => {
            let (element, next) = read_at_depth(data, next, depth + 1)?;
            Ok((ResolvedType::array(element), next))
        }
        Type::Table | Type::Object => {
            let (schema, next) = read_schema(data, next, depth + 1)?;
            let ty = if ty == Type::Table {
                ResolvedType::Table(schema)
            } else {
                ResolvedType::Object(schema)
            };
            Ok((ty, next))
        }
        scalar => ResolvedType::scalar(scalar)
            .map(|ty| (ty, next))
            .ok_or(PayloadError::UnknownTypeTag(tag)),
    }
}

fn read_schema(data: &[u8], pos: usize, depth: usize) -> PayloadResult<(Schema, usize)> {
    let (count, mut next) = read_len(data, pos)?;
    // Every column takes at least one byte.
    let mut columns = Vec::with_capacity(count.min(data.len().saturating_sub(next)));
    for ordinal in 0..count {
        let (ty, after) = read_at_depth(data, next, depth)?;
        columns.push(Column::new(synthesized_column_name(&ty, ordinal), ty));
        next = after;
    }
    Ok((Schema::new(columns), next))
}
