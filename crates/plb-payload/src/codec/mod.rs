//! Per-type vector encodings.
//!
//! A vector write is `[varint rowCount][null bitmap]` followed, unless every row is null, by
//! `[type version][encoding][payload]`. Each submodule owns the payload layout of one type
//! and the read-only view that decodes it.

/// `resolved_type`, `size` and `is_null` for a view struct with a `section` field.
macro_rules! section_vector {
    () => {
        fn resolved_type(&self) -> &plb_types::ResolvedType {
            &self.section.ty
        }

        fn size(&self) -> usize {
            self.section.rows
        }

        fn is_null(&self, row: usize) -> bool {
            self.section.check(row);
            self.section.is_null(row)
        }
    };
}

mod array;
mod boolean;
mod datetime;
mod decimal;
mod float32;
mod float64;
mod int32;
mod int64;
mod object;
mod string;
mod table;

use crate::error::{PayloadError, PayloadResult};
use crate::null_bitmap::{NullBitmap, Nulls};
use crate::varint::read_len;
use crate::wire::{deref, ensure, patch_u32, put_u32, read_u64, read_u8, span};
use crate::write_cache::WriteCache;
use crate::writer::PayloadWriter;
use bytes::Bytes;
use plb_types::{ResolvedType, Type, ValueResult};
use plb_vector::{check_row, LiteralVector, ValueVector, VectorRef};

pub(crate) const TYPE_VERSION: u8 = 1;
pub(crate) const REGULAR: u8 = 0;
pub(crate) const LITERAL: u8 = 1;

/// Write the type-specific part of a vector: encoding byte and payload.
pub(crate) fn encode(
    w: &mut PayloadWriter,
    vector: &dyn ValueVector,
    ty: &ResolvedType,
    nulls: Nulls,
) -> PayloadResult<()> {
    match ty {
        ResolvedType::Boolean => boolean::encode(w, vector, nulls),
        ResolvedType::Int32 => int32::encode(w, vector, nulls),
        ResolvedType::Int64 => int64::encode(w, vector, nulls),
        ResolvedType::Float32 => float32::encode(w, vector, nulls),
        ResolvedType::Float64 => float64::encode(w, vector, nulls),
        ResolvedType::String => string::encode(w, vector, nulls),
        ResolvedType::DateTime | ResolvedType::DateTimeOffset => datetime::encode(w, vector, nulls),
        ResolvedType::Decimal => decimal::encode(w, vector, nulls),
        ResolvedType::Array(element) => array::encode(w, vector, element),
        ResolvedType::Table(schema) => table::encode(w, vector, schema),
        ResolvedType::Object(schema) => object::encode(w, vector, schema),
        ResolvedType::Any => Err(PayloadError::UnsupportedType(ty.clone())),
    }
}

/// Decode the vector write at `pos` as `ty`.
pub(crate) fn decode(data: &Bytes, pos: usize, ty: &ResolvedType) -> PayloadResult<VectorRef> {
    let (rows, next) = read_len(data, pos)?;
    let (nulls, next) = NullBitmap::read(data, next, rows)?;
    if nulls == NullBitmap::AllNull {
        return Ok(LiteralVector::null(ty.clone(), rows).into_ref());
    }
    let version = read_u8(data, next)?;
    if version != TYPE_VERSION {
        return Err(PayloadError::UnsupportedTypeVersion {
            ty: ty.tag(),
            version,
        });
    }
    let section = Section {
        data: data.clone(),
        ty: ty.clone(),
        rows,
        nulls,
        encoding: read_u8(data, next + 1)?,
        start: next + 2,
    };
    match ty {
        ResolvedType::Boolean => boolean::decode(section),
        ResolvedType::Int32 => int32::decode(section),
        ResolvedType::Int64 => int64::decode(section),
        ResolvedType::Float32 => float32::decode(section),
        ResolvedType::Float64 => float64::decode(section),
        ResolvedType::String => string::decode(section),
        ResolvedType::DateTime | ResolvedType::DateTimeOffset => datetime::decode(section),
        ResolvedType::Decimal => decimal::decode(section),
        ResolvedType::Array(element) => array::decode(section, element),
        ResolvedType::Table(schema) => table::decode(section, schema),
        ResolvedType::Object(schema) => object::decode(section, schema),
        ResolvedType::Any => Err(PayloadError::UnsupportedType(ty.clone())),
    }
}

/// One decoded vector write: where its payload starts and how its rows are laid out.
#[derive(Debug, Clone)]
pub(crate) struct Section {
    pub data: Bytes,
    pub ty: ResolvedType,
    pub rows: usize,
    pub nulls: NullBitmap,
    pub encoding: u8,
    /// First payload byte, just past the encoding byte.
    pub start: usize,
}

impl Section {
    /// `true` for LITERAL, `false` for REGULAR.
    pub fn is_literal(&self) -> PayloadResult<bool> {
        match self.encoding {
            REGULAR => Ok(false),
            LITERAL if self.rows == 0 || self.nulls.has_nulls() => Err(PayloadError::corrupt(
                self.start - 1,
                "literal vector with nulls or no rows",
            )),
            LITERAL => Ok(true),
            encoding => Err(self.unknown_encoding(encoding)),
        }
    }

    /// For types that are never written as literals.
    pub fn expect_regular(&self) -> PayloadResult<()> {
        match self.encoding {
            REGULAR => Ok(()),
            encoding => Err(self.unknown_encoding(encoding)),
        }
    }

    fn unknown_encoding(&self, encoding: u8) -> PayloadError {
        PayloadError::UnknownEncoding {
            ty: self.tag(),
            encoding,
        }
    }

    pub fn tag(&self) -> Type {
        self.ty.tag()
    }

    /// Fail unless `width` bytes per row are present from `pos`.
    pub fn ensure_rows(&self, pos: usize, width: usize) -> PayloadResult<()> {
        ensure(&self.data, pos, span(self.rows, width)?)
    }

    #[track_caller]
    pub fn check(&self, row: usize) {
        check_row(&self.ty, self.rows, row);
    }

    pub fn is_null(&self, row: usize) -> bool {
        self.nulls.is_null(row)
    }

    /// Pool entry referenced by the header slot of `row`, `None` for a null row.
    pub fn target(&self, row: usize) -> PayloadResult<Option<usize>> {
        if self.is_null(row) {
            return Ok(None);
        }
        deref(&self.data, self.start + row * 4).map(Some)
    }

    /// 8-byte pool entry referenced by `row`. Null rows read as 0.
    pub fn pooled_u64(&self, row: usize) -> ValueResult<u64> {
        match self.target(row)? {
            Some(target) => Ok(read_u64(&self.data, target)?),
            None => Ok(0),
        }
    }

    /// 8-byte pool entry referenced by a literal.
    pub fn literal_u64(&self) -> PayloadResult<u64> {
        read_u64(&self.data, deref(&self.data, self.start)?)
    }
}

/// Read every row through `read`, leaving `None` for null rows.
pub(crate) fn collect<T>(
    vector: &dyn ValueVector,
    mut read: impl FnMut(usize) -> ValueResult<T>,
) -> PayloadResult<Vec<Option<T>>> {
    (0..vector.size())
        .map(|row| {
            if vector.is_null(row) {
                Ok(None)
            } else {
                read(row).map(Some).map_err(PayloadError::from)
            }
        })
        .collect()
}

/// The shared value when every row holds one and they are all equal under `eq`.
pub(crate) fn constant<T>(values: &[Option<T>], eq: impl Fn(&T, &T) -> bool) -> Option<&T> {
    let first = values.first()?.as_ref()?;
    values
        .iter()
        .all(|value| value.as_ref().is_some_and(|value| eq(first, value)))
        .then_some(first)
}

/// Write a LITERAL or REGULAR reference layout whose targets come from `intern`.
pub(crate) fn write_pooled<T>(
    w: &mut PayloadWriter,
    values: &[Option<T>],
    nulls: Nulls,
    eq: impl Fn(&T, &T) -> bool,
    mut intern: impl FnMut(&mut WriteCache, &mut Vec<u8>, &T) -> PayloadResult<u32>,
) -> PayloadResult<()> {
    if let Some(value) = w.literal_candidate(values, nulls, eq) {
        w.buf.push(LITERAL);
        let slot = w.buf.len();
        put_u32(&mut w.buf, 0);
        let target = intern(&mut w.cache, &mut w.buf, value)?;
        patch_u32(&mut w.buf, slot, target);
        return Ok(());
    }

    w.buf.push(REGULAR);
    let header = w.reserve_refs(values.len())?;
    for (row, value) in values.iter().enumerate() {
        if let Some(value) = value {
            let target = intern(&mut w.cache, &mut w.buf, value)?;
            patch_u32(&mut w.buf, header + row * 4, target);
        }
    }
    Ok(())
}
