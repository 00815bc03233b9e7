use crate::codec::{self, constant, TYPE_VERSION};
use crate::descriptor::write_descriptor;
use crate::error::PayloadResult;
use crate::null_bitmap::{write_null_bitmap, Nulls};
use crate::varint::write_varint;
use crate::wire::{put_u32, span, to_u32};
use crate::write_cache::WriteCache;
use crate::{CHECKSUM_OFFSET, MAGIC, VERSION};
use log::debug;
use plb_types::ResolvedType;
use plb_vector::{LiteralVector, TupleVector, Value, ValueVector};
use serde::{Deserialize, Serialize};

/// Options for [`PayloadWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriteOptions {
    /// Write constant, null-free scalar vectors with the LITERAL layout. Disabling this always
    /// produces REGULAR layouts.
    pub literal_encoding: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            literal_encoding: true,
        }
    }
}

/// Serializes vectors into self-describing payloads.
///
/// The buffer and value pools are reused across calls; each call starts from an empty buffer
/// and empty pools.
#[derive(Debug, Default)]
pub struct PayloadWriter {
    options: WriteOptions,
    pub(crate) buf: Vec<u8>,
    pub(crate) cache: WriteCache,
}

impl PayloadWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: WriteOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// Encode `vector` as the root of a new payload.
    pub fn write(&mut self, vector: &dyn ValueVector) -> PayloadResult<Vec<u8>> {
        let ty = vector.resolved_type().clone();
        self.buf.clear();
        self.cache.clear();

        self.buf.extend_from_slice(&MAGIC);
        write_varint(&mut self.buf, VERSION);
        write_descriptor(&mut self.buf, &ty)?;
        self.write_vector(vector, &ty)?;

        if self.buf.len() <= CHECKSUM_OFFSET {
            self.buf.resize(CHECKSUM_OFFSET + 1, 0);
        }
        self.buf.push(self.buf[CHECKSUM_OFFSET]);
        to_u32(self.buf.len())?;

        debug!(
            "wrote {ty} payload: {} rows, {} bytes",
            vector.size(),
            self.buf.len()
        );
        Ok(self.buf.clone())
    }

    /// Encode `tuple` as a one-row table vector.
    pub fn write_tuple_vector(&mut self, tuple: &TupleVector) -> PayloadResult<Vec<u8>> {
        let root = LiteralVector::new(Value::Table(tuple.clone()), 1);
        self.write(&root)
    }

    /// Append a non-root vector write of `vector` laid out as `ty`.
    pub(crate) fn write_vector(
        &mut self,
        vector: &dyn ValueVector,
        ty: &ResolvedType,
    ) -> PayloadResult<()> {
        let rows = vector.size();
        write_varint(&mut self.buf, to_u32(rows)?);
        let nulls = write_null_bitmap(&mut self.buf, vector, 0, rows)?;
        if nulls == Nulls::All {
            return Ok(());
        }
        self.buf.push(TYPE_VERSION);
        codec::encode(self, vector, ty, nulls)
    }

    /// Append `count` zeroed reference slots and return the position of the first.
    pub(crate) fn reserve_refs(&mut self, count: usize) -> PayloadResult<usize> {
        let header = self.buf.len();
        span(count, 4)?;
        for _ in 0..count {
            put_u32(&mut self.buf, 0);
        }
        Ok(header)
    }

    /// The value to write as a LITERAL, when the options allow it and the rows qualify.
    pub(crate) fn literal_candidate<'v, T>(
        &self,
        values: &'v [Option<T>],
        nulls: Nulls,
        eq: impl Fn(&T, &T) -> bool,
    ) -> Option<&'v T> {
        if !self.options.literal_encoding || nulls != Nulls::None {
            return None;
        }
        constant(values, eq)
    }
}

/// Encode `vector` with default options.
pub fn write(vector: &dyn ValueVector) -> PayloadResult<Vec<u8>> {
    PayloadWriter::new().write(vector)
}

/// Encode `tuple` with default options.
pub fn write_tuple_vector(tuple: &TupleVector) -> PayloadResult<Vec<u8>> {
    PayloadWriter::new().write_tuple_vector(tuple)
}
