use crate::codec;
use crate::descriptor::read_descriptor;
use crate::error::{PayloadError, PayloadResult};
use crate::reconcile::{reconcile, ColumnCountPolicy, ReconcileMode};
use crate::varint::read_varint;
use crate::{CHECKSUM_OFFSET, MAGIC, VERSION};
use bytes::Bytes;
use log::debug;
use plb_types::{ResolvedType, Schema, Type};
use plb_vector::{TupleVector, ValueVector, VectorRef};
use serde::{Deserialize, Serialize};

/// How a payload is checked against the type the caller expects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    /// Type to validate or expand against. `None` trusts the payload.
    pub expected_type: Option<ResolvedType>,
    /// Merge the expected type with the payload type instead of validating it.
    pub expand_schema: bool,
    /// Column count handling while validating.
    pub column_count: ColumnCountPolicy,
}

impl ReadOptions {
    pub fn validate(expected: ResolvedType) -> Self {
        Self {
            expected_type: Some(expected),
            ..Self::default()
        }
    }

    pub fn expand(expected: ResolvedType) -> Self {
        Self {
            expected_type: Some(expected),
            expand_schema: true,
            ..Self::default()
        }
    }

    fn mode(&self) -> ReconcileMode {
        if self.expand_schema {
            ReconcileMode::Expand
        } else {
            ReconcileMode::Validate(self.column_count)
        }
    }
}

/// Cheap envelope check: length, magic and checksum byte.
pub fn is_supported_payload(bytes: &[u8]) -> bool {
    bytes.len() > CHECKSUM_OFFSET
        && bytes.starts_with(&MAGIC)
        && bytes.last() == Some(&bytes[CHECKSUM_OFFSET])
}

/// Root type stored in the payload, with synthesized column names.
pub fn read_type(bytes: &[u8]) -> PayloadResult<ResolvedType> {
    let (ty, _) = read_header(bytes)?;
    Ok(ty)
}

fn read_header(bytes: &[u8]) -> PayloadResult<(ResolvedType, usize)> {
    if !is_supported_payload(bytes) {
        return Err(PayloadError::NotSupportedPayload);
    }
    let (version, pos) = read_varint(bytes, MAGIC.len())?;
    if version != VERSION {
        return Err(PayloadError::UnsupportedVersion(version));
    }
    read_descriptor(bytes, pos)
}

/// Decode a payload as stored.
pub fn read(bytes: Bytes) -> PayloadResult<VectorRef> {
    read_with_options(bytes, &ReadOptions::default())
}

/// Decode a payload, validating or expanding it against `options.expected_type`.
///
/// The returned vector is a view over `bytes`; rows are decoded when they are read.
pub fn read_with_options(bytes: Bytes, options: &ReadOptions) -> PayloadResult<VectorRef> {
    let (stored, pos) = read_header(&bytes)?;
    let ty = match &options.expected_type {
        Some(expected) => reconcile(expected, &stored, options.mode())?,
        None => stored,
    };
    // The trailing checksum byte is never part of a vector.
    let data = bytes.slice(..bytes.len() - 1);
    let vector = codec::decode(&data, pos, &ty)?;
    debug!(
        "read {ty} payload: {} rows, {} bytes",
        vector.size(),
        bytes.len()
    );
    Ok(vector)
}

/// Decode a payload written by [`crate::write_tuple_vector`].
///
/// With `expected`, the tuple is validated against it, or merged with it when `expand` is set.
/// A null root reads as an empty tuple.
pub fn read_tuple_vector(
    bytes: Bytes,
    expected: Option<&Schema>,
    expand: bool,
) -> PayloadResult<TupleVector> {
    let options = ReadOptions {
        expected_type: expected.map(|schema| ResolvedType::Table(schema.clone())),
        expand_schema: expand,
        ..ReadOptions::default()
    };
    let root = read_with_options(bytes, &options)?;
    if root.resolved_type().tag() != Type::Table {
        return Err(PayloadError::SchemaMismatch {
            column: "<root>".to_owned(),
            expected: ResolvedType::Table(Schema::empty()),
            actual: root.resolved_type().clone(),
        });
    }
    if root.size() == 0 || root.is_null(0) {
        return Ok(TupleVector::empty());
    }
    Ok(root.get_table(0)?)
}
