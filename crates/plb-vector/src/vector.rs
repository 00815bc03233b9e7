use crate::object::ObjectVector;
use crate::tuple::TupleVector;
use crate::value::Value;
use plb_types::{
    Decimal, EpochDateTime, EpochDateTimeOffset, ResolvedType, Type, Utf8String, ValueError,
    ValueResult,
};
use std::fmt;
use std::sync::Arc;

pub type VectorRef = Arc<dyn ValueVector>;

/// A typed, nullable column of `size()` rows.
///
/// Implementations provide `resolved_type`, `size`, `is_null`, and either `get_any` or the
/// typed accessor matching their declared type. Every other accessor has a default that reads
/// the native value through `get_any` and applies the implicit conversions in [`crate::cast`].
///
/// Null rows are reported only by `is_null`; typed accessors return an unspecified value for
/// them. Reading a row outside `0..size()` is a contract violation and panics.
pub trait ValueVector: Send + Sync + fmt::Debug {
    fn resolved_type(&self) -> &ResolvedType;

    fn size(&self) -> usize;

    fn is_null(&self, row: usize) -> bool;

    /// Native value of `row`, dispatched on the declared type.
    fn get_any(&self, row: usize) -> ValueResult<Value> {
        if self.is_null(row) {
            return Ok(Value::Null);
        }
        Ok(match self.resolved_type().tag() {
            Type::Boolean => Value::Boolean(self.get_boolean(row)?),
            Type::Int32 => Value::Int32(self.get_int32(row)?),
            Type::Int64 => Value::Int64(self.get_int64(row)?),
            Type::Float32 => Value::Float32(self.get_float32(row)?),
            Type::Float64 => Value::Float64(self.get_float64(row)?),
            Type::Decimal => Value::Decimal(self.get_decimal(row)?),
            Type::String => Value::String(self.get_string(row)?),
            Type::DateTime => Value::DateTime(self.get_date_time(row)?),
            Type::DateTimeOffset => Value::DateTimeOffset(self.get_date_time_offset(row)?),
            Type::Array => Value::Array(self.get_array(row)?),
            Type::Table => Value::Table(self.get_table(row)?),
            Type::Object => Value::Object(self.get_object(row)?),
            Type::Any => {
                return Err(ValueError::unsupported(self.resolved_type(), Type::Any));
            }
        })
    }

    fn get_boolean(&self, row: usize) -> ValueResult<bool> {
        self.get_any(row)?.to_boolean()
    }

    fn get_int32(&self, row: usize) -> ValueResult<i32> {
        self.get_any(row)?.to_int32()
    }

    fn get_int64(&self, row: usize) -> ValueResult<i64> {
        self.get_any(row)?.to_int64()
    }

    fn get_float32(&self, row: usize) -> ValueResult<f32> {
        self.get_any(row)?.to_float32()
    }

    fn get_float64(&self, row: usize) -> ValueResult<f64> {
        self.get_any(row)?.to_float64()
    }

    fn get_decimal(&self, row: usize) -> ValueResult<Decimal> {
        self.get_any(row)?.to_decimal()
    }

    fn get_string(&self, row: usize) -> ValueResult<Utf8String> {
        self.get_any(row)?.to_utf8_string()
    }

    fn get_date_time(&self, row: usize) -> ValueResult<EpochDateTime> {
        self.get_any(row)?.to_date_time()
    }

    fn get_date_time_offset(&self, row: usize) -> ValueResult<EpochDateTimeOffset> {
        self.get_any(row)?.to_date_time_offset()
    }

    fn get_array(&self, row: usize) -> ValueResult<VectorRef> {
        self.get_any(row)?.to_array()
    }

    fn get_table(&self, row: usize) -> ValueResult<TupleVector> {
        self.get_any(row)?.to_table()
    }

    fn get_object(&self, row: usize) -> ValueResult<ObjectVector> {
        self.get_any(row)?.to_object()
    }
}

/// Panic unless `row < size`.
#[track_caller]
pub fn check_row(ty: &ResolvedType, size: usize, row: usize) {
    assert!(
        row < size,
        "row {row} out of range for {ty} vector of size {size}"
    );
}

/// Element-wise comparison using each type's canonical equality. Errors while reading a row
/// make the vectors unequal.
pub fn vectors_equal(a: &dyn ValueVector, b: &dyn ValueVector) -> bool {
    if a.size() != b.size() {
        return false;
    }
    (0..a.size()).all(|row| {
        if a.is_null(row) != b.is_null(row) {
            return false;
        }
        match (a.get_any(row), b.get_any(row)) {
            (Ok(x), Ok(y)) => x == y,
            _ => false,
        }
    })
}
