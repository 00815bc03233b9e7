use crate::value::Value;
use crate::vector::{check_row, ValueVector, VectorRef};
use plb_types::{ResolvedType, ValueResult};
use std::sync::Arc;

/// A vector that reports the same value (or null) for every row.
#[derive(Debug, Clone)]
pub struct LiteralVector {
    ty: ResolvedType,
    size: usize,
    value: Value,
}

impl LiteralVector {
    /// Literal whose type is taken from `value`. A `Value::Null` literal has type `Any`.
    pub fn new(value: Value, size: usize) -> Self {
        Self {
            ty: value.resolved_type(),
            size,
            value,
        }
    }

    /// Literal with an explicit declared type; `value` is read back through the implicit
    /// conversions when it differs.
    pub fn with_type(ty: ResolvedType, value: Value, size: usize) -> Self {
        Self { ty, size, value }
    }

    pub fn null(ty: ResolvedType, size: usize) -> Self {
        Self {
            ty,
            size,
            value: Value::Null,
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_ref(self) -> VectorRef {
        Arc::new(self)
    }
}

impl ValueVector for LiteralVector {
    fn resolved_type(&self) -> &ResolvedType {
        &self.ty
    }

    fn size(&self) -> usize {
        self.size
    }

    fn is_null(&self, row: usize) -> bool {
        check_row(&self.ty, self.size, row);
        self.value.is_null()
    }

    fn get_any(&self, row: usize) -> ValueResult<Value> {
        check_row(&self.ty, self.size, row);
        if self.value.tag() == Some(self.ty.tag()) || self.value.is_null() {
            return Ok(self.value.clone());
        }
        cast_to_declared(&self.value, &self.ty)
    }
}

/// Convert `value` to the scalar type `ty` declares; composite types pass through.
pub(crate) fn cast_to_declared(value: &Value, ty: &ResolvedType) -> ValueResult<Value> {
    Ok(match ty {
        ResolvedType::Any => value.clone(),
        ResolvedType::Boolean => Value::Boolean(value.to_boolean()?),
        ResolvedType::Int32 => Value::Int32(value.to_int32()?),
        ResolvedType::Int64 => Value::Int64(value.to_int64()?),
        ResolvedType::Float32 => Value::Float32(value.to_float32()?),
        ResolvedType::Float64 => Value::Float64(value.to_float64()?),
        ResolvedType::Decimal => Value::Decimal(value.to_decimal()?),
        ResolvedType::String => Value::String(value.to_utf8_string()?),
        ResolvedType::DateTime => Value::DateTime(value.to_date_time()?),
        ResolvedType::DateTimeOffset => Value::DateTimeOffset(value.to_date_time_offset()?),
        ResolvedType::Array(_) => Value::Array(value.to_array()?),
        ResolvedType::Table(_) => Value::Table(value.to_table()?),
        ResolvedType::Object(_) => Value::Object(value.to_object()?),
    })
}
