use crate::object::ObjectVector;
use crate::tuple::TupleVector;
use crate::vector::{vectors_equal, VectorRef};
use plb_types::{
    Decimal, EpochDateTime, EpochDateTimeOffset, ResolvedType, Type, Utf8String,
};
use std::fmt;

/// A single cell value, as returned by [`crate::ValueVector::get_any`].
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Decimal(Decimal),
    String(Utf8String),
    DateTime(EpochDateTime),
    DateTimeOffset(EpochDateTimeOffset),
    Array(VectorRef),
    Table(TupleVector),
    Object(ObjectVector),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Type tag of the value; `None` for [`Value::Null`].
    pub fn tag(&self) -> Option<Type> {
        Some(match self {
            Value::Null => return None,
            Value::Boolean(_) => Type::Boolean,
            Value::Int32(_) => Type::Int32,
            Value::Int64(_) => Type::Int64,
            Value::Float32(_) => Type::Float32,
            Value::Float64(_) => Type::Float64,
            Value::Decimal(_) => Type::Decimal,
            Value::String(_) => Type::String,
            Value::DateTime(_) => Type::DateTime,
            Value::DateTimeOffset(_) => Type::DateTimeOffset,
            Value::Array(_) => Type::Array,
            Value::Table(_) => Type::Table,
            Value::Object(_) => Type::Object,
        })
    }

    /// Resolved type of the value; [`ResolvedType::Any`] for [`Value::Null`].
    pub fn resolved_type(&self) -> ResolvedType {
        match self {
            Value::Null => ResolvedType::Any,
            Value::Array(v) => ResolvedType::array(v.resolved_type().clone()),
            Value::Table(t) => ResolvedType::Table(t.schema().clone()),
            Value::Object(o) => ResolvedType::Object(o.schema().clone()),
            other => other
                .tag()
                .and_then(ResolvedType::scalar)
                .unwrap_or(ResolvedType::Any),
        }
    }
}

fn float_eq32(a: f32, b: f32) -> bool {
    a == b || a.to_bits() == b.to_bits()
}

fn float_eq64(a: f64, b: f64) -> bool {
    a == b || a.to_bits() == b.to_bits()
}

/// Canonical equality: same variant and equal content. Tables and objects compare by values
/// only; column names are ignored.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Int32(a), Value::Int32(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::Float32(a), Value::Float32(b)) => float_eq32(*a, *b),
            (Value::Float64(a), Value::Float64(b)) => float_eq64(*a, *b),
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::DateTimeOffset(a), Value::DateTimeOffset(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => vectors_equal(a.as_ref(), b.as_ref()),
            (Value::Table(a), Value::Table(b)) => a.content_eq(b),
            (Value::Object(a), Value::Object(b)) => a.content_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float32(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Decimal(v) => write!(f, "{v}"),
            Value::String(v) => f.write_str(v.as_str()),
            Value::DateTime(v) => write!(f, "{v}"),
            Value::DateTimeOffset(v) => write!(f, "{v}"),
            Value::Array(v) => write!(f, "array<{}>[{}]", v.resolved_type(), v.size()),
            Value::Table(t) => write!(
                f,
                "table[{} rows x {} columns]",
                t.row_count(),
                t.column_count()
            ),
            Value::Object(o) => write!(f, "object[{}]", o.schema()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int32(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int64(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float32(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float64(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(Utf8String::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(Utf8String::from(value))
    }
}

impl From<Utf8String> for Value {
    fn from(value: Utf8String) -> Self {
        Value::String(value)
    }
}

impl From<EpochDateTime> for Value {
    fn from(value: EpochDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl From<EpochDateTimeOffset> for Value {
    fn from(value: EpochDateTimeOffset) -> Self {
        Value::DateTimeOffset(value)
    }
}

impl From<TupleVector> for Value {
    fn from(value: TupleVector) -> Self {
        Value::Table(value)
    }
}

impl From<ObjectVector> for Value {
    fn from(value: ObjectVector) -> Self {
        Value::Object(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}
