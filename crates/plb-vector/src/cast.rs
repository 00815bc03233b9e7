//! Implicit conversions between cell values.
//!
//! These back the default typed accessors of [`crate::ValueVector`]: a vector produces its
//! native value through `get_any`, and the requested accessor converts it here.
//!
//! | From \ To | boolean | int/float | decimal | string | date-time |
//! |-----------|---------|-----------|---------|--------|-----------|
//! | boolean | = | 1 / 0 | 1 / 0 (scale 6) | text | - |
//! | int32/int64 | nonzero | `as` | scale 6 | text | int64 = epoch ms |
//! | float32/float64 | - | `as` (truncating) | scale 6 | text | - |
//! | decimal | - | truncating projection | = | text | - |
//! | string | y/yes/true/1, n/no/false/0 | parse | parse (keeps scale) | = | parse |
//! | date-time(-offset) | - | int64 = epoch ms | - | text | strip / attach zone |
//!
//! `Null` converts to the zero value of every target; callers check `is_null` first.

use crate::literal::LiteralVector;
use crate::object::ObjectVector;
use crate::tuple::TupleVector;
use crate::value::Value;
use crate::vector::VectorRef;
use plb_types::{
    Decimal, EpochDateTime, EpochDateTimeOffset, ResolvedType, Type, Utf8String, ValueError,
    ValueResult,
};
use std::sync::Arc;

fn unsupported<T>(value: &Value, to: Type) -> ValueResult<T> {
    Err(ValueError::unsupported(&value.resolved_type(), to))
}

fn parse_boolean(text: &str) -> ValueResult<bool> {
    match text.to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Ok(true),
        "n" | "no" | "false" | "0" => Ok(false),
        _ => Err(ValueError::cast(text, Type::Boolean)),
    }
}

fn parse_number<T: std::str::FromStr>(text: &Utf8String, to: Type) -> ValueResult<T> {
    text.as_str()
        .parse::<T>()
        .map_err(|_| ValueError::cast(text.as_str(), to))
}

impl Value {
    pub fn to_boolean(&self) -> ValueResult<bool> {
        match self {
            Value::Null => Ok(false),
            Value::Boolean(v) => Ok(*v),
            Value::Int32(v) => Ok(*v != 0),
            Value::Int64(v) => Ok(*v != 0),
            Value::String(s) => parse_boolean(s.as_str()),
            other => unsupported(other, Type::Boolean),
        }
    }

    pub fn to_int32(&self) -> ValueResult<i32> {
        match self {
            Value::Null => Ok(0),
            Value::Boolean(v) => Ok(i32::from(*v)),
            Value::Int32(v) => Ok(*v),
            Value::Int64(v) => Ok(*v as i32),
            Value::Float32(v) => Ok(*v as i32),
            Value::Float64(v) => Ok(*v as i32),
            Value::Decimal(v) => Ok(v.to_i32()),
            Value::String(s) => parse_number(s, Type::Int32),
            other => unsupported(other, Type::Int32),
        }
    }

    pub fn to_int64(&self) -> ValueResult<i64> {
        match self {
            Value::Null => Ok(0),
            Value::Boolean(v) => Ok(i64::from(*v)),
            Value::Int32(v) => Ok(i64::from(*v)),
            Value::Int64(v) => Ok(*v),
            Value::Float32(v) => Ok(*v as i64),
            Value::Float64(v) => Ok(*v as i64),
            Value::Decimal(v) => Ok(v.to_i64()),
            Value::String(s) => parse_number(s, Type::Int64),
            Value::DateTime(v) => Ok(v.epoch_millis()),
            Value::DateTimeOffset(v) => Ok(v.epoch_millis()),
            other => unsupported(other, Type::Int64),
        }
    }

    pub fn to_float32(&self) -> ValueResult<f32> {
        match self {
            Value::Null => Ok(0.0),
            Value::Boolean(v) => Ok(if *v { 1.0 } else { 0.0 }),
            Value::Int32(v) => Ok(*v as f32),
            Value::Int64(v) => Ok(*v as f32),
            Value::Float32(v) => Ok(*v),
            Value::Float64(v) => Ok(*v as f32),
            Value::Decimal(v) => Ok(v.to_f32()),
            Value::String(s) => parse_number(s, Type::Float32),
            other => unsupported(other, Type::Float32),
        }
    }

    pub fn to_float64(&self) -> ValueResult<f64> {
        match self {
            Value::Null => Ok(0.0),
            Value::Boolean(v) => Ok(if *v { 1.0 } else { 0.0 }),
            Value::Int32(v) => Ok(f64::from(*v)),
            Value::Int64(v) => Ok(*v as f64),
            Value::Float32(v) => Ok(f64::from(*v)),
            Value::Float64(v) => Ok(*v),
            Value::Decimal(v) => Ok(v.to_f64()),
            Value::String(s) => parse_number(s, Type::Float64),
            other => unsupported(other, Type::Float64),
        }
    }

    pub fn to_decimal(&self) -> ValueResult<Decimal> {
        match self {
            Value::Null => Ok(Decimal::zero()),
            Value::Boolean(v) => Ok(Decimal::from_i32(i32::from(*v))),
            Value::Int32(v) => Ok(Decimal::from_i32(*v)),
            Value::Int64(v) => Ok(Decimal::from_i64(*v)),
            Value::Float32(v) => Decimal::try_from_f32(*v),
            Value::Float64(v) => Decimal::try_from_f64(*v),
            Value::Decimal(v) => Ok(v.clone()),
            Value::String(s) => Decimal::parse(s.as_str()),
            other => unsupported(other, Type::Decimal),
        }
    }

    pub fn to_utf8_string(&self) -> ValueResult<Utf8String> {
        match self {
            Value::Null => Ok(Utf8String::empty()),
            Value::String(s) => Ok(s.clone()),
            Value::Array(_) | Value::Table(_) | Value::Object(_) => unsupported(self, Type::String),
            scalar => Ok(Utf8String::from(scalar.to_string())),
        }
    }

    pub fn to_date_time(&self) -> ValueResult<EpochDateTime> {
        match self {
            Value::Null => Ok(EpochDateTime::from_epoch_millis(0)),
            Value::DateTime(v) => Ok(v.clone()),
            Value::DateTimeOffset(v) => Ok(v.to_date_time()),
            Value::Int64(v) => Ok(EpochDateTime::from_epoch_millis(*v)),
            Value::String(s) => EpochDateTime::parse(s.as_str()),
            other => unsupported(other, Type::DateTime),
        }
    }

    pub fn to_date_time_offset(&self) -> ValueResult<EpochDateTimeOffset> {
        match self {
            Value::Null => Ok(EpochDateTimeOffset::utc(0)),
            Value::DateTimeOffset(v) => Ok(*v),
            Value::DateTime(v) => Ok(v.with_utc_offset()),
            Value::Int64(v) => Ok(EpochDateTimeOffset::utc(*v)),
            Value::String(s) => EpochDateTimeOffset::parse(s.as_str()),
            other => unsupported(other, Type::DateTimeOffset),
        }
    }

    pub fn to_array(&self) -> ValueResult<VectorRef> {
        match self {
            Value::Null => Ok(Arc::new(LiteralVector::null(ResolvedType::Any, 0))),
            Value::Array(v) => Ok(Arc::clone(v)),
            other => unsupported(other, Type::Array),
        }
    }

    pub fn to_table(&self) -> ValueResult<TupleVector> {
        match self {
            Value::Null => Ok(TupleVector::empty()),
            Value::Table(t) => Ok(t.clone()),
            other => unsupported(other, Type::Table),
        }
    }

    pub fn to_object(&self) -> ValueResult<ObjectVector> {
        match self {
            Value::Null => Ok(ObjectVector::empty()),
            Value::Object(o) => Ok(o.clone()),
            other => unsupported(other, Type::Object),
        }
    }
}
