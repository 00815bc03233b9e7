use crate::literal::cast_to_declared;
use crate::object::ObjectVector;
use crate::tuple::TupleVector;
use crate::value::Value;
use crate::vector::{check_row, ValueVector, VectorRef};
use plb_types::{
    Decimal, EpochDateTime, EpochDateTimeOffset, ResolvedType, Schema, Type, ValueError,
    ValueResult,
};
use std::sync::Arc;

/// A vector holding one owned [`Value`] per row, as produced by expression evaluation.
#[derive(Debug, Clone)]
pub struct ValuesVector {
    ty: ResolvedType,
    values: Vec<Value>,
}

impl ValuesVector {
    /// Every non-null value must carry the declared type tag (any tag when the type is `Any`).
    pub fn from_values(ty: ResolvedType, values: Vec<Value>) -> ValueResult<Self> {
        let expected = ty.tag();
        if expected != Type::Any {
            for value in &values {
                match value.tag() {
                    Some(actual) if actual != expected => {
                        return Err(ValueError::TypeMismatch { expected, actual });
                    }
                    _ => {}
                }
            }
        }
        Ok(Self { ty, values })
    }

    fn typed<T, I>(ty: ResolvedType, values: I) -> Self
    where
        I: IntoIterator<Item = Option<T>>,
        T: Into<Value>,
    {
        Self {
            ty,
            values: values
                .into_iter()
                .map(|v| v.map(Into::into).unwrap_or(Value::Null))
                .collect(),
        }
    }

    pub fn boolean(values: impl IntoIterator<Item = Option<bool>>) -> Self {
        Self::typed(ResolvedType::Boolean, values)
    }

    pub fn int32(values: impl IntoIterator<Item = Option<i32>>) -> Self {
        Self::typed(ResolvedType::Int32, values)
    }

    pub fn int64(values: impl IntoIterator<Item = Option<i64>>) -> Self {
        Self::typed(ResolvedType::Int64, values)
    }

    pub fn float32(values: impl IntoIterator<Item = Option<f32>>) -> Self {
        Self::typed(ResolvedType::Float32, values)
    }

    pub fn float64(values: impl IntoIterator<Item = Option<f64>>) -> Self {
        Self::typed(ResolvedType::Float64, values)
    }

    pub fn decimal(values: impl IntoIterator<Item = Option<Decimal>>) -> Self {
        Self::typed(ResolvedType::Decimal, values)
    }

    pub fn string<'a>(values: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        Self::typed(ResolvedType::String, values)
    }

    pub fn date_time(values: impl IntoIterator<Item = Option<EpochDateTime>>) -> Self {
        Self::typed(ResolvedType::DateTime, values)
    }

    pub fn date_time_offset(
        values: impl IntoIterator<Item = Option<EpochDateTimeOffset>>,
    ) -> Self {
        Self::typed(ResolvedType::DateTimeOffset, values)
    }

    pub fn arrays(
        element: ResolvedType,
        values: impl IntoIterator<Item = Option<VectorRef>>,
    ) -> Self {
        Self {
            ty: ResolvedType::array(element),
            values: values
                .into_iter()
                .map(|v| v.map(Value::Array).unwrap_or(Value::Null))
                .collect(),
        }
    }

    pub fn tables(schema: Schema, values: impl IntoIterator<Item = Option<TupleVector>>) -> Self {
        Self::typed(ResolvedType::Table(schema), values)
    }

    pub fn objects(schema: Schema, values: impl IntoIterator<Item = Option<ObjectVector>>) -> Self {
        Self::typed(ResolvedType::Object(schema), values)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_ref(self) -> VectorRef {
        Arc::new(self)
    }
}

impl ValueVector for ValuesVector {
    fn resolved_type(&self) -> &ResolvedType {
        &self.ty
    }

    fn size(&self) -> usize {
        self.values.len()
    }

    fn is_null(&self, row: usize) -> bool {
        check_row(&self.ty, self.values.len(), row);
        self.values[row].is_null()
    }

    fn get_any(&self, row: usize) -> ValueResult<Value> {
        check_row(&self.ty, self.values.len(), row);
        let value = &self.values[row];
        if value.is_null() || value.tag() == Some(self.ty.tag()) {
            return Ok(value.clone());
        }
        cast_to_declared(value, &self.ty)
    }
}
