use crate::value::Value;
use crate::vector::VectorRef;
use crate::TupleVector;
use plb_types::{Schema, ValueError, ValueResult};

/// One row of a [`TupleVector`], addressed by column ordinal.
#[derive(Debug, Clone)]
pub struct ObjectVector {
    tuple: TupleVector,
    row: usize,
}

impl ObjectVector {
    pub fn new(tuple: TupleVector, row: usize) -> ValueResult<Self> {
        if row >= tuple.row_count() {
            return Err(ValueError::InvalidTuple {
                reason: format!(
                    "object row {row} out of range for a tuple of {} rows",
                    tuple.row_count()
                ),
            });
        }
        Ok(Self { tuple, row })
    }

    /// Object without fields.
    pub fn empty() -> Self {
        Self {
            tuple: TupleVector::constant(),
            row: 0,
        }
    }

    /// Single object over a one-row tuple built from `values`.
    pub fn from_values(schema: Schema, values: Vec<Value>) -> ValueResult<Self> {
        Self::new(TupleVector::from_rows(schema, vec![values])?, 0)
    }

    pub fn schema(&self) -> &Schema {
        self.tuple.schema()
    }

    pub fn tuple(&self) -> &TupleVector {
        &self.tuple
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn column_count(&self) -> usize {
        self.tuple.column_count()
    }

    /// Column vector at `ordinal`; read it at [`ObjectVector::row`].
    pub fn value(&self, ordinal: usize) -> Option<&VectorRef> {
        self.tuple.column(ordinal)
    }

    pub fn is_null(&self, ordinal: usize) -> bool {
        self.value(ordinal).map_or(true, |v| v.is_null(self.row))
    }

    /// Field value; `Value::Null` for an ordinal past the last column.
    pub fn get_any(&self, ordinal: usize) -> ValueResult<Value> {
        match self.value(ordinal) {
            Some(vector) => vector.get_any(self.row),
            None => Ok(Value::Null),
        }
    }

    /// Equal field values at the respective rows; field names are not compared.
    pub fn content_eq(&self, other: &ObjectVector) -> bool {
        if self.column_count() != other.column_count() {
            return false;
        }
        (0..self.column_count()).all(|ordinal| {
            match (self.get_any(ordinal), other.get_any(ordinal)) {
                (Ok(a), Ok(b)) => a == b,
                _ => false,
            }
        })
    }
}
