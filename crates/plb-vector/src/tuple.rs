use crate::value::Value;
use crate::values::ValuesVector;
use crate::vector::{vectors_equal, VectorRef};
use plb_types::{ResolvedType, Schema, Type, ValueError, ValueResult};
use std::sync::{Arc, OnceLock};

#[derive(Debug)]
struct Inner {
    schema: Schema,
    row_count: usize,
    columns: Vec<VectorRef>,
}

/// A batch of equally sized columns described by a [`Schema`].
///
/// Clones share the same columns.
#[derive(Debug, Clone)]
pub struct TupleVector(Arc<Inner>);

fn slot_accepts(slot: &ResolvedType, column: &ResolvedType) -> bool {
    let (slot, column) = (slot.tag(), column.tag());
    slot == column || slot == Type::Any || column == Type::Any
}

impl TupleVector {
    /// Row count is taken from the first column; zero columns make an empty batch.
    pub fn new(schema: Schema, columns: Vec<VectorRef>) -> ValueResult<Self> {
        let row_count = columns.first().map(|c| c.size()).unwrap_or(0);
        Self::with_row_count(schema, row_count, columns)
    }

    pub fn with_row_count(
        schema: Schema,
        row_count: usize,
        columns: Vec<VectorRef>,
    ) -> ValueResult<Self> {
        if schema.len() != columns.len() {
            return Err(ValueError::InvalidTuple {
                reason: format!(
                    "schema has {} columns but {} vectors were given",
                    schema.len(),
                    columns.len()
                ),
            });
        }
        for (column, vector) in schema.columns().iter().zip(&columns) {
            if vector.size() != row_count {
                return Err(ValueError::InvalidTuple {
                    reason: format!(
                        "column '{}' has {} rows, expected {row_count}",
                        column.name,
                        vector.size()
                    ),
                });
            }
            if !slot_accepts(&column.ty, vector.resolved_type()) {
                return Err(ValueError::InvalidTuple {
                    reason: format!(
                        "column '{}' is declared {} but the vector is {}",
                        column.name,
                        column.ty,
                        vector.resolved_type()
                    ),
                });
            }
        }
        Ok(Self(Arc::new(Inner {
            schema,
            row_count,
            columns,
        })))
    }

    /// The shared zero-column, zero-row batch.
    pub fn empty() -> Self {
        static EMPTY: OnceLock<TupleVector> = OnceLock::new();
        EMPTY
            .get_or_init(|| Self::sentinel(0))
            .clone()
    }

    /// The shared zero-column, one-row batch.
    pub fn constant() -> Self {
        static CONSTANT: OnceLock<TupleVector> = OnceLock::new();
        CONSTANT
            .get_or_init(|| Self::sentinel(1))
            .clone()
    }

    fn sentinel(row_count: usize) -> Self {
        Self(Arc::new(Inner {
            schema: Schema::empty(),
            row_count,
            columns: Vec::new(),
        }))
    }

    /// Build a batch from row-major values; each row must have one value per schema column.
    pub fn from_rows(schema: Schema, rows: Vec<Vec<Value>>) -> ValueResult<Self> {
        let row_count = rows.len();
        let mut by_column: Vec<Vec<Value>> = (0..schema.len())
            .map(|_| Vec::with_capacity(row_count))
            .collect();
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != schema.len() {
                return Err(ValueError::InvalidTuple {
                    reason: format!(
                        "row {index} has {} values, expected {}",
                        row.len(),
                        schema.len()
                    ),
                });
            }
            for (slot, value) in by_column.iter_mut().zip(row) {
                slot.push(value);
            }
        }
        let columns = schema
            .columns()
            .iter()
            .zip(by_column)
            .map(|(column, values)| {
                ValuesVector::from_values(column.ty.clone(), values).map(ValuesVector::into_ref)
            })
            .collect::<ValueResult<Vec<_>>>()?;
        Self::with_row_count(schema, row_count, columns)
    }

    pub fn schema(&self) -> &Schema {
        &self.0.schema
    }

    pub fn row_count(&self) -> usize {
        self.0.row_count
    }

    pub fn column_count(&self) -> usize {
        self.0.columns.len()
    }

    pub fn column(&self, ordinal: usize) -> Option<&VectorRef> {
        self.0.columns.get(ordinal)
    }

    /// Case-insensitive lookup.
    pub fn column_by_name(&self, name: &str) -> Option<&VectorRef> {
        self.0.schema.find(name).and_then(|i| self.column(i))
    }

    pub fn columns(&self) -> &[VectorRef] {
        &self.0.columns
    }

    /// Same shape and equal cells; column names are not compared.
    pub fn content_eq(&self, other: &TupleVector) -> bool {
        if Arc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        self.row_count() == other.row_count()
            && self.column_count() == other.column_count()
            && self
                .columns()
                .iter()
                .zip(other.columns())
                .all(|(a, b)| vectors_equal(a.as_ref(), b.as_ref()))
    }
}
