//! Typed, nullable columns and the batches built from them.
//!
//! A [`ValueVector`] is one column; a [`TupleVector`] is a set of equally sized columns under a
//! [`Schema`](plb_types::Schema). Typed accessors that do not match a vector's declared type go
//! through the implicit conversions documented in [`cast`].

#![forbid(unsafe_code)]

pub mod cast;
mod literal;
mod object;
mod tuple;
mod value;
mod values;
mod vector;

pub use crate::literal::LiteralVector;
pub use crate::object::ObjectVector;
pub use crate::tuple::TupleVector;
pub use crate::value::Value;
pub use crate::values::ValuesVector;
pub use crate::vector::{check_row, vectors_equal, ValueVector, VectorRef};
