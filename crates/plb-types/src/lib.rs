//! Scalar values and type descriptors shared by the PLB vector and payload crates.
//!
//! - [`Utf8String`]: owned text or a zero-copy span of a shared buffer.
//! - [`Decimal`]: arbitrary-precision unscaled integer + scale with half-up division.
//! - [`EpochDateTime`] / [`EpochDateTimeOffset`]: millisecond epochs compared by epoch only.
//! - [`ResolvedType`] / [`Schema`]: recursive column types.

#![forbid(unsafe_code)]

mod datetime;
mod decimal;
mod error;
mod types;
mod utf8;

pub use crate::datetime::{EpochDateTime, EpochDateTimeOffset};
pub use crate::decimal::{Decimal, DEFAULT_SCALE};
pub use crate::error::{ValueError, ValueResult};
pub use crate::types::{synthesized_column_name, Column, ResolvedType, Schema, Type};
pub use crate::utf8::Utf8String;
