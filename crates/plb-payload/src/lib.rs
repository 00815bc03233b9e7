//! Binary payload codec for PLB vectors.
//!
//! A payload is `'P' 'L' 'B'`, a varint format version, the root type descriptor, the root
//! vector write and a checksum byte repeating the byte at offset 7. Decoding produces views
//! that alias the caller's buffer.
//!
//! ```no_run
//! use bytes::Bytes;
//! use plb_vector::{ValueVector, ValuesVector};
//!
//! let bytes = plb_payload::write(&ValuesVector::string([Some("a"), None]))?;
//! let vector = plb_payload::read(Bytes::from(bytes))?;
//! assert!(vector.is_null(1));
//! # Ok::<(), plb_payload::PayloadError>(())
//! ```

#![forbid(unsafe_code)]

mod codec;
pub mod descriptor;
mod error;
pub mod null_bitmap;
mod reader;
pub mod reconcile;
pub mod varint;
mod wire;
mod write_cache;
mod writer;

pub use crate::error::{PayloadError, PayloadResult};
pub use crate::reader::{
    is_supported_payload, read, read_tuple_vector, read_type, read_with_options, ReadOptions,
};
pub use crate::reconcile::{reconcile, ColumnCountPolicy, ReconcileMode};
pub use crate::writer::{write, write_tuple_vector, PayloadWriter, WriteOptions};

pub const MAGIC: [u8; 3] = *b"PLB";
pub const VERSION: u32 = 2;

/// Offset of the byte repeated as the final checksum byte.
pub const CHECKSUM_OFFSET: usize = 7;
