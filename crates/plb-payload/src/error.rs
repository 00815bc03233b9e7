use plb_types::{ResolvedType, Type, ValueError};

pub type PayloadResult<T> = Result<T, PayloadError>;

/// Errors raised while encoding or decoding a payload.
///
/// Format and schema errors abort the whole read. Corruption found later, while a view is being
/// read row by row, surfaces as [`ValueError::Decode`] from the accessor instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PayloadError {
    #[error("buffer is not a supported PLB payload")]
    NotSupportedPayload,

    #[error("unsupported payload version {0}")]
    UnsupportedVersion(u32),

    #[error("unsupported {ty} vector version {version}")]
    UnsupportedTypeVersion { ty: Type, version: u8 },

    #[error("unknown type tag {0}")]
    UnknownTypeTag(u8),

    #[error("unknown encoding {encoding} for {ty} vector")]
    UnknownEncoding { ty: Type, encoding: u8 },

    #[error("unexpected end of payload at offset {offset}")]
    UnexpectedEof { offset: usize },

    #[error("invalid varint at offset {offset}")]
    InvalidVarint { offset: usize },

    #[error("corrupt payload at offset {offset}: {reason}")]
    Corrupt { offset: usize, reason: String },

    #[error("schema mismatch at column '{column}': expected {expected}, found {actual}")]
    SchemaMismatch {
        column: String,
        expected: ResolvedType,
        actual: ResolvedType,
    },

    #[error("column count mismatch at '{column}': expected {expected}, found {actual}")]
    ColumnCountMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("cannot write a vector of type {0}")]
    UnsupportedType(ResolvedType),

    #[error("payload exceeds the 4 GiB addressable range")]
    TooLarge,

    #[error(transparent)]
    Value(#[from] ValueError),
}

impl PayloadError {
    pub(crate) fn corrupt(offset: usize, reason: impl Into<String>) -> Self {
        PayloadError::Corrupt {
            offset,
            reason: reason.into(),
        }
    }
}

/// Lets view accessors propagate format errors with `?`.
impl From<PayloadError> for ValueError {
    fn from(err: PayloadError) -> Self {
        match err {
            PayloadError::Value(inner) => inner,
            other => ValueError::decode(other.to_string()),
        }
    }
}
