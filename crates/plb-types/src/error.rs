use crate::types::{ResolvedType, Type};

pub type ValueResult<T> = Result<T, ValueError>;

/// Errors raised while reading, converting or combining values.
///
/// Cast errors are raised lazily: only when a typed accessor touches the offending row.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueError {
    #[error("cannot cast '{value}' to {to}")]
    Cast { value: String, to: Type },

    #[error("cannot cast {from} to {to}")]
    UnsupportedCast { from: ResolvedType, to: Type },

    #[error("expected a {expected} value, got {actual}")]
    TypeMismatch { expected: Type, actual: Type },

    #[error("division by zero")]
    DivisionByZero,

    #[error("decimal overflow in {op}")]
    Overflow { op: &'static str },

    #[error("invalid tuple vector: {reason}")]
    InvalidTuple { reason: String },

    #[error("corrupt vector data: {reason}")]
    Decode { reason: String },
}

impl ValueError {
    pub fn cast(value: impl ToString, to: Type) -> Self {
        ValueError::Cast {
            value: value.to_string(),
            to,
        }
    }

    pub fn unsupported(from: &ResolvedType, to: Type) -> Self {
        ValueError::UnsupportedCast {
            from: from.clone(),
            to,
        }
    }

    pub fn decode(reason: impl Into<String>) -> Self {
        ValueError::Decode {
            reason: reason.into(),
        }
    }
}
