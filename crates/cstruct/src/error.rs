//! Error type shared by the model compiler and the codec engine.

use thiserror::Error;

/// Errors raised while compiling a model or running a read/write/make pass.
///
/// Compile-time variants (`Grammar`, `UnresolvedType`, `CyclicType`) abort
/// construction of a [`crate::CStruct`]. The remaining variants are raised by
/// a single codec call and carry the path of the field being processed.
#[derive(Debug, Error)]
pub enum CStructError {
    #[error("grammar error at {position}: {message}")]
    Grammar { message: String, position: usize },
    #[error("unresolved type `{name}`")]
    UnresolvedType { name: String },
    #[error("cyclic type reference: {}", chain.join(" -> "))]
    CyclicType { chain: Vec<String> },
    #[error("buffer underflow reading `{field}`: required {required} bytes, {available} available")]
    BufferUnderflow {
        field: String,
        required: usize,
        available: usize,
    },
    #[error("buffer overflow writing `{field}`: required {required} bytes, {available} available")]
    BufferOverflow {
        field: String,
        required: usize,
        available: usize,
    },
    #[error("size mismatch writing `{field}`: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },
    #[error("value of `{field}` does not match its type, expected {expected}")]
    ValueMismatch {
        field: String,
        expected: &'static str,
    },
    #[error("value of `{field}` is out of range for `{tag}`")]
    ValueOutOfRange { field: String, tag: &'static str },
    #[error("length {len} of `{field}` does not fit its length prefix (max {max})")]
    LengthOverflow { field: String, len: usize, max: u64 },
    #[error("invalid length {len} read for `{field}`")]
    InvalidLength { field: String, len: i128 },
    #[error("invalid JSON model: {0}")]
    Json(#[from] serde_json::Error),
}

impl CStructError {
    pub(crate) fn grammar(message: impl Into<String>, position: usize) -> Self {
        CStructError::Grammar {
            message: message.into(),
            position,
        }
    }
}

pub type Result<T> = std::result::Result<T, CStructError>;
