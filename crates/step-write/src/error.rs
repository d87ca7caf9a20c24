//! Argument value error type.

use thiserror::Error;

use crate::types::TypeTag;

/// Error type for argument value access, assignment and rendering.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    /// The active variant does not have the requested shape.
    #[error("invalid cast: expected {expected}, found {actual}")]
    InvalidCast {
        expected: &'static str,
        actual: TypeTag,
    },
    #[error("only finite values are allowed")]
    NonFiniteValue,
    /// An inline simple-type instance refers back to itself.
    #[error("cyclic reference through inline instance {0}")]
    CyclicReference(String),
    #[error("inline instance nesting exceeds depth {0}")]
    DepthExceeded(usize),
}

impl ArgumentError {
    pub(crate) fn invalid_cast(expected: &'static str, actual: TypeTag) -> Self {
        ArgumentError::InvalidCast { expected, actual }
    }
}
