//! Errors raised inside native provider routines.

use std::error::Error as StdError;

use thiserror::Error;

/// Failure converting a [`Dynamic`](crate::Dynamic) slot to a Rust value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The slot holds a different type.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// The integer does not fit the target width.
    #[error("integer {value} out of range for {target_type}")]
    IntegerOverflow {
        value: i64,
        target_type: &'static str,
    },

    /// The slot is null and the target is not optional.
    #[error("null value for non-optional {target_type}")]
    NullValue { target_type: &'static str },
}

/// Error returned by a native routine or by the machinery calling it.
#[derive(Debug, Error)]
pub enum NativeError {
    #[error("argument conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    #[error("argument index {index} out of bounds ({count} arguments)")]
    ArgumentIndexOutOfBounds { index: usize, count: usize },

    /// The receiver is missing or of the wrong type.
    #[error("invalid receiver: {message}")]
    InvalidThis { message: String },

    /// The provider type cannot be instantiated.
    #[error("cannot instantiate provider type '{type_name}': {message}")]
    Instantiation { type_name: String, message: String },

    /// Any other failure, optionally wrapping the error that caused it.
    #[error("{message}")]
    Other {
        message: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    },
}

impl NativeError {
    pub fn invalid_this(message: impl Into<String>) -> Self {
        NativeError::InvalidThis {
            message: message.into(),
        }
    }

    /// A failure with no underlying cause.
    pub fn other(message: impl Into<String>) -> Self {
        NativeError::Other {
            message: message.into(),
            source: None,
        }
    }

    /// A failure wrapping the error that caused it.
    pub fn caused_by(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        NativeError::Other {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Walk the `source()` chain to its innermost error.
pub fn root_cause<'a>(err: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    let mut cause = err;
    while let Some(next) = cause.source() {
        cause = next;
    }
    cause
}
