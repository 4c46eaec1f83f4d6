//! Conversion traits between Rust values and [`Dynamic`] slots.
//!
//! - [`FromDynamic`]: extract a Rust value from an argument slot
//! - [`IntoDynamic`]: convert a Rust value into a slot
//!
//! ## Example
//!
//! ```
//! use sqlprovider_core::{Dynamic, FromDynamic, IntoDynamic};
//!
//! let slot = 42i32.into_dynamic();
//! assert_eq!(i32::from_dynamic(&slot).unwrap(), 42);
//! assert_eq!(Option::<String>::from_dynamic(&Dynamic::Null).unwrap(), None);
//! ```

use crate::native_error::ConversionError;
use crate::{Dynamic, ParamMap, ProviderContext};

/// Extract a value from a [`Dynamic`] slot.
pub trait FromDynamic: Sized {
    /// Returns a `ConversionError` if the slot holds an incompatible type.
    fn from_dynamic(slot: &Dynamic) -> Result<Self, ConversionError>;
}

/// Convert a value into a [`Dynamic`] slot.
pub trait IntoDynamic {
    fn into_dynamic(self) -> Dynamic;
}

fn mismatch(expected: &'static str, slot: &Dynamic) -> ConversionError {
    match slot {
        Dynamic::Null => ConversionError::NullValue {
            target_type: expected,
        },
        _ => ConversionError::TypeMismatch {
            expected,
            actual: slot.type_name(),
        },
    }
}

// ============================================================================
// Integers
// ============================================================================

macro_rules! impl_dynamic_int {
    ($($ty:ty),*) => {
        $(
            impl FromDynamic for $ty {
                fn from_dynamic(slot: &Dynamic) -> Result<Self, ConversionError> {
                    match slot {
                        Dynamic::Int(v) => <$ty>::try_from(*v).map_err(|_| {
                            ConversionError::IntegerOverflow {
                                value: *v,
                                target_type: stringify!($ty),
                            }
                        }),
                        _ => Err(mismatch("int", slot)),
                    }
                }
            }

            impl IntoDynamic for $ty {
                fn into_dynamic(self) -> Dynamic {
                    Dynamic::Int(self as i64)
                }
            }
        )*
    };
}

impl_dynamic_int!(i8, i16, i32, i64, u8, u16, u32);

// ============================================================================
// Floats, bool, text
// ============================================================================

impl FromDynamic for f64 {
    fn from_dynamic(slot: &Dynamic) -> Result<Self, ConversionError> {
        match slot {
            Dynamic::Float(v) => Ok(*v),
            Dynamic::Int(v) => Ok(*v as f64),
            _ => Err(mismatch("float", slot)),
        }
    }
}

impl IntoDynamic for f64 {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::Float(self)
    }
}

impl IntoDynamic for f32 {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::Float(self as f64)
    }
}

impl FromDynamic for bool {
    fn from_dynamic(slot: &Dynamic) -> Result<Self, ConversionError> {
        match slot {
            Dynamic::Bool(v) => Ok(*v),
            _ => Err(mismatch("bool", slot)),
        }
    }
}

impl IntoDynamic for bool {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::Bool(self)
    }
}

impl FromDynamic for String {
    fn from_dynamic(slot: &Dynamic) -> Result<Self, ConversionError> {
        match slot {
            Dynamic::String(s) => Ok(s.clone()),
            _ => Err(mismatch("string", slot)),
        }
    }
}

impl IntoDynamic for String {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::String(self)
    }
}

impl IntoDynamic for &str {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::String(self.to_string())
    }
}

// ============================================================================
// Structured values
// ============================================================================

impl FromDynamic for ParamMap {
    fn from_dynamic(slot: &Dynamic) -> Result<Self, ConversionError> {
        match slot {
            Dynamic::Map(map) => Ok(map.clone()),
            _ => Err(mismatch("map", slot)),
        }
    }
}

impl IntoDynamic for ParamMap {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::Map(self)
    }
}

impl FromDynamic for ProviderContext {
    fn from_dynamic(slot: &Dynamic) -> Result<Self, ConversionError> {
        match slot {
            Dynamic::Context(ctx) => Ok(ctx.clone()),
            _ => Err(mismatch("ProviderContext", slot)),
        }
    }
}

impl IntoDynamic for ProviderContext {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::Context(self)
    }
}

impl IntoDynamic for Dynamic {
    fn into_dynamic(self) -> Dynamic {
        self
    }
}

impl FromDynamic for Dynamic {
    fn from_dynamic(slot: &Dynamic) -> Result<Self, ConversionError> {
        Ok(slot.clone())
    }
}

// Null maps to None
impl<T: FromDynamic> FromDynamic for Option<T> {
    fn from_dynamic(slot: &Dynamic) -> Result<Self, ConversionError> {
        match slot {
            Dynamic::Null => Ok(None),
            other => T::from_dynamic(other).map(Some),
        }
    }
}

impl<T: IntoDynamic> IntoDynamic for Option<T> {
    fn into_dynamic(self) -> Dynamic {
        match self {
            Some(v) => v.into_dynamic(),
            None => Dynamic::Null,
        }
    }
}
