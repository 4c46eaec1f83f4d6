//! Declared parameter and return shapes of provider routines.

use std::any::Any;
use std::fmt;

use crate::TypeHash;

/// Identity of a host (Rust) domain type passed through as a native value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeType {
    name: &'static str,
    hash: TypeHash,
}

impl NativeType {
    /// The native type identity of `T`.
    pub fn of<T: Any>() -> Self {
        Self {
            name: std::any::type_name::<T>(),
            hash: TypeHash::of::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn hash(&self) -> TypeHash {
        self.hash
    }
}

/// Declared type of a routine parameter, or the runtime type of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// Accepts any value. Also the runtime type reported for null.
    Object,
    Bool,
    Int,
    Float,
    String,
    /// Name-keyed parameter mapping.
    Map,
    /// Marker for the provider context slot.
    Context,
    /// A host domain type.
    Native(NativeType),
}

impl ParamType {
    /// Shorthand for `ParamType::Native(NativeType::of::<T>())`.
    pub fn native<T: Any>() -> Self {
        ParamType::Native(NativeType::of::<T>())
    }

    /// Human-readable type name.
    pub fn name(&self) -> &'static str {
        match self {
            ParamType::Object => "object",
            ParamType::Bool => "bool",
            ParamType::Int => "int",
            ParamType::Float => "float",
            ParamType::String => "string",
            ParamType::Map => "map",
            ParamType::Context => "ProviderContext",
            ParamType::Native(native) => native.name(),
        }
    }

    /// Hash of this type, used for routine identity.
    pub fn type_hash(&self) -> TypeHash {
        match self {
            ParamType::Native(native) => native.hash(),
            other => TypeHash::from_name(other.name()),
        }
    }

    /// Whether a value whose runtime type is `other` can be passed where
    /// `self` is declared.
    pub fn is_assignable_from(&self, other: ParamType) -> bool {
        *self == ParamType::Object || *self == other
    }

    pub fn is_context(&self) -> bool {
        matches!(self, ParamType::Context)
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared return shape of a routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnType {
    Void,
    /// Character-sequence compatible output.
    Text,
    /// Any other value.
    Value(ParamType),
}

impl ReturnType {
    /// Whether the routine produces statement text.
    pub fn is_text(&self) -> bool {
        matches!(self, ReturnType::Text)
    }
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnType::Void => f.write_str("void"),
            ReturnType::Text => f.write_str("text"),
            ReturnType::Value(ty) => write!(f, "{ty}"),
        }
    }
}
