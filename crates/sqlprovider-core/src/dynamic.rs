//! Runtime values passed to and returned from provider routines.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::convert::IntoDynamic;
use crate::{NativeType, ParamType, ProviderContext};

/// A dynamic value flowing through the binder and invoker.
///
/// Host domain objects travel as [`Dynamic::Native`]; they are reference
/// counted so argument vectors can be rebuilt per call without requiring the
/// domain type to be `Clone`.
#[derive(Clone)]
pub enum Dynamic {
    /// Absent value
    Null,
    Bool(bool),
    /// Integer value (all widths stored as i64)
    Int(i64),
    /// Floating point value (f32, f64 both stored as f64)
    Float(f64),
    String(String),
    /// Name-keyed parameters
    Map(ParamMap),
    /// Injected call-site metadata
    Context(ProviderContext),
    /// Host domain object
    Native(NativeValue),
}

impl Dynamic {
    /// Wrap a host domain object.
    pub fn native<T: Any + Send + Sync>(value: T) -> Self {
        Dynamic::Native(NativeValue::new(value))
    }

    /// Get a human-readable name for this value's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Dynamic::Null => "null",
            other => other.value_type().name(),
        }
    }

    /// The runtime type of this value. Null reports [`ParamType::Object`].
    pub fn value_type(&self) -> ParamType {
        match self {
            Dynamic::Null => ParamType::Object,
            Dynamic::Bool(_) => ParamType::Bool,
            Dynamic::Int(_) => ParamType::Int,
            Dynamic::Float(_) => ParamType::Float,
            Dynamic::String(_) => ParamType::String,
            Dynamic::Map(_) => ParamType::Map,
            Dynamic::Context(_) => ParamType::Context,
            Dynamic::Native(native) => ParamType::Native(native.native_type()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Dynamic::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Dynamic::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ParamMap> {
        match self {
            Dynamic::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_context(&self) -> Option<&ProviderContext> {
        match self {
            Dynamic::Context(ctx) => Some(ctx),
            _ => None,
        }
    }

    /// Borrow a native value as `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Dynamic::Native(native) => native.downcast_ref(),
            _ => None,
        }
    }
}

impl fmt::Debug for Dynamic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dynamic::Null => write!(f, "Null"),
            Dynamic::Bool(v) => write!(f, "Bool({})", v),
            Dynamic::Int(v) => write!(f, "Int({})", v),
            Dynamic::Float(v) => write!(f, "Float({})", v),
            Dynamic::String(s) => write!(f, "String({:?})", s),
            Dynamic::Map(m) => write!(f, "Map({:?})", m),
            Dynamic::Context(c) => write!(f, "Context({:?})", c),
            Dynamic::Native(n) => write!(f, "Native({})", n.type_name()),
        }
    }
}

/// Text form of a value, used when a routine returns something other than a
/// string.
impl fmt::Display for Dynamic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dynamic::Null => f.write_str("null"),
            Dynamic::Bool(v) => write!(f, "{v}"),
            Dynamic::Int(v) => write!(f, "{v}"),
            Dynamic::Float(v) => write!(f, "{v}"),
            Dynamic::String(s) => f.write_str(s),
            Dynamic::Map(m) => write!(f, "{m:?}"),
            Dynamic::Context(_) => f.write_str("ProviderContext"),
            Dynamic::Native(n) => f.write_str(n.type_name()),
        }
    }
}

impl PartialEq for Dynamic {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Dynamic::Null, Dynamic::Null) => true,
            (Dynamic::Bool(a), Dynamic::Bool(b)) => a == b,
            (Dynamic::Int(a), Dynamic::Int(b)) => a == b,
            (Dynamic::Float(a), Dynamic::Float(b)) => a == b,
            (Dynamic::String(a), Dynamic::String(b)) => a == b,
            (Dynamic::Map(a), Dynamic::Map(b)) => a == b,
            (Dynamic::Context(a), Dynamic::Context(b)) => a == b,
            // Native values compare by identity
            (Dynamic::Native(a), Dynamic::Native(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

/// A shared host domain object.
#[derive(Clone)]
pub struct NativeValue {
    native_type: NativeType,
    value: Arc<dyn Any + Send + Sync>,
}

impl NativeValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            native_type: NativeType::of::<T>(),
            value: Arc::new(value),
        }
    }

    pub fn native_type(&self) -> NativeType {
        self.native_type
    }

    pub fn type_name(&self) -> &'static str {
        self.native_type.name()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Whether both handles point at the same object.
    pub fn ptr_eq(&self, other: &NativeValue) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

/// Name-keyed invocation parameters.
///
/// A missing key and a key holding [`Dynamic::Null`] are distinguishable
/// here; binding treats both as null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamMap {
    entries: FxHashMap<String, Dynamic>,
}

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl IntoDynamic) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a value, returning the previous one for this name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl IntoDynamic) -> Option<Dynamic> {
        self.entries.insert(name.into(), value.into_dynamic())
    }

    /// Look up a value; `None` means the name is absent.
    pub fn get(&self, name: &str) -> Option<&Dynamic> {
        self.entries.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Dynamic)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: IntoDynamic> FromIterator<(K, V)> for ParamMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ParamMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}
