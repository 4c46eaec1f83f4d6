//! Routine definitions and registry entries.
//!
//! [`RoutineDef`] is the declared signature of a provider routine;
//! [`RoutineEntry`] pairs it with the native implementation.

use std::fmt;

use bitflags::bitflags;

use crate::{NativeFn, ParamType, ReturnType, TypeHash};

bitflags! {
    /// Declaration modifiers of a routine.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Visible to routine lookup.
        const PUBLIC = 1 << 0;
        /// Called without a receiver instance.
        const STATIC = 1 << 1;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Modifiers::PUBLIC
    }
}

/// A declared routine parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParamDef {
    /// Name used for name-keyed binding.
    pub name: String,
    pub ty: ParamType,
}

impl ParamDef {
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// A provider context parameter.
    pub fn context(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Context)
    }
}

/// Declared signature of a provider routine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoutineDef {
    /// Name of the provider type declaring this routine.
    pub owner: String,
    pub name: String,
    pub params: Vec<ParamDef>,
    pub return_type: ReturnType,
    pub modifiers: Modifiers,
}

impl RoutineDef {
    /// A public instance routine returning statement text.
    ///
    /// The owner is filled in when the routine is attached to a provider type.
    pub fn text(name: impl Into<String>, params: Vec<ParamDef>) -> Self {
        Self {
            owner: String::new(),
            name: name.into(),
            params,
            return_type: ReturnType::Text,
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_return(mut self, return_type: ReturnType) -> Self {
        self.return_type = return_type;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Mark the routine as static (no receiver).
    pub fn into_static(mut self) -> Self {
        self.modifiers |= Modifiers::STATIC;
        self
    }

    /// Remove public visibility.
    pub fn into_private(mut self) -> Self {
        self.modifiers -= Modifiers::PUBLIC;
        self
    }

    pub fn is_public(&self) -> bool {
        self.modifiers.contains(Modifiers::PUBLIC)
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.contains(Modifiers::STATIC)
    }

    pub fn returns_text(&self) -> bool {
        self.return_type.is_text()
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Ordered parameter types.
    pub fn param_types(&self) -> Vec<ParamType> {
        self.params.iter().map(|p| p.ty).collect()
    }

    /// Ordered parameter names.
    pub fn param_names(&self) -> Vec<String> {
        self.params.iter().map(|p| p.name.clone()).collect()
    }

    /// Identity of this routine, derived from owner, name and parameter types.
    pub fn hash(&self) -> TypeHash {
        let params: Vec<TypeHash> = self.params.iter().map(|p| p.ty.type_hash()).collect();
        TypeHash::from_routine(TypeHash::from_name(&self.owner), &self.name, &params)
    }
}

/// `Owner.name(type, type)`
impl fmt::Display for RoutineDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}(", self.owner, self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", param.ty)?;
        }
        f.write_str(")")
    }
}

/// Registry entry for a provider routine.
#[derive(Debug, Clone)]
pub struct RoutineEntry {
    pub def: RoutineDef,
    pub native: NativeFn,
}

impl RoutineEntry {
    pub fn new(def: RoutineDef, native: NativeFn) -> Self {
        Self { def, native }
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }
}

impl PartialEq for RoutineEntry {
    fn eq(&self, other: &Self) -> bool {
        // NativeFn has no equality; compare by signature
        self.def == other.def
    }
}
