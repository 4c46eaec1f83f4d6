//! Provider type entries.
//!
//! A [`ProviderType`] is the registry's stand-in for a class declaring
//! statement routines: a name, a list of routines, an optional constructor for
//! instance routines and an optional self-resolving capability.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use sqlprovider_core::{BuilderError, CallContext, NativeError, NativeFn, RoutineDef, RoutineEntry};

use crate::resolver::ProviderMethodResolver;

type ConstructorFn = dyn Fn() -> Result<Box<dyn Any + Send + Sync>, NativeError> + Send + Sync;

/// Creates fresh receiver instances of a provider type.
#[derive(Clone)]
pub struct Constructor(Arc<ConstructorFn>);

impl Constructor {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> Result<Box<dyn Any + Send + Sync>, NativeError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Constructor backed by `T::default()`.
    pub fn of_default<T: Default + Any + Send + Sync>() -> Self {
        Self::new(|| Ok(Box::new(T::default())))
    }

    pub fn construct(&self) -> Result<Box<dyn Any + Send + Sync>, NativeError> {
        (self.0)()
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor").finish_non_exhaustive()
    }
}

/// A registered provider type.
#[derive(Clone)]
pub struct ProviderType {
    name: String,
    routines: Vec<RoutineEntry>,
    constructor: Option<Constructor>,
    method_resolver: Option<Arc<dyn ProviderMethodResolver>>,
}

impl ProviderType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            routines: Vec::new(),
            constructor: None,
            method_resolver: None,
        }
    }

    /// Attach a routine implemented by a closure.
    ///
    /// The routine's owner is set to this type.
    pub fn with_routine<F>(mut self, mut def: RoutineDef, f: F) -> Self
    where
        F: Fn(&mut CallContext<'_>) -> Result<(), NativeError> + Send + Sync + 'static,
    {
        def.owner = self.name.clone();
        let native = NativeFn::new(def.hash(), f);
        self.routines.push(RoutineEntry::new(def, native));
        self
    }

    /// Attach an already built routine entry.
    ///
    /// The owner is replaced by this type and the routine id recomputed.
    pub fn with_entry(mut self, mut entry: RoutineEntry) -> Self {
        entry.def.owner = self.name.clone();
        entry.native.id = entry.def.hash();
        self.routines.push(entry);
        self
    }

    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructor = Some(constructor);
        self
    }

    /// Instance routines receive a fresh `T::default()`.
    pub fn with_default_constructor<T: Default + Any + Send + Sync>(self) -> Self {
        self.with_constructor(Constructor::of_default::<T>())
    }

    /// Let this type pick its own routine when no method name is given.
    pub fn with_method_resolver(mut self, resolver: impl ProviderMethodResolver + 'static) -> Self {
        self.method_resolver = Some(Arc::new(resolver));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn routines(&self) -> &[RoutineEntry] {
        &self.routines
    }

    pub fn constructor(&self) -> Option<&Constructor> {
        self.constructor.as_ref()
    }

    pub fn method_resolver(&self) -> Option<&dyn ProviderMethodResolver> {
        self.method_resolver.as_deref()
    }

    /// Public routines, in declaration order.
    pub fn public_routines(&self) -> impl Iterator<Item = &RoutineEntry> {
        self.routines.iter().filter(|r| r.def.is_public())
    }

    /// The single public routine named `name` that returns text.
    ///
    /// Overloads are rejected: two matches is [`BuilderError::AmbiguousRoutine`].
    pub fn find_text_routine(&self, name: &str) -> Result<&RoutineEntry, BuilderError> {
        let mut found: Option<&RoutineEntry> = None;
        for routine in self.public_routines() {
            if routine.name() != name || !routine.def.returns_text() {
                continue;
            }
            if found.is_some() {
                return Err(BuilderError::AmbiguousRoutine {
                    method: name.to_string(),
                    provider: self.name.clone(),
                });
            }
            found = Some(routine);
        }
        found.ok_or_else(|| BuilderError::RoutineNotFound {
            method: name.to_string(),
            provider: self.name.clone(),
        })
    }
}

impl fmt::Debug for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderType")
            .field("name", &self.name)
            .field("routines", &self.routines.len())
            .field("constructor", &self.constructor.is_some())
            .field("method_resolver", &self.method_resolver.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlprovider_core::{ParamDef, ParamType, ReturnType};

    fn sql(text: &'static str) -> impl Fn(&mut CallContext<'_>) -> Result<(), NativeError> {
        move |ctx| {
            ctx.set_return(text);
            Ok(())
        }
    }

    #[derive(Default)]
    struct UserSqlProvider;

    #[test]
    fn routine_owner_is_set() {
        let provider =
            ProviderType::new("UserSqlProvider").with_routine(RoutineDef::text("provideSql", vec![]), sql("SELECT 1"));
        assert_eq!(provider.routines()[0].def.owner, "UserSqlProvider");
        assert_eq!(provider.routines()[0].native.id, provider.routines()[0].def.hash());
    }

    #[test]
    fn attached_entry_is_reowned() {
        let def = RoutineDef::text("provideSql", vec![]);
        let entry = RoutineEntry::new(def.clone(), NativeFn::new(def.hash(), sql("SELECT 1")));
        let provider = ProviderType::new("UserSqlProvider").with_entry(entry);

        let attached = &provider.routines()[0];
        assert_eq!(attached.def.owner, "UserSqlProvider");
        assert_eq!(attached.native.id, attached.def.hash());
        assert_ne!(attached.native.id, def.hash());
    }

    #[test]
    fn find_single_routine() {
        let provider = ProviderType::new("P")
            .with_routine(RoutineDef::text("provideSql", vec![]), sql("SELECT 1"))
            .with_routine(RoutineDef::text("other", vec![]), sql("SELECT 2"));
        assert_eq!(provider.find_text_routine("provideSql").unwrap().name(), "provideSql");
    }

    #[test]
    fn overloads_are_ambiguous() {
        let provider = ProviderType::new("P")
            .with_routine(RoutineDef::text("provideSql", vec![]), sql("SELECT 1"))
            .with_routine(
                RoutineDef::text("provideSql", vec![ParamDef::new("id", ParamType::Int)]),
                sql("SELECT 2"),
            );
        assert!(matches!(
            provider.find_text_routine("provideSql"),
            Err(BuilderError::AmbiguousRoutine { .. })
        ));
    }

    #[test]
    fn non_text_and_private_routines_are_skipped() {
        let provider = ProviderType::new("P")
            .with_routine(
                RoutineDef::text("provideSql", vec![]).with_return(ReturnType::Value(ParamType::Int)),
                sql("SELECT 1"),
            )
            .with_routine(RoutineDef::text("provideSql", vec![]).into_private(), sql("SELECT 2"));
        assert!(matches!(
            provider.find_text_routine("provideSql"),
            Err(BuilderError::RoutineNotFound { .. })
        ));
    }

    #[test]
    fn default_constructor_builds_instances() {
        let provider = ProviderType::new("UserSqlProvider").with_default_constructor::<UserSqlProvider>();
        let instance = provider.constructor().unwrap().construct().unwrap();
        assert!(instance.downcast_ref::<UserSqlProvider>().is_some());
    }
}
