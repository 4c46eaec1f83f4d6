//! ProviderRegistry - provider type storage and routine resolution.
//!
//! # Thread Safety
//!
//! The registry is populated single-threaded while mappings are registered.
//! Resolution produces [`ResolvedRoutine`] values that own everything they
//! need (`Arc` handles to the provider type and the routine), so statement
//! sources never borrow the registry after construction.
//!
//! # Example
//!
//! ```
//! use sqlprovider_core::{ProviderContext, RoutineDef};
//! use sqlprovider_registry::{ProviderDescriptor, ProviderRegistry, ProviderType};
//!
//! let mut registry = ProviderRegistry::new();
//! registry
//!     .register(ProviderType::new("UserSqlProvider").with_routine(
//!         RoutineDef::text("provideSql", vec![]).into_static(),
//!         |ctx| {
//!             ctx.set_return("SELECT * FROM users");
//!             Ok(())
//!         },
//!     ))
//!     .unwrap();
//!
//! let descriptor = ProviderDescriptor::new("UserSqlProvider", None, ProviderContext::default());
//! let resolved = registry.resolve(&descriptor).unwrap();
//! assert_eq!(resolved.routine().name(), "provideSql");
//! assert_eq!(resolved.context_index(), None);
//! ```

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use sqlprovider_core::{BuilderError, ParamType, ProviderContext, RegistrationError, RoutineEntry};

use crate::ProviderType;

/// Conventional routine name used when a descriptor names none.
pub const DEFAULT_PROVIDER_METHOD: &str = "provideSql";

/// Everything needed to resolve a provider routine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDescriptor {
    /// Name of the provider type.
    pub provider_type: String,
    /// Explicit routine name, if any.
    pub method: Option<String>,
    /// Call-site metadata, handed to self-resolving providers.
    pub context: ProviderContext,
}

impl ProviderDescriptor {
    /// An empty method name counts as absent.
    pub fn new(provider_type: impl Into<String>, method: Option<String>, context: ProviderContext) -> Self {
        Self {
            provider_type: provider_type.into(),
            method: method.filter(|m| !m.is_empty()),
            context,
        }
    }
}

/// A provider routine chosen at registration time.
///
/// Immutable and cheap to share; the per-call path only reads it.
#[derive(Debug, Clone)]
pub struct ResolvedRoutine {
    provider: Arc<ProviderType>,
    routine: RoutineEntry,
    param_types: Vec<ParamType>,
    param_names: Vec<String>,
    context_index: Option<usize>,
}

impl ResolvedRoutine {
    fn new(provider: Arc<ProviderType>, routine: RoutineEntry) -> Result<Self, BuilderError> {
        let param_types = routine.def.param_types();
        let param_names = routine.def.param_names();

        let mut context_index = None;
        for (i, ty) in param_types.iter().enumerate() {
            if !ty.is_context() {
                continue;
            }
            if context_index.is_some() {
                return Err(BuilderError::ConflictingDeclaration {
                    routine: routine.def.to_string(),
                });
            }
            context_index = Some(i);
        }

        Ok(Self {
            provider,
            routine,
            param_types,
            param_names,
            context_index,
        })
    }

    pub fn provider(&self) -> &ProviderType {
        &self.provider
    }

    pub fn routine(&self) -> &RoutineEntry {
        &self.routine
    }

    pub fn param_types(&self) -> &[ParamType] {
        &self.param_types
    }

    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Position of the provider context parameter, if declared.
    pub fn context_index(&self) -> Option<usize> {
        self.context_index
    }

    pub fn param_count(&self) -> usize {
        self.param_types.len()
    }

    /// Number of parameters filled from the invocation value.
    pub fn bind_param_count(&self) -> usize {
        self.param_count() - usize::from(self.context_index.is_some())
    }

    pub fn is_static(&self) -> bool {
        self.routine.def.is_static()
    }

    /// `Owner.name(types)` for error messages.
    pub fn signature(&self) -> String {
        self.routine.def.to_string()
    }
}

/// Registry of provider types.
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    /// Provider types by name.
    providers: FxHashMap<String, Arc<ProviderType>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider type.
    ///
    /// Fails on a duplicate name or on two routines with the same signature.
    /// Same-name routines with different signatures are accepted here and
    /// rejected at resolution time.
    pub fn register(&mut self, provider: ProviderType) -> Result<(), RegistrationError> {
        if provider.name().is_empty() {
            return Err(RegistrationError::EmptyProviderName);
        }
        if self.providers.contains_key(provider.name()) {
            return Err(RegistrationError::DuplicateProvider(provider.name().to_string()));
        }

        let mut seen = FxHashSet::default();
        for routine in provider.routines() {
            if !seen.insert(routine.def.hash()) {
                return Err(RegistrationError::DuplicateRoutine {
                    provider: provider.name().to_string(),
                    signature: routine.def.to_string(),
                });
            }
        }

        debug!(
            provider = provider.name(),
            routines = provider.routines().len(),
            "registered provider type"
        );
        self.providers
            .insert(provider.name().to_string(), Arc::new(provider));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ProviderType> {
        self.providers.get(name).map(|p| p.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Resolve the routine a descriptor refers to.
    ///
    /// 1. No explicit method and a self-resolving provider: ask the provider.
    /// 2. Otherwise look up the explicit name, or `provideSql`.
    /// 3. Locate the provider context slot (at most one).
    pub fn resolve(&self, descriptor: &ProviderDescriptor) -> Result<ResolvedRoutine, BuilderError> {
        let provider = self
            .providers
            .get(&descriptor.provider_type)
            .ok_or_else(|| BuilderError::ProviderTypeNotFound {
                provider: descriptor.provider_type.clone(),
            })?;

        let mut chosen: Option<&RoutineEntry> = None;
        if descriptor.method.is_none() {
            if let Some(resolver) = provider.method_resolver() {
                chosen = resolver.resolve_method(provider, &descriptor.context)?;
            }
        }

        let routine = match chosen {
            Some(routine) => routine,
            None => {
                let name = descriptor
                    .method
                    .as_deref()
                    .unwrap_or(DEFAULT_PROVIDER_METHOD);
                provider.find_text_routine(name)?
            }
        };

        let resolved = ResolvedRoutine::new(Arc::clone(provider), routine.clone())?;
        debug!(
            routine = %resolved.signature(),
            context_index = ?resolved.context_index(),
            "resolved provider routine"
        );
        Ok(resolved)
    }
}
