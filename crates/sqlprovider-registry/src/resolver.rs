//! Self-resolving provider capability.
//!
//! A provider type may carry a [`ProviderMethodResolver`]; when a provider
//! annotation names no method, the resolver picks the routine from the call
//! site instead of the conventional `provideSql` lookup.

use sqlprovider_core::{BuilderError, ProviderContext, RoutineEntry};

use crate::ProviderType;

/// Picks a provider routine from the call-site context.
///
/// The provided implementation selects the public routine named after the
/// mapper method that returns text. Returning `Ok(None)` falls back to the
/// conventional lookup.
pub trait ProviderMethodResolver: Send + Sync {
    fn resolve_method<'p>(
        &self,
        provider: &'p ProviderType,
        context: &ProviderContext,
    ) -> Result<Option<&'p RoutineEntry>, BuilderError> {
        resolve_by_mapper_method_name(provider, context)
    }
}

/// Resolver using only the provided behaviour.
#[derive(Debug, Default, Clone, Copy)]
pub struct MapperMethodNameResolver;

impl ProviderMethodResolver for MapperMethodNameResolver {}

fn resolve_by_mapper_method_name<'p>(
    provider: &'p ProviderType,
    context: &ProviderContext,
) -> Result<Option<&'p RoutineEntry>, BuilderError> {
    let Some(method) = context.mapper_method() else {
        return Ok(None);
    };
    let name = method.name.as_str();
    let failure = |reason: &str| BuilderError::MethodResolution {
        method: name.to_string(),
        provider: provider.name().to_string(),
        reason: reason.to_string(),
    };

    let same_name: Vec<&RoutineEntry> = provider.public_routines().filter(|r| r.name() == name).collect();
    if same_name.is_empty() {
        return Err(failure("not found"));
    }

    let mut targets = same_name.into_iter().filter(|r| r.def.returns_text());
    match (targets.next(), targets.next()) {
        (Some(routine), None) => Ok(Some(routine)),
        (None, _) => Err(failure("does not return text")),
        (Some(_), Some(_)) => Err(failure("is found multiple")),
    }
}
