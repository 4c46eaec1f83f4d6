//! Argument binding for provider routines.
//!
//! Maps one invocation value onto the declared parameters of a resolved
//! routine, injecting the provider context at its slot.

use thiserror::Error;

use sqlprovider_core::{Dynamic, ParamMap, ParamType, ProviderContext};
use sqlprovider_registry::ResolvedRoutine;

/// The routine's parameters cannot be filled from the invocation value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{declared} declared parameters ({context} context) cannot be bound from a {value} value")]
pub struct BindError {
    pub declared: usize,
    pub context: usize,
    pub value: &'static str,
}

/// Build the argument vector for one call.
pub fn bind_arguments(
    routine: &ResolvedRoutine,
    context: &ProviderContext,
    value: &Dynamic,
) -> Result<Vec<Dynamic>, BindError> {
    let invalid = || BindError {
        declared: routine.param_count(),
        context: usize::from(routine.context_index().is_some()),
        value: value.type_name(),
    };

    if routine.bind_param_count() >= 3 {
        return Err(invalid());
    }

    if let Dynamic::Map(map) = value {
        return Ok(bind_map(routine, context, map, value));
    }

    match (routine.param_count(), routine.context_index()) {
        (0, _) => Ok(Vec::new()),
        (1, None) => Ok(vec![value.clone()]),
        (1, Some(_)) => Ok(vec![Dynamic::Context(context.clone())]),
        (2, Some(index)) => Ok(with_context(index, context, value)),
        _ => Err(invalid()),
    }
}

fn bind_map(routine: &ResolvedRoutine, context: &ProviderContext, map: &ParamMap, value: &Dynamic) -> Vec<Dynamic> {
    if routine.bind_param_count() == 1 {
        let slot = match routine.context_index() {
            Some(0) => 1,
            _ => 0,
        };
        if routine.param_types()[slot].is_assignable_from(ParamType::Map) {
            return match routine.context_index() {
                Some(index) => with_context(index, context, value),
                None => vec![value.clone()],
            };
        }
    }

    routine
        .param_names()
        .iter()
        .enumerate()
        .map(|(i, name)| {
            if routine.context_index() == Some(i) {
                Dynamic::Context(context.clone())
            } else {
                map.get(name).cloned().unwrap_or(Dynamic::Null)
            }
        })
        .collect()
}

/// Two slots: the context at `index`, the value in the other.
fn with_context(index: usize, context: &ProviderContext, value: &Dynamic) -> Vec<Dynamic> {
    let context = Dynamic::Context(context.clone());
    if index == 0 {
        vec![context, value.clone()]
    } else {
        vec![value.clone(), context]
    }
}
