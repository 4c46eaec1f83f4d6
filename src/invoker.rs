//! Provider routine invocation.

use tracing::trace;

use sqlprovider_core::{CallContext, Dynamic, NativeError};
use sqlprovider_registry::{InstanceFactory, ResolvedRoutine};

/// Call a resolved routine with bound arguments.
///
/// Instance routines run against a fresh receiver from `factory`. A null
/// return is `None`; non-text values are converted to their text form.
pub fn invoke(
    routine: &ResolvedRoutine,
    factory: &dyn InstanceFactory,
    args: &[Dynamic],
) -> Result<Option<String>, NativeError> {
    let receiver = if routine.is_static() {
        None
    } else {
        Some(factory.instantiate(routine.provider())?)
    };

    let mut ctx = CallContext::new(receiver.as_deref(), args);
    routine.routine().native.call(&mut ctx)?;

    let text = match ctx.take_return() {
        Dynamic::Null => None,
        Dynamic::String(text) => Some(text),
        other => Some(other.to_string()),
    };
    trace!(routine = %routine.signature(), has_text = text.is_some(), "invoked provider routine");
    Ok(text)
}
