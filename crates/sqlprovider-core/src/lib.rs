//! Core types shared by the provider registry and statement sources.
//!
//! - [`TypeHash`]: deterministic identity for provider types and routines
//! - [`Dynamic`]: runtime values passed to and returned from routines
//! - [`NativeFn`] / [`CallContext`]: type-erased routine implementations
//! - [`RoutineDef`] / [`RoutineEntry`]: declared routine signatures
//! - [`BuilderError`]: statement building failures

pub mod convert;
mod dynamic;
mod error;
pub mod native_error;
mod native_fn;
mod param_type;
mod provider_context;
mod routine;
mod type_hash;

pub use convert::{FromDynamic, IntoDynamic};
pub use dynamic::{Dynamic, NativeValue, ParamMap};
pub use error::{BuilderError, RegistrationError};
pub use native_error::{ConversionError, NativeError, root_cause};
pub use native_fn::{CallContext, NativeCallable, NativeFn};
pub use param_type::{NativeType, ParamType, ReturnType};
pub use provider_context::{MapperMethod, ProviderContext};
pub use routine::{Modifiers, ParamDef, RoutineDef, RoutineEntry};
pub use type_hash::TypeHash;
