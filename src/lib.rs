//! Provider-backed statement sources.
//!
//! Mapper methods annotated with a provider annotation get their statement
//! text from a routine registered on a provider type. This crate resolves
//! that routine once, binds each invocation value onto its parameters, runs
//! it and compiles the produced text with a language driver.
//!
//! ```text
//! ProviderAnnotation ─┐
//! MapperMethod ───────┼─> ProviderSqlSource::new ──> ResolvedRoutine
//! Configuration ──────┘
//!
//! Dynamic ──> bind_arguments ──> invoke ──> LanguageDriver ──> BoundSql
//! ```

pub mod annotation;
pub mod binder;
pub mod configuration;
pub mod invoker;
pub mod language;
pub mod provider_sql_source;

pub use annotation::{ProviderAnnotation, ProviderKind};
pub use configuration::Configuration;
pub use language::{BoundSql, LanguageDriver, ParameterMapping, RawLanguageDriver, SqlSource, StaticSqlSource};
pub use provider_sql_source::ProviderSqlSource;

pub mod prelude {
    pub use crate::annotation::{ProviderAnnotation, ProviderKind};
    pub use crate::configuration::Configuration;
    pub use crate::language::*;
    pub use crate::provider_sql_source::ProviderSqlSource;
    pub use sqlprovider_core::{
        BuilderError, CallContext, Dynamic, FromDynamic, IntoDynamic, MapperMethod, NativeError, ParamDef, ParamMap,
        ParamType, ProviderContext, RegistrationError, ReturnType, RoutineDef, RoutineEntry,
    };
    pub use sqlprovider_registry::{
        Constructor, InstanceFactory, MapperMethodNameResolver, ProviderMethodResolver, ProviderRegistry, ProviderType,
    };
}
