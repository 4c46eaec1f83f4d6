//! Error types for provider registration and statement building.
//!
//! ## Error Hierarchy
//!
//! ```text
//! RegistrationError - populating the provider registry
//! BuilderError      - resolving and invoking provider routines
//! ├── construction-time (fatal, abort mapping registration)
//! └── per call (reported to the caller, never retried)
//! NativeError       - raised by native routines (see native_error)
//! ```

use thiserror::Error;

use crate::NativeError;

/// Errors raised while registering provider types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A provider type with this name already exists.
    #[error("duplicate provider type: {0}")]
    DuplicateProvider(String),

    /// A routine with the same signature is already declared on the type.
    #[error("duplicate routine '{signature}' in provider type '{provider}'")]
    DuplicateRoutine { provider: String, signature: String },

    /// A provider type needs a name.
    #[error("provider type name must not be empty")]
    EmptyProviderName,
}

/// Errors raised while building statements from a provider.
#[derive(Debug, Error)]
pub enum BuilderError {
    // ------------------------------------------------------------------
    // Construction time
    // ------------------------------------------------------------------
    /// Neither `type` nor `value` was given and no default is configured.
    #[error("Please specify either 'value' or 'type' attribute of @{annotation} at the '{mapper_method}'.")]
    MissingProviderIdentity {
        annotation: String,
        mapper_method: String,
    },

    /// `type` and `value` were both given and name different types.
    #[error("Cannot specify different class on 'value' and 'type' attribute of @{annotation} at the '{mapper_method}'.")]
    ConflictingProviderIdentity {
        annotation: String,
        mapper_method: String,
    },

    /// The provider type is not registered.
    #[error("Error creating SqlSource for SqlProvider. Provider type '{provider}' is not registered.")]
    ProviderTypeNotFound { provider: String },

    /// No public text-returning routine has the target name.
    #[error("Error creating SqlSource for SqlProvider. Method '{method}' not found in SqlProvider '{provider}'.")]
    RoutineNotFound { method: String, provider: String },

    /// More than one routine matches; provider routines must not be overloaded.
    #[error("Error creating SqlSource for SqlProvider. Method '{method}' is found multiple in SqlProvider '{provider}'. Sql provider method can not overload.")]
    AmbiguousRoutine { method: String, provider: String },

    /// The routine declares more than one provider context parameter.
    #[error("Error creating SqlSource for SqlProvider. ProviderContext found multiple in SqlProvider method ({routine}). ProviderContext can not define multiple in SqlProvider method argument.")]
    ConflictingDeclaration { routine: String },

    /// A provider's own method resolver could not pick a routine.
    #[error("Cannot resolve the provider method because '{method}' {reason} in SqlProvider '{provider}'.")]
    MethodResolution {
        method: String,
        provider: String,
        reason: String,
    },

    /// The mapper method requested an unknown language driver.
    #[error("Error creating SqlSource for SqlProvider. Language driver '{lang}' is not registered.")]
    LanguageDriverNotFound { lang: String },

    // ------------------------------------------------------------------
    // Per call
    // ------------------------------------------------------------------
    /// The routine's parameter shape cannot be bound.
    #[error("Cannot invoke SqlProvider method '{routine}' with specify parameter '{parameter_type}' because SqlProvider method arguments for '{mapper_method}' is an invalid combination.")]
    InvalidArgumentCombination {
        routine: String,
        parameter_type: String,
        mapper_method: String,
    },

    /// The routine failed; `root_cause` is the innermost error message.
    #[error("Error invoking SqlProvider method '{routine}' with specify parameter '{parameter_type}'.  Cause: {root_cause}")]
    Invocation {
        routine: String,
        parameter_type: String,
        root_cause: String,
        #[source]
        source: NativeError,
    },

    /// The language driver rejected the statement text.
    #[error("Error compiling statement: {message}")]
    Compile { message: String },

    /// The language driver failed on the routine's text; `root_cause` is
    /// the innermost error message.
    #[error("Error invoking SqlProvider method '{routine}' with specify parameter '{parameter_type}'.  Cause: {root_cause}")]
    Statement {
        routine: String,
        parameter_type: String,
        root_cause: String,
        #[source]
        source: Box<BuilderError>,
    },
}

impl BuilderError {
    /// Whether this error is raised while constructing a statement source.
    pub fn is_construction_error(&self) -> bool {
        !matches!(
            self,
            BuilderError::InvalidArgumentCombination { .. }
                | BuilderError::Invocation { .. }
                | BuilderError::Compile { .. }
                | BuilderError::Statement { .. }
        )
    }
}
