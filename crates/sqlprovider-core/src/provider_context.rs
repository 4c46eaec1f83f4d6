//! Invocation context handed to provider routines.
//!
//! A routine may declare one parameter of type [`ParamType::Context`]; that
//! slot receives a [`ProviderContext`] describing the calling mapper instead of
//! a caller-supplied value.
//!
//! [`ParamType::Context`]: crate::ParamType::Context

use std::fmt;

/// The mapper method a provider annotation is declared on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MapperMethod {
    /// Name of the owning mapper type.
    pub owner: String,
    /// Method name.
    pub name: String,
    /// Language driver requested for this method, if any.
    pub lang: Option<String>,
}

impl MapperMethod {
    /// Create a mapper method without a language override.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            lang: None,
        }
    }

    /// Request a specific language driver for this method.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }
}

impl fmt::Display for MapperMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.name)
    }
}

/// Metadata about the call site of a provider routine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderContext {
    mapper_type: Option<String>,
    mapper_method: Option<MapperMethod>,
    database_id: Option<String>,
}

impl ProviderContext {
    pub fn new(
        mapper_type: Option<String>,
        mapper_method: Option<MapperMethod>,
        database_id: Option<String>,
    ) -> Self {
        Self {
            mapper_type,
            mapper_method,
            database_id,
        }
    }

    /// The mapper type that declared the provider annotation.
    pub fn mapper_type(&self) -> Option<&str> {
        self.mapper_type.as_deref()
    }

    /// The mapper method that declared the provider annotation.
    pub fn mapper_method(&self) -> Option<&MapperMethod> {
        self.mapper_method.as_ref()
    }

    /// The database id of the active environment.
    pub fn database_id(&self) -> Option<&str> {
        self.database_id.as_deref()
    }
}
