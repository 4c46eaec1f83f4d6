//! Statement sources backed by provider routines.
//!
//! A [`ProviderSqlSource`] is built once per annotated mapper method. All
//! lookups happen at construction; every later call binds the invocation
//! value, runs the provider routine and compiles the produced text with the
//! selected language driver.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use sqlprovider::prelude::*;
//!
//! let mut config = Configuration::new();
//! config
//!     .register_provider(ProviderType::new("UserSqlProvider").with_routine(
//!         RoutineDef::text("selectById", vec![ParamDef::new("id", ParamType::Int)]).into_static(),
//!         |ctx| {
//!             ctx.set_return("SELECT * FROM users WHERE id = #{id}");
//!             Ok(())
//!         },
//!     ))
//!     .unwrap();
//!
//! let source = ProviderSqlSource::new(
//!     Arc::new(config),
//!     &ProviderAnnotation::select()
//!         .with_type("UserSqlProvider")
//!         .with_method("selectById"),
//!     Some("UserMapper".to_string()),
//!     Some(MapperMethod::new("UserMapper", "selectById")),
//! )
//! .unwrap();
//!
//! let bound = source.get_bound_sql(&Dynamic::Int(7)).unwrap().unwrap();
//! assert_eq!(bound.sql(), "SELECT * FROM users WHERE id = ?");
//! ```

use std::sync::Arc;

use tracing::{debug, trace, warn};

use sqlprovider_core::{BuilderError, Dynamic, MapperMethod, ProviderContext, root_cause};
use sqlprovider_registry::{InstanceFactory, ProviderDescriptor, ResolvedRoutine};

use crate::Configuration;
use crate::annotation::ProviderAnnotation;
use crate::binder::bind_arguments;
use crate::invoker::invoke;
use crate::language::{BoundSql, LanguageDriver, SqlSource};

/// Statement source for one provider-annotated mapper method.
///
/// Immutable after construction and safe to share between threads.
pub struct ProviderSqlSource {
    configuration: Arc<Configuration>,
    routine: ResolvedRoutine,
    provider_context: ProviderContext,
    language_driver: Arc<dyn LanguageDriver>,
    instance_factory: Arc<dyn InstanceFactory>,
}

impl ProviderSqlSource {
    /// Resolve the provider routine for a mapper method.
    ///
    /// # Errors
    ///
    /// Any construction-time [`BuilderError`]: unknown language driver,
    /// missing or conflicting provider identity, unknown provider type,
    /// missing or overloaded routine, or two provider context parameters.
    pub fn new(
        configuration: Arc<Configuration>,
        annotation: &ProviderAnnotation,
        mapper_type: Option<String>,
        mapper_method: Option<MapperMethod>,
    ) -> Result<Self, BuilderError> {
        let lang = mapper_method.as_ref().and_then(|m| m.lang.as_deref());
        let language_driver = configuration.language_driver(lang)?;
        let provider_type = annotation.provider_type(&configuration, mapper_method.as_ref())?;

        let provider_context = ProviderContext::new(
            mapper_type,
            mapper_method,
            configuration.database_id().map(str::to_string),
        );
        let descriptor = ProviderDescriptor::new(
            provider_type,
            annotation.method().map(str::to_string),
            provider_context.clone(),
        );
        let routine = configuration.registry().resolve(&descriptor)?;
        debug!(
            annotation = %annotation.kind,
            routine = %routine.signature(),
            "created provider sql source"
        );

        Ok(Self {
            instance_factory: configuration.instance_factory(),
            configuration,
            routine,
            provider_context,
            language_driver,
        })
    }

    /// Build a source without mapper type or method.
    ///
    /// The provider context then carries no call-site information and the
    /// default language driver is used.
    #[deprecated(note = "use `ProviderSqlSource::new` with the mapper type and method")]
    pub fn from_annotation(
        configuration: Arc<Configuration>,
        annotation: &ProviderAnnotation,
    ) -> Result<Self, BuilderError> {
        Self::new(configuration, annotation, None, None)
    }

    pub fn routine(&self) -> &ResolvedRoutine {
        &self.routine
    }

    pub fn provider_context(&self) -> &ProviderContext {
        &self.provider_context
    }

    /// Statement for `parameter`, or `None` when the routine returned null.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn get_bound_sql(&self, parameter: &Dynamic) -> Result<Option<BoundSql>, BuilderError> {
        match self.create_sql_source(parameter)? {
            Some(source) => source
                .bound_sql(parameter)
                .map(Some)
                .map_err(|err| self.statement_error(parameter, err)),
            None => Ok(None),
        }
    }

    /// Compile the provider's text for `parameter`.
    pub fn create_sql_source(&self, parameter: &Dynamic) -> Result<Option<Box<dyn SqlSource>>, BuilderError> {
        let Some(sql) = self.provide_sql(parameter)? else {
            return Ok(None);
        };
        self.language_driver
            .create_sql_source(&self.configuration, &sql, parameter.value_type())
            .map(Some)
            .map_err(|err| self.statement_error(parameter, err))
    }

    /// Bind `parameter` and run the provider routine.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn provide_sql(&self, parameter: &Dynamic) -> Result<Option<String>, BuilderError> {
        trace!(routine = %self.routine.signature(), parameter = parameter.type_name(), "invoking provider");

        let args = bind_arguments(&self.routine, &self.provider_context, parameter).map_err(|err| {
            warn!(routine = %self.routine.signature(), %err, "invalid provider argument combination");
            BuilderError::InvalidArgumentCombination {
                routine: self.routine.signature(),
                parameter_type: parameter.type_name().to_string(),
                mapper_method: self.mapper_method_name(),
            }
        })?;

        invoke(&self.routine, self.instance_factory.as_ref(), &args).map_err(|source| {
            let root_cause = root_cause(&source).to_string();
            warn!(routine = %self.routine.signature(), %root_cause, "provider routine failed");
            BuilderError::Invocation {
                routine: self.routine.signature(),
                parameter_type: parameter.type_name().to_string(),
                root_cause,
                source,
            }
        })
    }

    /// Attach the routine and parameter type to a language driver failure.
    fn statement_error(&self, parameter: &Dynamic, err: BuilderError) -> BuilderError {
        let root_cause = root_cause(&err).to_string();
        warn!(routine = %self.routine.signature(), %root_cause, "language driver failed");
        BuilderError::Statement {
            routine: self.routine.signature(),
            parameter_type: parameter.type_name().to_string(),
            root_cause,
            source: Box::new(err),
        }
    }

    fn mapper_method_name(&self) -> String {
        self.provider_context
            .mapper_method()
            .map_or_else(|| "null".to_string(), ToString::to_string)
    }
}
