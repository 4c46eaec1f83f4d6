//! Shared configuration for statement sources.
//!
//! A `Configuration` owns the provider registry, the registered language
//! drivers and the factory used to instantiate providers. It is built up
//! while mappings are registered and then shared behind an `Arc`.
//!
//! # Example
//!
//! ```
//! use sqlprovider::prelude::*;
//!
//! let mut config = Configuration::new()
//!     .with_database_id("postgres")
//!     .with_default_sql_provider_type("UserSqlProvider");
//!
//! config
//!     .register_provider(ProviderType::new("UserSqlProvider"))
//!     .unwrap();
//!
//! assert_eq!(config.database_id(), Some("postgres"));
//! assert!(config.registry().contains("UserSqlProvider"));
//! ```

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use sqlprovider_core::{BuilderError, RegistrationError};
use sqlprovider_registry::{ConstructorFactory, InstanceFactory, ProviderRegistry, ProviderType};

use crate::language::{LanguageDriver, RawLanguageDriver};

/// Configuration shared by every statement source built from it.
pub struct Configuration {
    database_id: Option<String>,
    /// Used when a provider annotation names no type.
    default_sql_provider_type: Option<String>,
    registry: ProviderRegistry,
    language_drivers: FxHashMap<String, Arc<dyn LanguageDriver>>,
    default_language_driver: Arc<dyn LanguageDriver>,
    instance_factory: Arc<dyn InstanceFactory>,
}

impl Configuration {
    /// Empty registry, [`RawLanguageDriver`] as the default driver and
    /// [`ConstructorFactory`] for provider instances.
    pub fn new() -> Self {
        Self {
            database_id: None,
            default_sql_provider_type: None,
            registry: ProviderRegistry::new(),
            language_drivers: FxHashMap::default(),
            default_language_driver: Arc::new(RawLanguageDriver),
            instance_factory: Arc::new(ConstructorFactory),
        }
    }

    pub fn with_database_id(mut self, database_id: impl Into<String>) -> Self {
        self.database_id = Some(database_id.into());
        self
    }

    pub fn with_default_sql_provider_type(mut self, provider_type: impl Into<String>) -> Self {
        self.default_sql_provider_type = Some(provider_type.into());
        self
    }

    /// Replace the provider registry.
    pub fn with_registry(mut self, registry: ProviderRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Register a driver selectable by name from a mapper method.
    pub fn with_language_driver(mut self, name: impl Into<String>, driver: impl LanguageDriver + 'static) -> Self {
        self.language_drivers.insert(name.into(), Arc::new(driver));
        self
    }

    pub fn with_default_language_driver(mut self, driver: impl LanguageDriver + 'static) -> Self {
        self.default_language_driver = Arc::new(driver);
        self
    }

    pub fn with_instance_factory(mut self, factory: impl InstanceFactory + 'static) -> Self {
        self.instance_factory = Arc::new(factory);
        self
    }

    /// Register a provider type.
    ///
    /// # Errors
    ///
    /// See [`ProviderRegistry::register`].
    pub fn register_provider(&mut self, provider: ProviderType) -> Result<(), RegistrationError> {
        self.registry.register(provider)
    }

    pub fn database_id(&self) -> Option<&str> {
        self.database_id.as_deref()
    }

    pub fn default_sql_provider_type(&self) -> Option<&str> {
        self.default_sql_provider_type.as_deref()
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn instance_factory(&self) -> Arc<dyn InstanceFactory> {
        Arc::clone(&self.instance_factory)
    }

    /// The driver registered under `name`, or the default driver for `None`.
    pub fn language_driver(&self, name: Option<&str>) -> Result<Arc<dyn LanguageDriver>, BuilderError> {
        match name {
            None => Ok(Arc::clone(&self.default_language_driver)),
            Some(name) => self
                .language_drivers
                .get(name)
                .cloned()
                .ok_or_else(|| BuilderError::LanguageDriverNotFound {
                    lang: name.to_string(),
                }),
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut drivers: Vec<&str> = self.language_drivers.keys().map(String::as_str).collect();
        drivers.sort_unstable();
        f.debug_struct("Configuration")
            .field("database_id", &self.database_id)
            .field("default_sql_provider_type", &self.default_sql_provider_type)
            .field("registry", &self.registry)
            .field("language_drivers", &drivers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Configuration::default();
        assert_eq!(config.database_id(), None);
        assert_eq!(config.default_sql_provider_type(), None);
        assert_eq!(config.registry().provider_count(), 0);
        assert!(config.language_driver(None).is_ok());
    }

    #[test]
    fn named_drivers() {
        let config = Configuration::new().with_language_driver("raw", RawLanguageDriver);
        assert!(config.language_driver(Some("raw")).is_ok());
        assert!(matches!(
            config.language_driver(Some("velocity")),
            Err(BuilderError::LanguageDriverNotFound { ref lang }) if lang == "velocity"
        ));
    }

    #[test]
    fn duplicate_provider_registration_fails() {
        let mut config = Configuration::new();
        config.register_provider(ProviderType::new("P")).unwrap();
        assert!(config.register_provider(ProviderType::new("P")).is_err());
    }
}
