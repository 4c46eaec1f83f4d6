//! Per-call instantiation of provider types.

use std::any::Any;

use sqlprovider_core::NativeError;

use crate::ProviderType;

/// Creates the receiver for an instance routine.
///
/// Called once per invocation; implementations decide whether that means a
/// fresh object, a pooled one or something else.
pub trait InstanceFactory: Send + Sync {
    fn instantiate(&self, provider: &ProviderType) -> Result<Box<dyn Any + Send + Sync>, NativeError>;
}

/// Builds a fresh instance with the provider type's registered constructor.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConstructorFactory;

impl InstanceFactory for ConstructorFactory {
    fn instantiate(&self, provider: &ProviderType) -> Result<Box<dyn Any + Send + Sync>, NativeError> {
        let constructor = provider
            .constructor()
            .ok_or_else(|| NativeError::Instantiation {
                type_name: provider.name().to_string(),
                message: "no constructor registered".to_string(),
            })?;
        constructor.construct()
    }
}
