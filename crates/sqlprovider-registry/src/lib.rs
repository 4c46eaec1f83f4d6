//! Provider type registry and routine resolution.
//!
//! Provider types are registered once while mappings are built. Resolution
//! turns a [`ProviderDescriptor`] into a [`ResolvedRoutine`] that statement
//! sources keep for their whole lifetime.

mod factory;
mod provider_type;
mod registry;
mod resolver;

pub use factory::{ConstructorFactory, InstanceFactory};
pub use provider_type::{Constructor, ProviderType};
pub use registry::{DEFAULT_PROVIDER_METHOD, ProviderDescriptor, ProviderRegistry, ResolvedRoutine};
pub use resolver::{MapperMethodNameResolver, ProviderMethodResolver};
