//! Deep-copy engine
//!
//! [`record::SafeRecord`] copies one structure according to its shape,
//! [`chain::SafeChain`] walks `pNext` chains through the registry and
//! [`view`] turns owned copies back into raw structures.

pub mod chain;
pub mod record;
pub mod view;

use crate::config::CopyConfig;
use crate::shape::registry::ShapeRegistry;

/// Registry and policies used by one copy operation
#[derive(Debug, Clone, Copy)]
pub struct CloneContext<'a> {
    registry: &'a ShapeRegistry,
    config: &'a CopyConfig,
}

impl<'a> CloneContext<'a> {
    /// Context using the registry's own configuration
    pub const fn new(registry: &'a ShapeRegistry) -> Self {
        Self {
            registry,
            config: registry.config(),
        }
    }

    /// Context overriding the registry's policies
    pub const fn with_config(registry: &'a ShapeRegistry, config: &'a CopyConfig) -> Self {
        Self { registry, config }
    }

    /// Context backed by the process-wide default registry
    pub fn global() -> CloneContext<'static> {
        CloneContext::new(ShapeRegistry::global())
    }

    /// Registry used for `pNext` dispatch
    pub const fn registry(&self) -> &'a ShapeRegistry {
        self.registry
    }

    /// Copy policies
    pub const fn config(&self) -> &'a CopyConfig {
        self.config
    }
}
