//! Descriptor registry - Append-only table of modules, providers and controllers

use std::collections::HashMap;
use std::sync::Arc;

use crate::application::errors::BuildError;
use crate::domain::entities::{ControllerDescriptor, Key, ModuleDescriptor, ProviderDescriptor};

/// Registry of every definable unit a bot may be built from.
///
/// Entries are only ever added; a registry is cloned into each
/// `BotFactory::create` call so independent bots never share state.
#[derive(Clone, Default)]
pub struct Registry {
    modules: HashMap<Key, Arc<ModuleDescriptor>>,
    providers: HashMap<Key, Arc<ProviderDescriptor>>,
    controllers: HashMap<Key, Arc<ControllerDescriptor>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module declaration
    pub fn register_module(&mut self, module: ModuleDescriptor) -> Result<&mut Self, BuildError> {
        if self.modules.contains_key(&module.key) {
            return Err(BuildError::AlreadyRegistered(module.key.name().to_string()));
        }
        tracing::trace!("Registered module {}", module.key);
        self.modules.insert(module.key, Arc::new(module));
        Ok(self)
    }

    /// Register a provider declaration
    pub fn register_provider(&mut self, provider: ProviderDescriptor) -> Result<&mut Self, BuildError> {
        if self.providers.contains_key(&provider.key) {
            return Err(BuildError::AlreadyRegistered(provider.key.name().to_string()));
        }
        tracing::trace!("Registered provider {}", provider.key);
        self.providers.insert(provider.key, Arc::new(provider));
        Ok(self)
    }

    /// Register a controller declaration
    pub fn register_controller(&mut self, controller: ControllerDescriptor) -> Result<&mut Self, BuildError> {
        if self.controllers.contains_key(&controller.key) {
            return Err(BuildError::AlreadyRegistered(controller.key.name().to_string()));
        }
        tracing::trace!("Registered controller {}", controller.key);
        self.controllers.insert(controller.key, Arc::new(controller));
        Ok(self)
    }

    pub fn module(&self, key: Key) -> Result<Arc<ModuleDescriptor>, BuildError> {
        self.modules
            .get(&key)
            .cloned()
            .ok_or_else(|| BuildError::NotAModule(key.name().to_string()))
    }

    /// Provider declaration, `scope` names the referencing module for the error
    pub fn provider(&self, key: Key, scope: Key) -> Result<Arc<ProviderDescriptor>, BuildError> {
        self.providers
            .get(&key)
            .cloned()
            .ok_or_else(|| BuildError::NotAProvider {
                provider: key.name().to_string(),
                scope: scope.name().to_string(),
            })
    }

    /// Controller declaration, `module` names the declaring module for the error
    pub fn controller(&self, key: Key, module: Key) -> Result<Arc<ControllerDescriptor>, BuildError> {
        self.controllers
            .get(&key)
            .cloned()
            .ok_or_else(|| BuildError::NotAController {
                controller: key.name().to_string(),
                module: module.name().to_string(),
            })
    }

    pub fn is_module(&self, key: Key) -> bool {
        self.modules.contains_key(&key)
    }

    pub fn is_provider(&self, key: Key) -> bool {
        self.providers.contains_key(&key)
    }

    pub fn is_controller(&self, key: Key) -> bool {
        self.controllers.contains_key(&key)
    }

    /// Total number of registered declarations
    pub fn len(&self) -> usize {
        self.modules.len() + self.providers.len() + self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Root;
    struct Clock;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = Registry::new();
        registry
            .register_module(ModuleDescriptor::of::<Root>().provide::<Clock>())
            .unwrap()
            .register_provider(ProviderDescriptor::of::<Clock>().construct(|_| Ok(Clock)))
            .unwrap();

        assert!(registry.is_module(Key::of::<Root>()));
        assert!(registry.is_provider(Key::of::<Clock>()));
        assert!(!registry.is_controller(Key::of::<Clock>()));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.module(Key::of::<Root>()).unwrap().providers.len(), 1);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = Registry::new();
        registry.register_module(ModuleDescriptor::of::<Root>()).unwrap();
        let err = registry
            .register_module(ModuleDescriptor::of::<Root>())
            .err()
            .unwrap();
        assert_eq!(err, BuildError::AlreadyRegistered("Root".to_string()));
    }

    #[test]
    fn test_lookup_errors_name_the_identity() {
        let registry = Registry::new();
        assert_eq!(
            registry.module(Key::of::<Root>()).err(),
            Some(BuildError::NotAModule("Root".to_string()))
        );
        assert_eq!(
            registry.provider(Key::of::<Clock>(), Key::of::<Root>()).err(),
            Some(BuildError::NotAProvider {
                provider: "Clock".to_string(),
                scope: "Root".to_string(),
            })
        );
        assert!(matches!(
            registry.controller(Key::of::<Clock>(), Key::of::<Root>()),
            Err(BuildError::NotAController { .. })
        ));
    }
}
