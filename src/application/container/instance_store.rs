//! Instance store - Scoped singletons for providers and controllers

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::application::errors::{format_chain, BuildError};
use crate::application::graph::DependencyTreeNode;
use crate::application::registry::Registry;
use crate::domain::entities::{Injected, Instance, Key};
use crate::domain::traits::Logger;

const COMPONENT: &str = "InstanceStore";

/// Instantiates providers and controllers once per defining module.
///
/// Instances are keyed by module, then by provider or controller. A provider
/// is stored under the module that owns it and additionally cached under
/// every module it was requested from, so all importers share it.
pub struct InstanceStore {
    registry: Arc<Registry>,
    logger: Arc<dyn Logger>,
    instances: HashMap<Key, HashMap<Key, Instance>>,
}

impl InstanceStore {
    pub fn new(registry: Arc<Registry>, logger: Arc<dyn Logger>) -> Self {
        Self {
            registry,
            logger,
            instances: HashMap::new(),
        }
    }

    /// Instantiate every in-scope provider and every controller of `tree`
    /// and its descendants
    pub fn resolve_for_module(&mut self, module: Key, tree: &DependencyTreeNode) -> Result<(), BuildError> {
        self.registry.module(module)?;
        if tree.key() != module {
            return Err(BuildError::UnexpectedRoot {
                expected: module.name().to_string(),
                found: tree.key().name().to_string(),
            });
        }

        for provider in &tree.providers_in_scope {
            self.get_provider_instance(*provider, tree, &mut Vec::new())?;
        }
        for controller in &tree.controllers {
            self.get_controller_instance(*controller, tree)?;
        }
        for child in &tree.children {
            self.resolve_for_module(child.key(), child)?;
        }
        Ok(())
    }

    /// Singleton of `provider` as visible from `scope`.
    ///
    /// `path` holds the providers currently being constructed; meeting one of
    /// them again is a dependency loop.
    pub fn get_provider_instance(
        &mut self,
        provider: Key,
        scope: &DependencyTreeNode,
        path: &mut Vec<Key>,
    ) -> Result<Instance, BuildError> {
        if let Some(instance) = self.cached(scope.key(), provider) {
            return Ok(instance);
        }

        if path.contains(&provider) {
            let mut chain = path.clone();
            chain.push(provider);
            return Err(BuildError::DependencyLoop {
                chain: format_chain(&chain),
            });
        }

        let descriptor = self.registry.provider(provider, scope.key())?;
        let definer = scope
            .find_definer(provider)
            .ok_or_else(|| BuildError::ProviderNotInScope {
                provider: provider.name().to_string(),
                scope: scope.key().name().to_string(),
            })?;

        self.logger.debug(
            COMPONENT,
            format_args!(
                "Getting instance of {} from module {}. Definer: {}",
                provider,
                scope.key(),
                definer.key()
            ),
        );

        let instance = match self.cached(definer.key(), provider) {
            Some(instance) => instance,
            None => {
                path.push(provider);
                let dependencies = descriptor
                    .dependencies
                    .iter()
                    .map(|dependency| self.get_provider_instance(*dependency, definer, path))
                    .collect::<Result<Vec<_>, _>>();
                path.pop();

                let mut injected = Injected::new(provider, dependencies?);
                let instance = (descriptor.factory)(&mut injected)?;
                self.store(definer.key(), provider, Arc::clone(&instance));
                instance
            }
        };

        self.store(scope.key(), provider, Arc::clone(&instance));
        Ok(instance)
    }

    /// Singleton of `controller` in its declaring module `scope`
    pub fn get_controller_instance(
        &mut self,
        controller: Key,
        scope: &DependencyTreeNode,
    ) -> Result<Instance, BuildError> {
        let descriptor = self.registry.controller(controller, scope.key())?;
        if let Some(instance) = self.cached(scope.key(), controller) {
            return Ok(instance);
        }

        self.logger.debug(
            COMPONENT,
            format_args!("Getting controller {} in module {}", controller, scope.key()),
        );

        let mut path = vec![controller];
        let dependencies = descriptor
            .dependencies
            .iter()
            .map(|dependency| self.get_provider_instance(*dependency, scope, &mut path))
            .collect::<Result<Vec<_>, _>>()?;

        let mut injected = Injected::new(controller, dependencies);
        let instance = (descriptor.factory)(&mut injected)?;
        self.store(scope.key(), controller, Arc::clone(&instance));
        Ok(instance)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Already constructed instance stored under `module`
    pub fn instance(&self, module: Key, key: Key) -> Option<Instance> {
        self.cached(module, key)
    }

    /// Typed variant of [`InstanceStore::instance`]
    pub fn get<T: Any + Send + Sync>(&self, module: Key) -> Option<Arc<T>> {
        self.cached(module, Key::of::<T>())?.downcast::<T>().ok()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.values().all(|scope| scope.is_empty())
    }

    fn cached(&self, module: Key, key: Key) -> Option<Instance> {
        self.instances.get(&module)?.get(&key).cloned()
    }

    fn store(&mut self, module: Key, key: Key, instance: Instance) {
        self.instances.entry(module).or_default().insert(key, instance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::application::graph::{build_dependency_tree, build_import_tree};
    use crate::domain::entities::{ControllerDescriptor, ModuleDescriptor, ProviderDescriptor};
    use crate::infrastructure::logging::NullLogger;

    struct App;
    struct Left;
    struct Right;
    struct Shared;

    struct Clock;
    struct Journal {
        clock: Arc<Clock>,
    }
    struct Panel {
        journal: Arc<Journal>,
    }

    fn store(registry: Registry) -> InstanceStore {
        InstanceStore::new(Arc::new(registry), Arc::new(NullLogger))
    }

    fn tree(store: &InstanceStore) -> DependencyTreeNode {
        let imports = build_import_tree(&store.registry, Key::of::<App>()).unwrap();
        build_dependency_tree(&store.registry, &imports).unwrap()
    }

    #[test]
    fn test_diamond_shares_singleton() {
        static CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);

        let mut registry = Registry::new();
        registry
            .register_module(ModuleDescriptor::of::<App>().import::<Left>().import::<Right>())
            .unwrap()
            .register_module(ModuleDescriptor::of::<Left>().import::<Shared>().provide::<Journal>())
            .unwrap()
            .register_module(ModuleDescriptor::of::<Right>().import::<Shared>().controller::<Panel>())
            .unwrap()
            .register_module(ModuleDescriptor::of::<Shared>().provide::<Clock>().export::<Clock>())
            .unwrap()
            .register_provider(ProviderDescriptor::of::<Clock>().construct(|_| {
                CONSTRUCTED.fetch_add(1, Ordering::SeqCst);
                Ok(Clock)
            }))
            .unwrap()
            .register_provider(
                ProviderDescriptor::of::<Journal>()
                    .inject::<Clock>()
                    .construct(|deps| Ok(Journal { clock: deps.next()? })),
            )
            .unwrap()
            .register_controller(
                ControllerDescriptor::of::<Panel>()
                    .inject::<Clock>()
                    .construct(|deps| {
                        let clock: Arc<Clock> = deps.next()?;
                        Ok(Panel {
                            journal: Arc::new(Journal { clock }),
                        })
                    }),
            )
            .unwrap();

        let mut store = store(registry);
        let tree = tree(&store);
        store.resolve_for_module(Key::of::<App>(), &tree).unwrap();

        assert_eq!(CONSTRUCTED.load(Ordering::SeqCst), 1);

        let from_left = store.get::<Clock>(Key::of::<Left>()).unwrap();
        let from_right = store.get::<Clock>(Key::of::<Right>()).unwrap();
        let defined = store.get::<Clock>(Key::of::<Shared>()).unwrap();
        assert!(Arc::ptr_eq(&from_left, &from_right));
        assert!(Arc::ptr_eq(&from_left, &defined));

        let journal = store.get::<Journal>(Key::of::<Left>()).unwrap();
        assert!(Arc::ptr_eq(&journal.clock, &defined));

        let panel = store.get::<Panel>(Key::of::<Right>()).unwrap();
        assert!(Arc::ptr_eq(&panel.journal.clock, &defined));

        // Journal is not exported by Left, so App never sees it
        assert!(store.get::<Journal>(Key::of::<App>()).is_none());
    }

    #[test]
    fn test_provider_not_in_scope() {
        let mut registry = Registry::new();
        registry
            .register_module(ModuleDescriptor::of::<App>().controller::<Panel>())
            .unwrap()
            .register_provider(ProviderDescriptor::of::<Clock>().construct(|_| Ok(Clock)))
            .unwrap()
            .register_provider(
                ProviderDescriptor::of::<Journal>()
                    .inject::<Clock>()
                    .construct(|deps| Ok(Journal { clock: deps.next()? })),
            )
            .unwrap()
            .register_controller(
                ControllerDescriptor::of::<Panel>()
                    .inject::<Journal>()
                    .construct(|deps| Ok(Panel { journal: deps.next()? })),
            )
            .unwrap();
        let registry = Arc::new(registry);

        // Static analysis would reject this tree; the store still guards it
        let app = DependencyTreeNode {
            module: registry.module(Key::of::<App>()).unwrap(),
            children: Vec::new(),
            providers_own: Vec::new(),
            providers_imported: Vec::new(),
            providers_in_scope: Vec::new(),
            providers_exported: Vec::new(),
            controllers: vec![Key::of::<Panel>()],
        };

        let mut store = InstanceStore::new(registry, Arc::new(NullLogger));
        assert_eq!(
            store.resolve_for_module(Key::of::<App>(), &app).unwrap_err(),
            BuildError::ProviderNotInScope {
                provider: "Journal".to_string(),
                scope: "App".to_string(),
            }
        );
    }

    #[test]
    fn test_dependency_loop_through_reexport() {
        let mut registry = Registry::new();
        registry
            .register_module(ModuleDescriptor::of::<App>())
            .unwrap()
            .register_module(ModuleDescriptor::of::<Shared>())
            .unwrap()
            .register_provider(
                ProviderDescriptor::of::<Clock>()
                    .inject::<Journal>()
                    .construct(|_| Ok(Clock)),
            )
            .unwrap()
            .register_provider(
                ProviderDescriptor::of::<Journal>()
                    .inject::<Clock>()
                    .construct(|deps| Ok(Journal { clock: deps.next()? })),
            )
            .unwrap();
        let store_registry = Arc::new(registry);

        // A tree that skipped static cycle analysis: Shared owns both
        // providers, App re-exports Journal from it.
        let shared = DependencyTreeNode {
            module: store_registry.module(Key::of::<Shared>()).unwrap(),
            children: Vec::new(),
            providers_own: vec![Key::of::<Clock>(), Key::of::<Journal>()],
            providers_imported: Vec::new(),
            providers_in_scope: vec![Key::of::<Clock>(), Key::of::<Journal>()],
            providers_exported: vec![Key::of::<Journal>()],
            controllers: Vec::new(),
        };
        let app = DependencyTreeNode {
            module: store_registry.module(Key::of::<App>()).unwrap(),
            children: vec![shared],
            providers_own: Vec::new(),
            providers_imported: vec![Key::of::<Journal>()],
            providers_in_scope: vec![Key::of::<Journal>()],
            providers_exported: vec![Key::of::<Journal>()],
            controllers: Vec::new(),
        };

        let mut store = InstanceStore::new(store_registry, Arc::new(NullLogger));
        let err = store
            .get_provider_instance(Key::of::<Journal>(), &app, &mut Vec::new())
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::DependencyLoop {
                chain: "Journal -> Clock -> Journal".to_string()
            }
        );
    }

    #[test]
    fn test_unexpected_root() {
        let mut registry = Registry::new();
        registry
            .register_module(ModuleDescriptor::of::<App>())
            .unwrap()
            .register_module(ModuleDescriptor::of::<Left>())
            .unwrap();
        let mut store = store(registry);
        let tree = tree(&store);
        assert!(matches!(
            store.resolve_for_module(Key::of::<Left>(), &tree),
            Err(BuildError::UnexpectedRoot { .. })
        ));
        assert!(store.is_empty());
    }
}
