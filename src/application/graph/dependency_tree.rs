//! Dependency tree - Import tree annotated with provider visibility

use std::sync::Arc;

use crate::application::errors::{format_chain, BuildError};
use crate::application::graph::ModuleImportTreeNode;
use crate::application::registry::Registry;
use crate::domain::entities::{Key, ModuleDescriptor};

/// A module with the providers it owns, imports, sees and exports
#[derive(Debug, Clone)]
pub struct DependencyTreeNode {
    pub module: Arc<ModuleDescriptor>,
    pub children: Vec<DependencyTreeNode>,
    pub providers_own: Vec<Key>,
    /// Flattened from the children's exports
    pub providers_imported: Vec<Key>,
    /// `providers_own` and `providers_imported`
    pub providers_in_scope: Vec<Key>,
    pub providers_exported: Vec<Key>,
    pub controllers: Vec<Key>,
}

impl DependencyTreeNode {
    pub fn key(&self) -> Key {
        self.module.key
    }

    pub fn owns(&self, provider: Key) -> bool {
        self.providers_own.contains(&provider)
    }

    pub fn sees(&self, provider: Key) -> bool {
        self.providers_in_scope.contains(&provider)
    }

    pub fn exports(&self, provider: Key) -> bool {
        self.providers_exported.contains(&provider)
    }

    /// The module defining `provider` as seen from this node: this node if it
    /// owns it, otherwise the definer found through the first child exporting it.
    pub fn find_definer(&self, provider: Key) -> Option<&DependencyTreeNode> {
        if self.owns(provider) {
            return Some(self);
        }
        self.children
            .iter()
            .filter(|child| child.exports(provider))
            .find_map(|child| child.find_definer(provider))
    }

    /// Every node of the tree, depth-first, this node first
    pub fn walk(&self) -> Vec<&DependencyTreeNode> {
        let mut nodes = vec![self];
        for child in &self.children {
            nodes.extend(child.walk());
        }
        nodes
    }
}

/// Annotate the import tree bottom-up.
///
/// Children are built first so their exports can be flattened into the
/// parent's imported providers. Every export must be in scope, the
/// dependencies of own providers and controllers must be in scope, and no
/// own provider may reach itself through its constructor dependencies.
pub fn build_dependency_tree(
    registry: &Registry,
    import_tree: &ModuleImportTreeNode,
) -> Result<DependencyTreeNode, BuildError> {
    let children = import_tree
        .children
        .iter()
        .map(|child| build_dependency_tree(registry, child))
        .collect::<Result<Vec<_>, _>>()?;

    let module = Arc::clone(&import_tree.module);
    let scope = module.key;

    let providers_own = dedup(module.providers.iter().copied());
    for provider in &providers_own {
        registry.provider(*provider, scope)?;
    }

    let providers_imported = dedup(
        children
            .iter()
            .flat_map(|child| child.providers_exported.iter().copied()),
    );
    let providers_in_scope = dedup(
        providers_own
            .iter()
            .chain(providers_imported.iter())
            .copied(),
    );

    let providers_exported = dedup(module.exports.iter().copied());
    if let Some(missing) = providers_exported
        .iter()
        .find(|provider| !providers_in_scope.contains(provider))
    {
        return Err(BuildError::ExportNotAvailable {
            provider: missing.name().to_string(),
            module: scope.name().to_string(),
        });
    }

    let controllers = dedup(module.controllers.iter().copied());
    for controller in &controllers {
        registry.controller(*controller, scope)?;
    }

    for provider in &providers_own {
        let descriptor = registry.provider(*provider, scope)?;
        check_in_scope(*provider, &descriptor.dependencies, &providers_in_scope, scope)?;
    }
    for controller in &controllers {
        let descriptor = registry.controller(*controller, scope)?;
        check_in_scope(*controller, &descriptor.dependencies, &providers_in_scope, scope)?;
    }

    for provider in &providers_own {
        check_dependency_cycle(registry, *provider, scope, &mut Vec::new())?;
    }

    Ok(DependencyTreeNode {
        module,
        children,
        providers_own,
        providers_imported,
        providers_in_scope,
        providers_exported,
        controllers,
    })
}

/// Constructor dependencies are resolved from the module declaring `owner`,
/// so each of them must be visible there
fn check_in_scope(owner: Key, dependencies: &[Key], in_scope: &[Key], scope: Key) -> Result<(), BuildError> {
    match dependencies.iter().find(|dependency| !in_scope.contains(dependency)) {
        Some(missing) => Err(BuildError::DependencyNotInScope {
            owner: owner.name().to_string(),
            dependency: missing.name().to_string(),
            module: scope.name().to_string(),
        }),
        None => Ok(()),
    }
}

fn check_dependency_cycle(
    registry: &Registry,
    provider: Key,
    scope: Key,
    chain: &mut Vec<Key>,
) -> Result<(), BuildError> {
    if chain.contains(&provider) {
        let mut cycle = chain.clone();
        cycle.push(provider);
        return Err(BuildError::ProviderDependencyCycle {
            chain: format_chain(&cycle),
        });
    }

    let descriptor = registry.provider(provider, scope)?;
    chain.push(provider);
    for dependency in &descriptor.dependencies {
        check_dependency_cycle(registry, *dependency, scope, chain)?;
    }
    chain.pop();
    Ok(())
}

fn dedup(keys: impl Iterator<Item = Key>) -> Vec<Key> {
    let mut unique = Vec::new();
    for key in keys {
        if !unique.contains(&key) {
            unique.push(key);
        }
    }
    unique
}
