//! Module import tree - Mirrors the `imports` graph of the root module

use std::sync::Arc;

use crate::application::errors::{format_chain, BuildError};
use crate::application::registry::Registry;
use crate::domain::entities::{Key, ModuleDescriptor};

/// One module and the modules it imports
#[derive(Debug, Clone)]
pub struct ModuleImportTreeNode {
    pub module: Arc<ModuleDescriptor>,
    pub children: Vec<ModuleImportTreeNode>,
}

impl ModuleImportTreeNode {
    pub fn key(&self) -> Key {
        self.module.key
    }
}

/// Walk the imports of `root` depth-first.
///
/// A module revisited on the same branch is a cycle. The same module
/// reached through two different branches (a diamond) is expanded again on
/// each branch.
pub fn build_import_tree(registry: &Registry, root: Key) -> Result<ModuleImportTreeNode, BuildError> {
    let mut resolved = Vec::new();
    build_branch(registry, root, &mut resolved)
}

fn build_branch(
    registry: &Registry,
    key: Key,
    resolved: &mut Vec<Key>,
) -> Result<ModuleImportTreeNode, BuildError> {
    if resolved.contains(&key) {
        let mut chain = resolved.clone();
        chain.push(key);
        return Err(BuildError::ImportCycle {
            chain: format_chain(&chain),
        });
    }

    let module = registry.module(key)?;

    resolved.push(key);
    let children = module
        .imports
        .iter()
        .map(|import| build_branch(registry, *import, resolved))
        .collect::<Result<Vec<_>, _>>();
    resolved.pop();

    Ok(ModuleImportTreeNode {
        module,
        children: children?,
    })
}
