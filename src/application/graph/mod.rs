//! Module graph - Import tree and dependency tree builders

pub mod dependency_tree;
pub mod import_tree;
pub mod render;

pub use dependency_tree::{build_dependency_tree, DependencyTreeNode};
pub use import_tree::{build_import_tree, ModuleImportTreeNode};
pub use render::{render_dependency_tree, render_import_tree};
