//! Text rendering of module trees for startup logs and the `tree` command

use super::{DependencyTreeNode, ModuleImportTreeNode};

struct Line {
    label: String,
    nodes: Vec<Line>,
}

fn draw(line: &Line, prefix: &str, out: &mut String) {
    out.push_str(&line.label);
    out.push('\n');
    for (index, child) in line.nodes.iter().enumerate() {
        let last = index + 1 == line.nodes.len();
        out.push_str(prefix);
        out.push_str(if last { "└── " } else { "├── " });
        let nested = format!("{}{}", prefix, if last { "    " } else { "│   " });
        draw(child, &nested, out);
    }
}

fn leaf(label: String) -> Line {
    Line {
        label,
        nodes: Vec::new(),
    }
}

pub fn render_import_tree(tree: &ModuleImportTreeNode) -> String {
    fn line(node: &ModuleImportTreeNode) -> Line {
        Line {
            label: node.key().name().to_string(),
            nodes: node.children.iter().map(line).collect(),
        }
    }
    let mut out = String::new();
    draw(&line(tree), "", &mut out);
    out
}

/// Modules with their own providers (`+`), exports (`^`) and controllers (`#`)
pub fn render_dependency_tree(tree: &DependencyTreeNode) -> String {
    fn line(node: &DependencyTreeNode) -> Line {
        let providers = node.providers_own.iter().map(|provider| {
            let marker = if node.exports(*provider) { "^" } else { "+" };
            leaf(format!("{} {}", marker, provider.name()))
        });
        let controllers = node
            .controllers
            .iter()
            .map(|controller| leaf(format!("# {}", controller.name())));
        Line {
            label: node.key().name().to_string(),
            nodes: providers
                .chain(controllers)
                .chain(node.children.iter().map(line))
                .collect(),
        }
    }
    let mut out = String::new();
    draw(&line(tree), "", &mut out);
    out
}
