use std::fmt::Write;

use crate::{Composer, ScopeId};

pub fn print_tree(composer: &Composer, id: ScopeId) {
    print!("{}", render_tree(composer, id));
}

/// Text drawing of the subtree at `id`, one mounted instance per line.
pub fn render_tree(composer: &Composer, id: ScopeId) -> String {
    let mut out = String::new();
    render_node(composer, id, false, String::new(), &mut out);
    out
}

fn render_node(
    composer: &Composer,
    id: ScopeId,
    has_sibling: bool,
    lines_string: String,
    out: &mut String,
) {
    let Some(instance) = composer.instance(id) else {
        return;
    };
    let fork_string = if has_sibling {
        "├── "
    } else {
        "└── "
    };
    let kind = instance.kind.rsplit("::").next().unwrap_or(instance.kind);
    let label = match &instance.probe {
        Some((_, label)) => format!(" \"{label}\""),
        None => String::new(),
    };
    writeln!(out, "{lines_string}{fork_string}{kind}{label} [{id:?}]").ok();
    let bar = if has_sibling { "│   " } else { "    " };
    let new_string = lines_string + bar;
    let num_children = instance.children.len();
    for (index, child) in instance.children.iter().copied().enumerate() {
        let has_sibling = index < num_children - 1;
        render_node(composer, child, has_sibling, new_string.clone(), out);
    }
}
