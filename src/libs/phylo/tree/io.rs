use super::Tree;
use crate::libs::phylo::node::NodeId;
use anyhow::Context;

/// Read a Newick tree from a file.
///
/// # Arguments
/// * `infile` - Path to the input file (or "stdin" for stdin). Gzipped files are supported.
///
/// # Example
/// ```
/// use nwkgraft::libs::phylo::tree::Tree;
/// let tree = Tree::from_file("tests/newick/abc.nwk").unwrap();
/// assert_eq!(tree.get_leaves().len(), 3);
/// ```
pub fn from_file(infile: &str) -> anyhow::Result<Tree> {
    let newick = crate::libs::io::read_to_string(infile)?;
    let tree = Tree::from_newick(newick.as_str())
        .with_context(|| format!("could not parse the tree in {}", infile))?;
    Ok(tree)
}

/// Serialize tree to Newick string.
pub fn to_newick(tree: &Tree) -> String {
    to_newick_with_format(tree, "")
}

/// Serialize tree to Newick string with custom formatting options.
/// Currently supports indentation (empty for single line).
///
/// Comments read before the tree (e.g. `[&R]`) are written first, followed by
/// a space.
pub fn to_newick_with_format(tree: &Tree, indent: &str) -> String {
    let Some(root) = tree.get_root() else {
        return ";".to_string();
    };

    let mut s = String::new();
    if let Some(comment) = tree.comment() {
        s.push_str(comment);
        s.push(' ');
    }
    write_subtree(tree, root, indent, &mut s);
    s.push(';');
    s
}

/// Serialize a specific subtree to a Newick string.
pub fn to_newick_subtree(tree: &Tree, root: NodeId, indent: &str) -> String {
    let mut s = String::new();
    write_subtree(tree, root, indent, &mut s);
    s.push(';');
    s
}

enum Step {
    Open(NodeId, usize),
    Close(NodeId, usize),
    Comma,
}

// Explicit stack, so the depth is bounded by memory only.
fn write_subtree(tree: &Tree, root: NodeId, indent: &str, out: &mut String) {
    let is_pretty = !indent.is_empty();
    let mut stack = vec![Step::Open(root, 0)];

    while let Some(step) = stack.pop() {
        match step {
            Step::Open(id, depth) => {
                let Some(node) = tree.get_node(id) else {
                    continue;
                };
                if is_pretty {
                    out.push_str(&indent.repeat(depth));
                }
                if node.children.is_empty() {
                    write_node_data(tree, id, out);
                    continue;
                }

                out.push('(');
                if is_pretty {
                    out.push('\n');
                }
                stack.push(Step::Close(id, depth));
                for (i, &child) in node.children.iter().enumerate().rev() {
                    stack.push(Step::Open(child, depth + 1));
                    if i > 0 {
                        stack.push(Step::Comma);
                    }
                }
            }
            Step::Comma => {
                out.push(',');
                if is_pretty {
                    out.push('\n');
                }
            }
            Step::Close(id, depth) => {
                if is_pretty {
                    out.push('\n');
                    out.push_str(&indent.repeat(depth));
                }
                out.push(')');
                write_node_data(tree, id, out);
            }
        }
    }
}

// label[comment]:length[comment]
fn write_node_data(tree: &Tree, id: NodeId, out: &mut String) {
    let Some(node) = tree.get_node(id) else {
        return;
    };
    if let Some(label) = super::query::node_key(tree, id) {
        out.push_str(&quote_label(label));
    }
    if let Some(comment) = &node.comment {
        out.push_str(comment);
    }
    if let Some(len) = &node.length {
        out.push(':');
        out.push_str(len);
    }
    if let Some(comment) = &node.length_comment {
        out.push_str(comment);
    }
}

/// Quote a label if it contains Newick metacharacters or whitespace.
/// Embedded single quotes are doubled.
pub fn quote_label(label: &str) -> String {
    let needs_quote = label
        .chars()
        .any(|c| "(),:;[]'\"".contains(c) || c.is_whitespace());
    if needs_quote {
        format!("'{}'", label.replace('\'', "''"))
    } else {
        label.to_string()
    }
}
