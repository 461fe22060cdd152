use std::collections::BTreeMap;

use super::Tree;
use crate::libs::phylo::error::TreeError;
use crate::libs::phylo::node::{Node, NodeId};

/// The label a node is addressed by: the taxon label of a leaf,
/// otherwise the node's own name.
pub fn node_key(tree: &Tree, id: NodeId) -> Option<&str> {
    let node = tree.get_node(id)?;
    match node.taxon {
        Some(taxon) => tree.taxa.label(taxon),
        None => node.name.as_deref(),
    }
}

/// Find nodes matching a predicate.
pub fn find_nodes<F>(tree: &Tree, predicate: F) -> Vec<NodeId>
where
    F: Fn(&Node) -> bool,
{
    tree.nodes
        .iter()
        .filter(|n| predicate(n))
        .map(|n| n.id)
        .collect()
}

/// All nodes reachable from the root whose key equals `key`, in preorder.
pub fn get_nodes_by_key(tree: &Tree, key: &str) -> Vec<NodeId> {
    let Some(root) = tree.root else {
        return Vec::new();
    };

    super::traversal::preorder(tree, root)
        .unwrap_or_default()
        .into_iter()
        .filter(|&id| node_key(tree, id) == Some(key))
        .collect()
}

/// Map every key to the nodes carrying it, in preorder.
pub fn get_key_ids(tree: &Tree) -> BTreeMap<String, Vec<NodeId>> {
    let mut ids_of: BTreeMap<String, Vec<NodeId>> = BTreeMap::new();
    let Some(root) = tree.root else {
        return ids_of;
    };

    for id in super::traversal::preorder(tree, root).unwrap_or_default() {
        if let Some(key) = node_key(tree, id) {
            ids_of.entry(key.to_string()).or_default().push(id);
        }
    }

    ids_of
}

/// Get IDs of all leaves in subtree rooted at `id`, left to right.
pub fn get_leaves(tree: &Tree, id: NodeId) -> Vec<NodeId> {
    super::traversal::preorder(tree, id)
        .unwrap_or_default()
        .into_iter()
        .filter(|&n| tree.nodes[n].is_leaf())
        .collect()
}

/// Whether `ancestor` lies on the path from `id` up to the root (`id` excluded).
pub fn is_ancestor(tree: &Tree, ancestor: NodeId, id: NodeId) -> bool {
    let mut current = tree.get_node(id).and_then(|n| n.parent);
    let mut steps = 0;

    while let Some(p) = current {
        if p == ancestor {
            return true;
        }
        steps += 1;
        if steps > tree.nodes.len() {
            // cycle in the parent links
            return false;
        }
        current = tree.nodes[p].parent;
    }

    false
}

/// Check the structural invariants of the tree.
///
/// * the root has no parent,
/// * every child points back to the node listing it,
/// * every node is reachable at most once,
/// * no node holds both a taxon and children.
pub fn validate(tree: &Tree) -> Result<(), TreeError> {
    let root = tree
        .root
        .ok_or_else(|| TreeError::LogicError("Tree has no root".to_string()))?;
    if tree.nodes[root].parent.is_some() {
        return Err(TreeError::LogicError(format!(
            "Root {} has a parent",
            root
        )));
    }

    let mut seen = vec![false; tree.nodes.len()];
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if seen[id] {
            return Err(TreeError::LogicError(format!(
                "Node {} is reachable more than once",
                id
            )));
        }
        seen[id] = true;

        let node = &tree.nodes[id];
        if node.taxon.is_some() && !node.children.is_empty() && id != root {
            return Err(TreeError::LogicError(format!(
                "Node {} holds a taxon but has children",
                id
            )));
        }
        for &child in &node.children {
            match tree.get_node(child) {
                Some(c) if c.parent == Some(id) => stack.push(child),
                Some(_) => {
                    return Err(TreeError::LogicError(format!(
                        "Node {} does not point back to parent {}",
                        child, id
                    )))
                }
                None => {
                    return Err(TreeError::LogicError(format!(
                        "Node {} lists missing child {}",
                        id, child
                    )))
                }
            }
        }
    }

    Ok(())
}
