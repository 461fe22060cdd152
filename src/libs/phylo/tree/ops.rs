use super::Tree;
use crate::libs::phylo::error::TreeError;
use crate::libs::phylo::node::NodeId;
use crate::libs::phylo::taxon::DuplicatePolicy;

fn missing(what: &str, id: NodeId) -> TreeError {
    TreeError::LogicError(format!("{} node {} not found", what, id))
}

/// Add a child to a parent node.
/// Updates both parent's `children` list and child's `parent` field.
pub fn add_child(tree: &mut Tree, parent_id: NodeId, child_id: NodeId) -> Result<(), TreeError> {
    if parent_id == child_id {
        return Err(TreeError::LogicError(
            "Cannot add node as child of itself".to_string(),
        ));
    }
    if tree.get_node(parent_id).is_none() {
        return Err(missing("Parent", parent_id));
    }
    if tree.get_node(child_id).is_none() {
        return Err(missing("Child", child_id));
    }

    if let Some(old_parent) = tree.nodes[child_id].parent {
        return Err(TreeError::LogicError(format!(
            "Node {} already has parent {}",
            child_id, old_parent
        )));
    }
    if tree.root == Some(child_id) {
        return Err(TreeError::LogicError(format!(
            "Node {} is the root",
            child_id
        )));
    }

    tree.nodes[child_id].parent = Some(parent_id);
    tree.nodes[parent_id].children.push(child_id);

    Ok(())
}

/// Unlink a node from its parent. The node keeps its own subtree.
pub fn detach(tree: &mut Tree, id: NodeId) -> Result<(), TreeError> {
    let parent_id = tree
        .get_node(id)
        .ok_or_else(|| missing("Child", id))?
        .parent
        .ok_or_else(|| TreeError::LogicError(format!("Node {} has no parent", id)))?;

    tree.nodes[parent_id].children.retain(|&c| c != id);
    tree.nodes[id].parent = None;

    Ok(())
}

/// Move `id` (with its subtree) under `new_parent`, appended as the last child.
///
/// Both ends are checked before anything changes, so a failed call leaves the
/// tree as it was.
pub fn reparent(tree: &mut Tree, id: NodeId, new_parent: NodeId) -> Result<(), TreeError> {
    if tree.get_node(id).is_none() {
        return Err(missing("Child", id));
    }
    if tree.get_node(new_parent).is_none() {
        return Err(missing("Parent", new_parent));
    }
    if id == new_parent || super::query::is_ancestor(tree, id, new_parent) {
        return Err(TreeError::LogicError(format!(
            "Moving node {} under {} would create a cycle",
            id, new_parent
        )));
    }

    if tree.nodes[id].parent.is_some() {
        detach(tree, id)?;
    }
    add_child(tree, new_parent, id)
}

/// Append a new internal node named `name` under `parent_id`.
pub fn add_internal(tree: &mut Tree, parent_id: NodeId, name: String) -> Result<NodeId, TreeError> {
    if tree.get_node(parent_id).is_none() {
        return Err(missing("Parent", parent_id));
    }

    let id = tree.add_node();
    tree.nodes[id].set_name(name);
    add_child(tree, parent_id, id)?;

    Ok(id)
}

/// Register a taxon for `label` and append a leaf holding it under `parent_id`.
pub fn add_leaf(
    tree: &mut Tree,
    parent_id: NodeId,
    label: &str,
    policy: DuplicatePolicy,
) -> Result<NodeId, TreeError> {
    if tree.get_node(parent_id).is_none() {
        return Err(missing("Parent", parent_id));
    }

    let taxon = tree.taxa.new_taxon(label, policy)?;
    let id = tree.add_node();
    tree.nodes[id].taxon = Some(taxon);
    add_child(tree, parent_id, id)?;

    Ok(id)
}
