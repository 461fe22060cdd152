use super::Tree;
use crate::libs::phylo::error::TreeError;
use crate::libs::phylo::node::NodeId;

/// Get node IDs in preorder traversal (Root -> Children)
pub fn preorder(tree: &Tree, start_node: NodeId) -> Result<Vec<NodeId>, TreeError> {
    if tree.get_node(start_node).is_none() {
        return Err(TreeError::LogicError(format!(
            "Node {} not found",
            start_node
        )));
    }

    let mut result = Vec::new();
    let mut stack = vec![start_node];

    while let Some(id) = stack.pop() {
        result.push(id);
        // Push children in reverse order so they are processed in order
        for &child in tree.nodes[id].children.iter().rev() {
            stack.push(child);
        }
    }

    Ok(result)
}

/// Get node IDs in postorder traversal (Children -> Root)
///
/// Iterative, so deep caterpillar trees do not exhaust the call stack.
pub fn postorder(tree: &Tree, start_node: NodeId) -> Result<Vec<NodeId>, TreeError> {
    if tree.get_node(start_node).is_none() {
        return Err(TreeError::LogicError(format!(
            "Node {} not found",
            start_node
        )));
    }

    let mut result = Vec::new();
    // (node, index of the next child to descend into)
    let mut stack = vec![(start_node, 0usize)];

    while let Some((id, next)) = stack.pop() {
        let children = &tree.nodes[id].children;
        if next < children.len() {
            stack.push((id, next + 1));
            stack.push((children[next], 0));
        } else {
            result.push(id);
        }
    }

    Ok(result)
}
