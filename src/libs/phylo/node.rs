use super::taxon::TaxonId;

/// NodeId is an index into the Tree's node vector.
/// It is lightweight (Copy) and safe (no pointers).
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Unique identifier for the node (index in the arena)
    pub id: NodeId,

    /// Parent node ID (None for root)
    pub parent: Option<NodeId>,

    /// List of child node IDs, in output order
    pub children: Vec<NodeId>,

    // --- Payload ---

    /// Taxon of a leaf, an index into the tree's namespace
    pub taxon: Option<TaxonId>,

    /// Label of an internal node (e.g., a support value or a clade name)
    pub name: Option<String>,

    /// Branch length to parent, kept as written in the source
    pub length: Option<String>,

    /// Bracketed comments between the label and the length, as written
    /// (e.g. `[&&NHX:S=human]`)
    pub comment: Option<String>,

    /// Bracketed comments after the length, as written
    pub length_comment: Option<String>,
}

impl Node {
    /// Create a new empty node with a specific ID
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            parent: None,
            children: Vec::new(),
            taxon: None,
            name: None,
            length: None,
            comment: None,
            length_comment: None,
        }
    }

    /// Set the label of the node
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Set the label of the node (builder pattern)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the branch length (builder pattern)
    pub fn with_length(mut self, length: impl Into<String>) -> Self {
        self.length = Some(length.into());
        self
    }

    /// Check if the node is a leaf (no children)
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Check if the node is the root (no parent)
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_builder() {
        let node = Node::new(3).with_name("L1").with_length("0.10");
        assert_eq!(node.id, 3);
        assert_eq!(node.name.as_deref(), Some("L1"));
        assert_eq!(node.length.as_deref(), Some("0.10"));
        assert!(node.is_leaf());
        assert!(node.is_root());
        assert!(node.taxon.is_none());
    }

    #[test]
    fn test_set_name() {
        let mut node = Node::new(0);
        assert!(node.name.is_none());
        node.set_name("PL1");
        assert_eq!(node.name.as_deref(), Some("PL1"));
    }
}
