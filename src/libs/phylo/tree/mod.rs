pub mod io;
pub mod ops;
pub mod query;
pub mod traversal;

use super::error::TreeError;
use super::node::{Node, NodeId};
use super::taxon::{DuplicatePolicy, TaxonNamespace};
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone)]
pub struct Tree {
    /// Arena storage for all nodes
    pub(super) nodes: Vec<Node>,

    /// Optional root ID (a tree might be empty or in construction)
    pub(super) root: Option<NodeId>,

    /// Taxa referenced by the leaves
    pub(super) taxa: TaxonNamespace,

    /// Comments written before the tree, e.g. the rooting flag `[&R]`
    pub(super) comment: Option<String>,
}

impl Tree {
    /// Create a new empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new node to the tree. Returns the new node's ID.
    /// The node is initially detached (no parent).
    pub fn add_node(&mut self) -> NodeId {
        let id = self.nodes.len();
        let node = Node::new(id);
        self.nodes.push(node);
        id
    }

    /// Get number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get root ID
    pub fn get_root(&self) -> Option<NodeId> {
        self.root
    }

    /// Get a reference to a node by ID.
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Get a mutable reference to a node by ID.
    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Set a node as the root of the tree.
    pub fn set_root(&mut self, id: NodeId) {
        if self.get_node(id).is_some() {
            self.root = Some(id);
        }
    }

    /// The taxon namespace of this tree
    pub fn taxa(&self) -> &TaxonNamespace {
        &self.taxa
    }

    pub fn taxa_mut(&mut self) -> &mut TaxonNamespace {
        &mut self.taxa
    }

    /// Comments that precede the tree in Newick, such as `[&R]`
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn set_comment(&mut self, comment: Option<String>) {
        self.comment = comment;
    }

    /// Label of the taxon held by `id`, if any
    pub fn taxon_label(&self, id: NodeId) -> Option<&str> {
        self.get_node(id)
            .and_then(|n| n.taxon)
            .and_then(|t| self.taxa.label(t))
    }

    // --- Delegation to ops ---

    pub fn add_child(&mut self, parent_id: NodeId, child_id: NodeId) -> Result<(), TreeError> {
        ops::add_child(self, parent_id, child_id)
    }

    pub fn detach(&mut self, id: NodeId) -> Result<(), TreeError> {
        ops::detach(self, id)
    }

    pub fn reparent(&mut self, id: NodeId, new_parent: NodeId) -> Result<(), TreeError> {
        ops::reparent(self, id, new_parent)
    }

    pub fn add_internal(
        &mut self,
        parent_id: NodeId,
        name: impl Into<String>,
    ) -> Result<NodeId, TreeError> {
        ops::add_internal(self, parent_id, name.into())
    }

    pub fn add_leaf(
        &mut self,
        parent_id: NodeId,
        label: &str,
        policy: DuplicatePolicy,
    ) -> Result<NodeId, TreeError> {
        ops::add_leaf(self, parent_id, label, policy)
    }

    // --- Delegation to traversal ---

    pub fn preorder(&self, start_node: &NodeId) -> Result<Vec<NodeId>, TreeError> {
        traversal::preorder(self, *start_node)
    }

    pub fn postorder(&self, start_node: &NodeId) -> Result<Vec<NodeId>, TreeError> {
        traversal::postorder(self, *start_node)
    }

    pub fn get_subtree(&self, root_id: &NodeId) -> Result<Vec<NodeId>, TreeError> {
        traversal::preorder(self, *root_id)
    }

    // --- Delegation to query ---

    pub fn node_key(&self, id: NodeId) -> Option<&str> {
        query::node_key(self, id)
    }

    pub fn find_nodes<F>(&self, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&Node) -> bool,
    {
        query::find_nodes(self, predicate)
    }

    pub fn get_nodes_by_key(&self, key: &str) -> Vec<NodeId> {
        query::get_nodes_by_key(self, key)
    }

    pub fn get_key_ids(&self) -> BTreeMap<String, Vec<NodeId>> {
        query::get_key_ids(self)
    }

    pub fn get_leaves(&self) -> Vec<NodeId> {
        match self.root {
            Some(root) => query::get_leaves(self, root),
            None => Vec::new(),
        }
    }

    pub fn get_leaf_labels(&self) -> Vec<Option<String>> {
        self.get_leaves()
            .into_iter()
            .map(|id| self.taxon_label(id).map(|s| s.to_string()))
            .collect()
    }

    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        query::is_ancestor(self, ancestor, id)
    }

    pub fn validate(&self) -> Result<(), TreeError> {
        query::validate(self)
    }

    // --- Delegation to io ---

    pub fn from_newick(input: &str) -> Result<Tree, TreeError> {
        super::parser::parse_newick(input)
    }

    pub fn from_file(infile: &str) -> anyhow::Result<Tree> {
        io::from_file(infile)
    }

    pub fn to_newick(&self) -> String {
        io::to_newick(self)
    }

    pub fn to_newick_subtree(&self, root: NodeId) -> String {
        io::to_newick_subtree(self, root, "")
    }

    pub fn to_newick_with_format(&self, indent: &str) -> String {
        io::to_newick_with_format(self, indent)
    }
}
