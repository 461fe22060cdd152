//! Attach placed taxa to a backbone tree.
//!
//! Every node of the backbone whose key (taxon label of a leaf, name of an
//! internal node) appears in a [`PlacementMap`] receives the taxa placed there:
//!
//! * below the root, a new *graft point* named `prefix + key` takes the
//!   node's place under its parent and holds the node followed by one new leaf
//!   per placed taxon, `p -> g -> {n, leaf_1, leaf_2, ...}`;
//! * at the root, the new leaves are appended directly to the root's children.
//!
//! Nodes are visited in postorder over the backbone as it was before grafting,
//! so nodes created along the way are never anchors themselves.

use super::error::TreeError;
use super::node::NodeId;
use super::placement::PlacementMap;
use super::taxon::DuplicatePolicy;
use super::tree::Tree;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraftOptions {
    /// Graft points are named `prefix + anchor`
    pub prefix: String,
    /// What to do when a placed taxon reuses an existing label
    pub on_duplicate: DuplicatePolicy,
    /// Graft at every node carrying an anchor label instead of failing when
    /// there are several
    pub allow_ambiguous: bool,
}

impl Default for GraftOptions {
    fn default() -> Self {
        Self {
            prefix: "P".to_string(),
            on_duplicate: DuplicatePolicy::Reject,
            allow_ambiguous: false,
        }
    }
}

/// What a graft pass did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GraftReport {
    /// Backbone nodes whose key is an anchor of the placements, counted even
    /// when `DuplicatePolicy::Dedupe` dropped all of their taxa
    pub anchors_matched: usize,
    /// Graft points created (one per matched non-root node that received
    /// leaves)
    pub graft_points: usize,
    /// Leaves created
    pub leaves_added: usize,
    /// Taxon labels dropped by `DuplicatePolicy::Dedupe`
    pub skipped: Vec<String>,
    /// Anchors that named no node, in placement order
    pub unmatched: Vec<String>,
}

/// Graft the taxa of `placements` onto `tree`.
///
/// Anchor ambiguity and, under `DuplicatePolicy::Reject`, taxon collisions are
/// checked before anything is modified. The edits are made on a copy that
/// replaces `tree` only when every graft succeeded, so on error `tree` is left
/// as it was.
///
/// ```
/// use nwkgraft::libs::phylo::{graft, GraftOptions, PlacementMap, Tree};
/// let mut tree = Tree::from_newick("(A,(B,C)L1)R;").unwrap();
/// let placements = PlacementMap::from_lines(["p1 L1", "p2 L1", "p3 R"]).unwrap();
///
/// let report = graft(&mut tree, &placements, &GraftOptions::default()).unwrap();
/// assert_eq!(tree.to_newick(), "(A,((B,C)L1,p1,p2)PL1,p3)R;");
/// assert_eq!(report.graft_points, 1);
/// assert_eq!(report.leaves_added, 3);
/// ```
pub fn graft(
    tree: &mut Tree,
    placements: &PlacementMap,
    opts: &GraftOptions,
) -> Result<GraftReport, TreeError> {
    let root = tree
        .get_root()
        .ok_or_else(|| TreeError::LogicError("Cannot graft onto an empty tree".to_string()))?;

    // Anchor candidates, children before parents, the root last
    let targets: Vec<(NodeId, String)> = tree
        .postorder(&root)?
        .into_iter()
        .filter_map(|id| {
            tree.node_key(id)
                .filter(|key| placements.contains(key))
                .map(|key| (id, key.to_string()))
        })
        .collect();

    check_ambiguous(&targets, opts)?;
    if opts.on_duplicate == DuplicatePolicy::Reject {
        check_duplicates(tree, placements, &targets)?;
    }

    let mut staged = tree.clone();
    let mut report = GraftReport::default();

    for (id, key) in &targets {
        let Some(taxa) = placements.get(key) else {
            continue;
        };
        report.anchors_matched += 1;

        let labels = select_labels(&staged, taxa, opts.on_duplicate, &mut report.skipped);
        if labels.is_empty() {
            continue;
        }

        let is_root = staged.get_node(*id).is_some_and(|n| n.is_root());
        let host = if is_root {
            *id
        } else {
            report.graft_points += 1;
            insert_graft_point(&mut staged, *id, key, &opts.prefix)?
        };

        for label in labels {
            staged.add_leaf(host, label, opts.on_duplicate)?;
            report.leaves_added += 1;
        }
    }

    let matched: HashSet<&str> = targets.iter().map(|(_, key)| key.as_str()).collect();
    report.unmatched = placements
        .anchors()
        .filter(|anchor| !matched.contains(anchor))
        .map(|anchor| anchor.to_string())
        .collect();

    *tree = staged;
    Ok(report)
}

/// Put a new node named `prefix + key` between `id` and its parent.
///
/// The new node is appended after the parent's other children and `id`
/// becomes its first child. Returns the new node.
pub fn insert_graft_point(
    tree: &mut Tree,
    id: NodeId,
    key: &str,
    prefix: &str,
) -> Result<NodeId, TreeError> {
    let parent = tree
        .get_node(id)
        .and_then(|n| n.parent)
        .ok_or_else(|| TreeError::LogicError(format!("Node {} has no parent", id)))?;

    let point = tree.add_internal(parent, format!("{}{}", prefix, key))?;
    tree.reparent(id, point)?;

    Ok(point)
}

// An anchor may name a single node only, unless told otherwise.
fn check_ambiguous(targets: &[(NodeId, String)], opts: &GraftOptions) -> Result<(), TreeError> {
    if opts.allow_ambiguous {
        return Ok(());
    }

    let mut count_of: BTreeMap<&str, usize> = BTreeMap::new();
    for (_, key) in targets {
        *count_of.entry(key.as_str()).or_default() += 1;
    }

    // Report in traversal order
    for (_, key) in targets {
        let count = count_of[key.as_str()];
        if count > 1 {
            return Err(TreeError::AmbiguousAnchor {
                label: key.to_string(),
                count,
            });
        }
    }

    Ok(())
}

// Every taxon to be created must be new, to the tree and to the batch.
fn check_duplicates(
    tree: &Tree,
    placements: &PlacementMap,
    targets: &[(NodeId, String)],
) -> Result<(), TreeError> {
    let mut pending: HashSet<&str> = HashSet::new();

    for (_, key) in targets {
        for label in placements.get(key).unwrap_or_default() {
            if tree.taxa().contains(label) || !pending.insert(label.as_str()) {
                return Err(TreeError::DuplicateTaxon(label.to_string()));
            }
        }
    }

    Ok(())
}

// Labels to place at one anchor. Dedupe drops labels that exist already or
// repeat within the anchor's own list.
fn select_labels<'a>(
    tree: &Tree,
    taxa: &'a [String],
    policy: DuplicatePolicy,
    skipped: &mut Vec<String>,
) -> Vec<&'a str> {
    if policy != DuplicatePolicy::Dedupe {
        return taxa.iter().map(|s| s.as_str()).collect();
    }

    let mut labels: Vec<&str> = Vec::new();
    for label in taxa {
        if tree.taxa().contains(label) || labels.contains(&label.as_str()) {
            skipped.push(label.to_string());
        } else {
            labels.push(label.as_str());
        }
    }
    labels
}
