#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Derived view of a decision tree annotated with everything the player knows.
//!
//! [`augment`] normalizes a [`ScanTree`] and then walks it once, resolving
//! each node's movement plan and recording the candidates that remain, the
//! scans observed so far and the area the next scan is taken from. The result
//! is an [`AugmentedTree`]: an arena of [`AugmentedNode`] values addressed by
//! [`NodeId`]. Parents and the root are referenced by id, so upward queries do
//! not need back pointers. The arena is laid out in pre-order, which means a
//! parent's id is always smaller than the ids of its children.

use rayon::prelude::*;
use scan_tree_core::{
    resolve_path, AugmentedPath, Completeness, Correctness, MovementState, PathAugmenter,
    PulseReading, ScanInformation, ScanRange, ScanRegion, Tile, REACTION_TICKS,
};
use scan_tree_model::{normalize, path_target, DecisionNode, ScanTree};
use scan_tree_system_narrowing::possible_pulses_and_narrowing;

/// Index of a node inside an [`AugmentedTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in pre-order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Edge from a node up to its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParentLink {
    /// Parent node.
    pub node: NodeId,
    /// Reading observed at the parent that leads here.
    pub key: PulseReading,
}

/// Edge from a node down to one of its children.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChildLink {
    /// Reading that selects the child.
    pub key: PulseReading,
    /// Child node.
    pub node: NodeId,
}

/// A decision node together with the derived state at that point of the plan.
#[derive(Clone, Debug)]
pub struct AugmentedNode<'a> {
    /// Node of the raw tree this entry describes.
    pub raw: &'a DecisionNode,
    /// Parent edge; `None` for the root.
    pub parent: Option<ParentLink>,
    /// Root of the tree the node belongs to.
    pub root: NodeId,
    /// Where the node scans: its authored region, else the tile its plan ends on.
    pub region: Option<ScanRegion>,
    /// Resolved movement plan.
    pub path: AugmentedPath,
    /// Number of scans taken before reaching the node.
    pub depth: usize,
    /// Candidates consistent with every reading on the way here.
    pub remaining_candidates: Vec<Tile>,
    /// Scans observed on the way here, oldest first.
    pub information: Vec<ScanInformation>,
    /// Child edges in canonical pulse order.
    pub children: Vec<ChildLink>,
    /// Filled in by correctness analysis.
    pub correctness: Option<Correctness>,
    /// Filled in by correctness analysis.
    pub completeness: Option<Completeness>,
}

impl AugmentedNode<'_> {
    /// Reports whether the node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The only remaining candidate, once the plan has narrowed down to it.
    #[must_use]
    pub fn solved_spot(&self) -> Option<Tile> {
        match self.remaining_candidates.as_slice() {
            [spot] => Some(*spot),
            _ => None,
        }
    }
}

/// Annotated view over a normalized [`ScanTree`].
#[derive(Clone, Debug)]
pub struct AugmentedTree<'a> {
    raw: &'a ScanTree,
    range: ScanRange,
    nodes: Vec<AugmentedNode<'a>>,
}

impl<'a> AugmentedTree<'a> {
    /// Tree the view was derived from.
    #[must_use]
    pub const fn raw(&self) -> &'a ScanTree {
        self.raw
    }

    /// Range the view was computed with.
    #[must_use]
    pub const fn range(&self) -> ScanRange {
        self.range
    }

    /// Identifier of the root node.
    #[must_use]
    pub const fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> &AugmentedNode<'a> {
        &self.nodes[0]
    }

    /// Number of nodes in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; every view has at least a root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node with the given id.
    ///
    /// # Panics
    ///
    /// Panics when `id` was issued by a different tree and is out of bounds.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &AugmentedNode<'a> {
        &self.nodes[id.0]
    }

    /// Mutable access to a node's annotations.
    ///
    /// # Panics
    ///
    /// Panics when `id` was issued by a different tree and is out of bounds.
    pub fn node_mut(&mut self, id: NodeId) -> &mut AugmentedNode<'a> {
        &mut self.nodes[id.0]
    }

    /// Parent of a node, if it has one.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent.map(|link| link.node)
    }

    /// Children of a node in canonical pulse order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[ChildLink] {
        &self.node(id).children
    }

    /// Path from the root down to `id`, optionally ending at `id` itself.
    #[must_use]
    pub fn ancestors(&self, id: NodeId, include_self: bool) -> Vec<NodeId> {
        let mut chain = Vec::new();
        if include_self {
            chain.push(id);
        }
        let mut current = self.parent(id);
        while let Some(parent) = current {
            chain.push(parent);
            current = self.parent(parent);
        }
        chain.reverse();
        chain
    }

    /// Every node id in pre-order.
    pub fn traverse(&self) -> impl DoubleEndedIterator<Item = NodeId> + ExactSizeIterator {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Ids of the nodes without children, in pre-order.
    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.traverse().filter(|&id| self.node(id).is_leaf())
    }

    /// Nodes in pre-order together with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &AugmentedNode<'a>)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }
}

/// Normalizes `tree` and derives its augmented view.
///
/// The view borrows the tree, so the tree cannot change while the view is alive.
pub fn augment<'t, A>(tree: &'t mut ScanTree, augmenter: &A) -> AugmentedTree<'t>
where
    A: PathAugmenter + ?Sized,
{
    normalize(tree, augmenter);
    let tree: &'t ScanTree = tree;
    augment_normalized(tree, augmenter)
}

/// Derives the augmented view of a tree that is already normalized.
///
/// Children whose reading is not possible at their parent get an empty
/// candidate list rather than failing the whole pass.
pub fn augment_normalized<'t, A>(tree: &'t ScanTree, augmenter: &A) -> AugmentedTree<'t>
where
    A: PathAugmenter + ?Sized,
{
    let range = tree.assumed_range();
    let _span = tracing::debug_span!("augment", range = range.get()).entered();

    let subtree = build(
        &tree.root,
        tree.clue.candidates().to_vec(),
        Vec::new(),
        &MovementState::start(),
        range,
        augmenter,
    );

    let mut nodes = Vec::new();
    let _root = flatten(subtree, None, 0, &mut nodes);
    tracing::debug!(nodes = nodes.len(), "augmented tree");

    AugmentedTree {
        raw: tree,
        range,
        nodes,
    }
}

struct Subtree<'a> {
    raw: &'a DecisionNode,
    region: Option<ScanRegion>,
    path: AugmentedPath,
    remaining_candidates: Vec<Tile>,
    information: Vec<ScanInformation>,
    children: Vec<(PulseReading, Subtree<'a>)>,
}

fn build<'a, A>(
    raw: &'a DecisionNode,
    remaining_candidates: Vec<Tile>,
    information: Vec<ScanInformation>,
    pre_state: &MovementState,
    range: ScanRange,
    augmenter: &A,
) -> Subtree<'a>
where
    A: PathAugmenter + ?Sized,
{
    let target = path_target(raw, &remaining_candidates);
    let path = resolve_path(augmenter, &raw.path, pre_state, target.as_ref());
    let region = raw
        .region()
        .cloned()
        .or_else(|| path.post_state.position.map(ScanRegion::at_tile));

    let children = match &region {
        Some(region) if !raw.children().is_empty() => {
            let table = possible_pulses_and_narrowing(&remaining_candidates, &region.area, range);
            let child_state = path.post_state.advanced(REACTION_TICKS);
            raw.children()
                .par_iter()
                .map(|child| {
                    let narrowed = table.narrowed(&child.key).map(<[Tile]>::to_vec);
                    if narrowed.is_none() {
                        tracing::trace!(reading = ?child.key, "branch reading cannot occur");
                    }
                    let mut history = information.clone();
                    history.push(ScanInformation {
                        area: region.area,
                        pulse: child.key.pulse(),
                    });
                    let subtree = build(
                        &child.node,
                        narrowed.unwrap_or_default(),
                        history,
                        &child_state,
                        range,
                        augmenter,
                    );
                    (child.key, subtree)
                })
                .collect()
        }
        _ => Vec::new(),
    };

    Subtree {
        raw,
        region,
        path,
        remaining_candidates,
        information,
        children,
    }
}

fn flatten<'a>(
    subtree: Subtree<'a>,
    parent: Option<ParentLink>,
    depth: usize,
    nodes: &mut Vec<AugmentedNode<'a>>,
) -> NodeId {
    let id = NodeId(nodes.len());
    nodes.push(AugmentedNode {
        raw: subtree.raw,
        parent,
        root: NodeId(0),
        region: subtree.region,
        path: subtree.path,
        depth,
        remaining_candidates: subtree.remaining_candidates,
        information: subtree.information,
        children: Vec::new(),
        correctness: None,
        completeness: None,
    });

    let links = subtree
        .children
        .into_iter()
        .map(|(key, child)| ChildLink {
            key,
            node: flatten(child, Some(ParentLink { node: id, key }), depth + 1, nodes),
        })
        .collect();
    nodes[id.0].children = links;
    id
}
