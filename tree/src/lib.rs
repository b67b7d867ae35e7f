#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative decision tree for a scan clue.
//!
//! A [`ScanTree`] owns the clue, the player assumptions and a tree of
//! [`DecisionNode`] values. Each node carries the movement plan that takes the
//! player to the next scan and, unless it is a leaf, one child per pulse the
//! scan can distinguish. Trees are authored elsewhere and must be passed
//! through [`normalize`] before use so that their branches match the clue.

mod normalization;

use scan_tree_core::{
    PathStep, PulseReading, ScanClue, ScanRange, ScanRegion, Tile, MISSING_DIRECTIONS,
};
use serde::{Deserialize, Serialize};

pub use normalization::{normalize, path_target, probe_area};

/// A scan clue together with the decision tree that solves it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanTree {
    /// Clue being solved.
    pub clue: ScanClue,
    /// Whether the player is assumed to have the meerkats familiar active.
    #[serde(default)]
    pub assumes_meerkats: bool,
    /// Display order of the candidate spots.
    #[serde(default)]
    pub spot_ordering: Vec<Tile>,
    /// Root of the decision tree.
    #[serde(default = "DecisionNode::leaf")]
    pub root: DecisionNode,
}

impl ScanTree {
    /// Creates a tree for the clue consisting of a single placeholder leaf.
    #[must_use]
    pub fn new(clue: ScanClue) -> Self {
        let spot_ordering = clue.candidates().to_vec();
        Self {
            clue,
            assumes_meerkats: false,
            spot_ordering,
            root: DecisionNode::leaf(),
        }
    }

    /// Range in effect under the tree's assumptions.
    #[must_use]
    pub fn assumed_range(&self) -> ScanRange {
        ScanRange::assumed(self.clue.range(), self.assumes_meerkats)
    }

    /// One-based display number of a candidate spot.
    ///
    /// Without an explicit ordering the clue's candidate order is used.
    #[must_use]
    pub fn spot_number(&self, spot: Tile) -> Option<usize> {
        let ordering = if self.spot_ordering.is_empty() {
            self.clue.candidates()
        } else {
            &self.spot_ordering
        };
        ordering
            .iter()
            .position(|&ordered| ordered == spot)
            .map(|index| index + 1)
    }
}

/// Where a branching node scans from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeSite {
    /// Anywhere inside an authored region.
    Region(ScanRegion),
    /// Exactly where the node's movement plan ends.
    PathEnd,
}

/// A branch of a decision node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
    /// Reading that selects this branch.
    pub key: PulseReading,
    /// Plan to follow after observing the reading.
    pub node: DecisionNode,
}

/// Whether a node scans and branches or ends the plan.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeShape {
    /// Final node: follow the plan and dig.
    #[default]
    Leaf,
    /// Scan from `probe` and continue with the child matching the reading.
    Branch {
        /// Where the scan is taken.
        probe: ProbeSite,
        /// One child per distinguishable reading, in canonical pulse order.
        #[serde(default)]
        children: Vec<Child>,
    },
}

/// Node of the decision tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionNode {
    /// Movement plan from the previous scan to this node's scan or dig.
    #[serde(default)]
    pub path: Vec<PathStep>,
    /// Directions shown to the player.
    #[serde(default = "missing_directions")]
    pub directions: String,
    /// Leaf or branch.
    #[serde(default)]
    pub shape: NodeShape,
}

fn missing_directions() -> String {
    MISSING_DIRECTIONS.to_owned()
}

impl DecisionNode {
    /// Fresh placeholder leaf with no plan.
    #[must_use]
    pub fn leaf() -> Self {
        Self {
            path: Vec::new(),
            directions: missing_directions(),
            shape: NodeShape::Leaf,
        }
    }

    /// Node that walks `path` and scans from `region`; children are filled in by normalization.
    #[must_use]
    pub fn scan(region: ScanRegion, path: Vec<PathStep>) -> Self {
        Self {
            path,
            directions: missing_directions(),
            shape: NodeShape::Branch {
                probe: ProbeSite::Region(region),
                children: Vec::new(),
            },
        }
    }

    /// Authored scan region, if the node has one.
    #[must_use]
    pub fn region(&self) -> Option<&ScanRegion> {
        match &self.shape {
            NodeShape::Branch {
                probe: ProbeSite::Region(region),
                ..
            } => Some(region),
            _ => None,
        }
    }

    /// Branches of the node; empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[Child] {
        match &self.shape {
            NodeShape::Leaf => &[],
            NodeShape::Branch { children, .. } => children,
        }
    }

    /// Mutable access to the branches; empty for leaves.
    pub fn children_mut(&mut self) -> &mut [Child] {
        match &mut self.shape {
            NodeShape::Leaf => &mut [],
            NodeShape::Branch { children, .. } => children,
        }
    }

    /// Plan to follow after observing `reading`, if such a branch exists.
    #[must_use]
    pub fn child(&self, reading: &PulseReading) -> Option<&DecisionNode> {
        self.children()
            .iter()
            .find(|child| &child.key == reading)
            .map(|child| &child.node)
    }

    /// Reports whether the node ends the plan.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self.shape, NodeShape::Leaf)
    }

    /// Visits the node and all descendants in pre-order.
    pub fn traverse<F>(&self, f: &mut F)
    where
        F: FnMut(&DecisionNode),
    {
        f(self);
        for child in self.children() {
            child.node.traverse(f);
        }
    }

    /// Number of nodes in the subtree rooted here.
    #[must_use]
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.traverse(&mut |_| count += 1);
        count
    }

    fn take_children(&mut self) -> Vec<Child> {
        match &mut self.shape {
            NodeShape::Leaf => Vec::new(),
            NodeShape::Branch { children, .. } => std::mem::take(children),
        }
    }

    /// Installs new children, switching between leaf and branch shape as needed.
    ///
    /// Authored regions survive even without children; a node that scans where
    /// its path ends becomes a leaf again once it has nothing to distinguish.
    fn replace_children(&mut self, children: Vec<Child>) {
        let shape = std::mem::take(&mut self.shape);
        self.shape = match shape {
            NodeShape::Branch {
                probe: ProbeSite::Region(region),
                ..
            } => NodeShape::Branch {
                probe: ProbeSite::Region(region),
                children,
            },
            _ if children.is_empty() => NodeShape::Leaf,
            _ => NodeShape::Branch {
                probe: ProbeSite::PathEnd,
                children,
            },
        };
    }
}

impl Default for DecisionNode {
    fn default() -> Self {
        Self::leaf()
    }
}
