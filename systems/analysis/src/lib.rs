#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Correctness and completeness analysis of augmented scan trees.
//!
//! The analysis is a bottom-up fold: every node's tags depend only on its own
//! movement issues, its remaining candidates and the tags of its children.
//! Because the augmented arena is laid out in pre-order, walking it backwards
//! visits every child before its parent.

use scan_tree_core::{Completeness, Correctness, PathAugmenter};
use scan_tree_model::ScanTree;
use scan_tree_system_augmentation::{augment, AugmentedNode, AugmentedTree};
use serde::Serialize;

/// Tags every node of `tree` with its correctness and completeness.
pub fn analyze_correctness(tree: &mut AugmentedTree<'_>) {
    let ids: Vec<_> = tree.traverse().rev().collect();
    for id in ids {
        let node = tree.node(id);
        debug_assert!(
            node.children.iter().all(|link| link.node > id),
            "augmented arena must list parents before children"
        );

        let children: Vec<&AugmentedNode<'_>> = node
            .children
            .iter()
            .map(|link| tree.node(link.node))
            .collect();
        let correctness = correctness_of(node, &children);
        let completeness = completeness_of(node, &children);

        let node = tree.node_mut(id);
        node.correctness = Some(correctness);
        node.completeness = Some(completeness);
    }
}

/// Augments `tree` and runs [`analyze_correctness`] on the result.
pub fn augment_and_analyze<'t, A>(tree: &'t mut ScanTree, augmenter: &A) -> AugmentedTree<'t>
where
    A: PathAugmenter + ?Sized,
{
    let mut view = augment(tree, augmenter);
    analyze_correctness(&mut view);
    view
}

fn correctness_of(node: &AugmentedNode<'_>, children: &[&AugmentedNode<'_>]) -> Correctness {
    let child_tags = || children.iter().filter_map(|child| child.correctness);

    if node.path.has_errors() {
        Correctness::Error
    } else if child_tags().any(Correctness::is_erroneous) {
        Correctness::ErrorInChildren
    } else if node.path.has_warnings()
        || child_tags().any(|tag| tag == Correctness::CorrectWithWarnings)
    {
        Correctness::CorrectWithWarnings
    } else {
        Correctness::Correct
    }
}

fn completeness_of(node: &AugmentedNode<'_>, children: &[&AugmentedNode<'_>]) -> Completeness {
    if children.is_empty() && node.remaining_candidates.len() > 1 {
        Completeness::Incomplete
    } else if children
        .iter()
        .filter_map(|child| child.completeness)
        .any(Completeness::is_incomplete)
    {
        Completeness::IncompleteChildren
    } else {
        Completeness::Complete
    }
}

/// Aggregate view of an analyzed tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisSummary {
    /// Nodes in the tree.
    pub nodes: usize,
    /// Nodes without children.
    pub leaves: usize,
    /// Leaves that still have more than one candidate.
    pub incomplete_dead_ends: usize,
    /// Nodes whose own movement plan has a blocking issue.
    pub nodes_with_errors: usize,
    /// Nodes whose own movement plan has a non-blocking issue.
    pub nodes_with_warnings: usize,
    /// Deepest scan count along any branch.
    pub max_depth: usize,
    /// Largest tick count at which any leaf's plan finishes.
    pub worst_case_ticks: u64,
    /// Correctness of the root, if the tree was analyzed.
    pub correctness: Option<Correctness>,
    /// Completeness of the root, if the tree was analyzed.
    pub completeness: Option<Completeness>,
}

impl AnalysisSummary {
    /// Summarizes an augmented tree.
    #[must_use]
    pub fn of(tree: &AugmentedTree<'_>) -> Self {
        let root = tree.root();
        let mut summary = Self {
            nodes: tree.len(),
            correctness: root.correctness,
            completeness: root.completeness,
            ..Self::default()
        };

        for (_, node) in tree.iter() {
            summary.max_depth = summary.max_depth.max(node.depth);
            if node.path.has_errors() {
                summary.nodes_with_errors += 1;
            }
            if node.path.has_warnings() {
                summary.nodes_with_warnings += 1;
            }
            if node.is_leaf() {
                summary.leaves += 1;
                summary.worst_case_ticks = summary.worst_case_ticks.max(node.path.post_state.tick);
                if node.remaining_candidates.len() > 1 {
                    summary.incomplete_dead_ends += 1;
                }
            }
        }

        tracing::debug!(?summary, "summarized scan tree");
        summary
    }

    /// Reports whether every plan is followable and every leaf resolves a spot.
    #[must_use]
    pub fn is_sound(&self) -> bool {
        self.nodes_with_errors == 0 && self.incomplete_dead_ends == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scan_tree_core::{
        IssueLevel, MovementState, PathIssue, PathOutcome, PathStep, Rect, ScanClue, ScanRange,
        ScanRegion, Tile,
    };
    use scan_tree_model::DecisionNode;

    /// Reports a warning for every plan and leaves the state untouched.
    struct Nagging;

    impl PathAugmenter for Nagging {
        type Error = std::convert::Infallible;

        fn augment_path(
            &self,
            _steps: &[PathStep],
            pre_state: &MovementState,
            _target: Option<&Rect>,
        ) -> Result<PathOutcome, Self::Error> {
            Ok(PathOutcome {
                post_state: MovementState {
                    position: Some(Tile::new(0, 0, 0)),
                    ..*pre_state
                },
                issues: vec![PathIssue::warning("slow route")],
            })
        }
    }

    #[test]
    fn warnings_bubble_up_without_errors() {
        let clue = ScanClue::new(
            ScanRange::new(5).expect("range"),
            vec![Tile::new(0, 0, 0), Tile::new(30, 0, 0)],
        )
        .expect("clue");
        let mut tree = ScanTree {
            root: DecisionNode::scan(
                ScanRegion::new("origin", Rect::from_tile(Tile::new(0, 0, 0))),
                Vec::new(),
            ),
            ..ScanTree::new(clue)
        };

        let view = augment_and_analyze(&mut tree, &Nagging);

        for (_, node) in view.iter() {
            assert_eq!(node.correctness, Some(Correctness::CorrectWithWarnings));
            assert_eq!(node.path.issues[0].level, IssueLevel::Warning);
        }
        let summary = AnalysisSummary::of(&view);
        assert_eq!(summary.nodes_with_warnings, summary.nodes);
        assert!(summary.is_sound());
    }
}
