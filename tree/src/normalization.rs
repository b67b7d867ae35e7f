//! Synchronizes a decision tree with the clue it is meant to solve.

use rayon::prelude::*;
use scan_tree_core::{
    resolve_path, MovementState, PathAugmenter, Rect, ScanRange, Tile, REACTION_TICKS,
};
use scan_tree_system_narrowing::possible_pulses_and_narrowing;

use crate::{Child, DecisionNode, ScanTree};

/// Brings the tree in line with its clue's candidates and range, in place.
///
/// Every node's movement plan is resolved through `augmenter` to learn where
/// the scan is taken. Branches whose reading can no longer occur are removed,
/// readings without a branch receive a placeholder leaf, and nodes whose scan
/// can only produce one reading lose their children entirely. Existing
/// branches keep their authored subtrees. Running it twice is a no-op.
pub fn normalize<A>(tree: &mut ScanTree, augmenter: &A)
where
    A: PathAugmenter + ?Sized,
{
    let range = tree.assumed_range();
    let candidates = tree.clue.candidates().to_vec();
    let _span = tracing::debug_span!(
        "normalize",
        candidates = candidates.len(),
        range = range.get()
    )
    .entered();

    normalize_node(
        &mut tree.root,
        &candidates,
        &MovementState::start(),
        range,
        augmenter,
    );
}

fn normalize_node<A>(
    node: &mut DecisionNode,
    candidates: &[Tile],
    pre_state: &MovementState,
    range: ScanRange,
    augmenter: &A,
) where
    A: PathAugmenter + ?Sized,
{
    let target = path_target(node, candidates);
    let path = resolve_path(augmenter, &node.path, pre_state, target.as_ref());
    let area = probe_area(node, &path.post_state);

    let mut possible: Vec<_> = area
        .map(|area| {
            possible_pulses_and_narrowing(candidates, &area, range)
                .into_entries()
                .into_iter()
                .filter(|entry| !entry.candidates.is_empty())
                .collect()
        })
        .unwrap_or_default();

    if possible.len() == 1 {
        tracing::trace!(
            candidates = candidates.len(),
            "scan cannot distinguish anything, dropping branches"
        );
        possible.clear();
    }

    let mut previous = node.take_children();
    let mut branches: Vec<(Child, Vec<Tile>)> = possible
        .into_iter()
        .map(|entry| {
            let child = match previous.iter().position(|child| child.key == entry.reading) {
                Some(index) => previous.remove(index),
                None => {
                    tracing::trace!(reading = ?entry.reading, "synthesized missing branch");
                    Child {
                        key: entry.reading,
                        node: DecisionNode::leaf(),
                    }
                }
            };
            (child, entry.candidates)
        })
        .collect();

    if !previous.is_empty() {
        tracing::trace!(pruned = previous.len(), "pruned dead branches");
    }

    let child_state = path.post_state.advanced(REACTION_TICKS);
    branches.par_iter_mut().for_each(|(child, narrowed)| {
        normalize_node(&mut child.node, narrowed, &child_state, range, augmenter);
    });

    node.replace_children(branches.into_iter().map(|(child, _)| child).collect());
}

/// Area the movement plan must end in: the dig area once only one spot is left.
pub fn path_target(node: &DecisionNode, candidates: &[Tile]) -> Option<Rect> {
    match candidates {
        [spot] => Some(Rect::dig_area(*spot)),
        _ => node.region().map(|region| region.area),
    }
}

/// Area the node scans from: its region, else the tile its plan ends on.
pub fn probe_area(node: &DecisionNode, post_state: &MovementState) -> Option<Rect> {
    node.region()
        .map(|region| region.area)
        .or_else(|| post_state.position.map(Rect::from_tile))
}
