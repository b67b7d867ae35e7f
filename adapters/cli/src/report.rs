use std::fmt::Write as _;

use scan_tree_core::{
    Completeness, Correctness, IssueLevel, PathIssue, PulseReading, Rect, ScanRegion, Strength,
    Tile,
};
use scan_tree_system_analysis::AnalysisSummary;
use scan_tree_system_augmentation::{AugmentedTree, NodeId};
use serde::Serialize;

/// Serializable description of an analyzed tree.
#[derive(Debug, Serialize)]
pub(crate) struct Report<'a> {
    summary: AnalysisSummary,
    nodes: Vec<NodeReport<'a>>,
}

#[derive(Debug, Serialize)]
struct NodeReport<'a> {
    id: usize,
    parent: Option<usize>,
    reading: Option<PulseReading>,
    depth: usize,
    directions: &'a str,
    region: Option<&'a ScanRegion>,
    start_tick: u64,
    end_tick: u64,
    remaining_candidates: &'a [Tile],
    issues: &'a [PathIssue],
    correctness: Option<Correctness>,
    completeness: Option<Completeness>,
}

impl<'a> Report<'a> {
    /// Collects the report for every node in pre-order.
    pub(crate) fn new(tree: &'a AugmentedTree<'_>) -> Self {
        let nodes = tree
            .iter()
            .map(|(id, node)| NodeReport {
                id: id.index(),
                parent: node.parent.map(|link| link.node.index()),
                reading: node.parent.map(|link| link.key),
                depth: node.depth,
                directions: &node.raw.directions,
                region: node.region.as_ref(),
                start_tick: node.path.pre_state.tick,
                end_tick: node.path.post_state.tick,
                remaining_candidates: &node.remaining_candidates,
                issues: &node.path.issues,
                correctness: node.correctness,
                completeness: node.completeness,
            })
            .collect();

        Self {
            summary: AnalysisSummary::of(tree),
            nodes,
        }
    }
}

/// Renders the tree as an indented outline followed by the summary.
pub(crate) fn render_text(tree: &AugmentedTree<'_>) -> String {
    let raw = tree.raw();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} candidates, range {}{}",
        raw.clue.candidates().len(),
        tree.range().get(),
        if raw.assumes_meerkats {
            " (meerkats assumed)"
        } else {
            ""
        }
    );

    for id in tree.traverse() {
        render_node(tree, id, &mut out);
    }

    let summary = AnalysisSummary::of(tree);
    let _ = writeln!(
        out,
        "\n{} nodes, {} leaves, {} incomplete dead ends, {} errors, {} warnings",
        summary.nodes,
        summary.leaves,
        summary.incomplete_dead_ends,
        summary.nodes_with_errors,
        summary.nodes_with_warnings
    );
    let _ = writeln!(
        out,
        "deepest branch takes {} scans, slowest leaf finishes at tick {}",
        summary.max_depth, summary.worst_case_ticks
    );
    out
}

fn render_node(tree: &AugmentedTree<'_>, id: NodeId, out: &mut String) {
    let node = tree.node(id);
    let indent = "  ".repeat(node.depth);
    let label = node
        .parent
        .map_or_else(|| "start".to_owned(), |link| describe_reading(tree, link.key));

    let _ = write!(
        out,
        "{indent}- [{label}] ticks {}..{}",
        node.path.pre_state.tick, node.path.post_state.tick
    );
    match (&node.region, node.solved_spot()) {
        (_, Some(spot)) if node.is_leaf() => {
            let _ = write!(out, ", dig at {}", spot_label(tree, spot));
        }
        (Some(region), _) if !node.is_leaf() => {
            let _ = write!(out, ", scan {}", describe_region(region));
        }
        _ => {
            let spots: Vec<_> = node
                .remaining_candidates
                .iter()
                .map(|&spot| spot_label(tree, spot))
                .collect();
            let _ = write!(out, ", undecided between {}", spots.join(", "));
        }
    }
    if let (Some(correctness), Some(completeness)) = (node.correctness, node.completeness) {
        let _ = write!(out, " [{correctness:?}, {completeness:?}]");
    }
    out.push('\n');

    let _ = writeln!(out, "{indent}  {}", node.raw.directions);
    for issue in &node.path.issues {
        let marker = match issue.level {
            IssueLevel::Error => "error",
            IssueLevel::Warning => "warning",
        };
        let _ = writeln!(out, "{indent}  {marker}: {}", issue.message);
    }
}

fn describe_reading(tree: &AugmentedTree<'_>, reading: PulseReading) -> String {
    let pulse = reading.pulse();
    let mut label = match pulse.strength {
        Strength::Single => "single",
        Strength::Double => "double",
        Strength::Triple => "triple",
    }
    .to_owned();
    if pulse.different_level {
        label.push_str(", different level");
    }
    if let Some(spot) = reading.spot() {
        let _ = write!(label, " at {}", spot_label(tree, spot));
    }
    label
}

fn describe_region(region: &ScanRegion) -> String {
    let area = describe_area(&region.area);
    if region.name.is_empty() {
        area
    } else {
        format!("{} {area}", region.name)
    }
}

fn describe_area(area: &Rect) -> String {
    if area.is_single_tile() {
        area.top_left().to_string()
    } else {
        format!("{} to {}", area.top_left(), area.bottom_right())
    }
}

fn spot_label(tree: &AugmentedTree<'_>, spot: Tile) -> String {
    tree.raw()
        .spot_number(spot)
        .map_or_else(|| spot.to_string(), |number| format!("spot {number}"))
}
