use scan_tree_core::{
    Completeness, Correctness, MovementState, PathAugmenter, PathOutcome, PathStep, PulseReading,
    Rect, ScanClue, ScanRange, ScanRegion, Tile,
};
use scan_tree_model::{Child, DecisionNode, NodeShape, ProbeSite, ScanTree};
use scan_tree_system_analysis::{augment_and_analyze, AnalysisSummary};
use scan_tree_system_movement::{PathSimulator, SimulationError};

const SPOTS: [Tile; 3] = [
    Tile::new(10, 10, 0),
    Tile::new(10, 20, 0),
    Tile::new(20, 10, 0),
];

fn gate() -> ScanRegion {
    ScanRegion::new("west gate", Rect::from_tile(SPOTS[0]))
}

fn teleport(destination: Tile) -> Vec<PathStep> {
    vec![PathStep::Teleport { destination }]
}

/// Root scanning at the first spot whose exact-hit branch walks `path`.
fn tree_with_exact_branch(path: Vec<PathStep>) -> ScanTree {
    let clue = ScanClue::new(ScanRange::new(5).expect("range"), SPOTS.to_vec()).expect("clue");
    let root = DecisionNode {
        shape: NodeShape::Branch {
            probe: ProbeSite::Region(gate()),
            children: vec![Child {
                key: PulseReading::exact(false, SPOTS[0]),
                node: DecisionNode {
                    path,
                    ..DecisionNode::leaf()
                },
            }],
        },
        ..DecisionNode::scan(gate(), teleport(SPOTS[0]))
    };
    ScanTree {
        root,
        ..ScanTree::new(clue)
    }
}

#[test]
fn ambiguous_dead_end_marks_the_tree_incomplete() {
    let mut tree = tree_with_exact_branch(Vec::new());
    let view = augment_and_analyze(&mut tree, &PathSimulator::default());

    let root = view.root_id();
    let [grouped, solved] = view.children(root) else {
        panic!("expected two branches");
    };
    assert_eq!(
        view.node(grouped.node).completeness,
        Some(Completeness::Incomplete)
    );
    assert_eq!(
        view.node(solved.node).completeness,
        Some(Completeness::Complete)
    );
    assert_eq!(
        view.node(root).completeness,
        Some(Completeness::IncompleteChildren)
    );
    assert!(view
        .iter()
        .all(|(_, node)| node.correctness == Some(Correctness::Correct)));
}

#[test]
fn blocking_issue_in_a_branch_taints_its_ancestors_only() {
    let mut tree = tree_with_exact_branch(teleport(Tile::new(50, 50, 0)));
    let view = augment_and_analyze(&mut tree, &PathSimulator::default());

    let [grouped, solved] = view.children(view.root_id()) else {
        panic!("expected two branches");
    };
    assert_eq!(view.node(solved.node).correctness, Some(Correctness::Error));
    assert_eq!(view.node(grouped.node).correctness, Some(Correctness::Correct));
    assert_eq!(view.root().correctness, Some(Correctness::ErrorInChildren));
}

/// Simulator that refuses plans containing waits.
struct NoWaiting(PathSimulator);

impl PathAugmenter for NoWaiting {
    type Error = SimulationError;

    fn augment_path(
        &self,
        steps: &[PathStep],
        pre_state: &MovementState,
        target: Option<&Rect>,
    ) -> Result<PathOutcome, Self::Error> {
        if steps.iter().any(|step| matches!(step, PathStep::Wait { .. })) {
            return Err(SimulationError::EmptyRun { step: 0 });
        }
        self.0.augment_path(steps, pre_state, target)
    }
}

#[test]
fn failed_resolution_becomes_a_node_local_error() {
    let mut tree = tree_with_exact_branch(vec![PathStep::Wait { ticks: 2 }]);
    let view = augment_and_analyze(&mut tree, &NoWaiting(PathSimulator::default()));

    let [grouped, solved] = view.children(view.root_id()) else {
        panic!("expected two branches");
    };
    let solved = view.node(solved.node);
    assert_eq!(solved.correctness, Some(Correctness::Error));
    assert_eq!(solved.path.post_state, solved.path.pre_state);
    assert_eq!(solved.path.issues.len(), 1);
    assert_eq!(view.node(grouped.node).correctness, Some(Correctness::Correct));
}

#[test]
fn summary_counts_dead_ends_and_timing() {
    let mut tree = tree_with_exact_branch(Vec::new());
    let view = augment_and_analyze(&mut tree, &PathSimulator::default());

    let summary = AnalysisSummary::of(&view);

    assert_eq!(
        summary,
        AnalysisSummary {
            nodes: 3,
            leaves: 2,
            incomplete_dead_ends: 1,
            nodes_with_errors: 0,
            nodes_with_warnings: 0,
            max_depth: 1,
            worst_case_ticks: 4,
            correctness: Some(Correctness::Correct),
            completeness: Some(Completeness::IncompleteChildren),
        }
    );
    assert!(!summary.is_sound());
}

#[test]
fn summary_serializes_tags_in_snake_case() {
    let mut tree = tree_with_exact_branch(teleport(Tile::new(50, 50, 0)));
    let view = augment_and_analyze(&mut tree, &PathSimulator::default());

    let json = serde_json::to_value(AnalysisSummary::of(&view)).expect("serialize");

    assert_eq!(json["correctness"], "error_in_children");
    assert_eq!(json["nodes_with_errors"], 1);
}
