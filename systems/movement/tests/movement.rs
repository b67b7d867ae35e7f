use scan_tree_core::{
    IssueLevel, MovementAbility, MovementState, PathAugmenter, PathStep, Rect, Tile,
};
use scan_tree_system_movement::{AbilityProfile, Config, PathSimulator, SimulationError};

fn start_at(tile: Tile) -> MovementState {
    MovementState {
        position: Some(tile),
        ..MovementState::start()
    }
}

#[test]
fn running_covers_two_tiles_per_tick() {
    let simulator = PathSimulator::default();
    let origin = Tile::new(0, 0, 0);
    let steps = [PathStep::Run {
        waypoints: vec![origin, Tile::new(5, 0, 0), Tile::new(5, 4, 0)],
    }];

    let outcome = simulator
        .augment_path(&steps, &start_at(origin), None)
        .expect("simulates");

    assert_eq!(outcome.post_state.tick, 5, "nine tiles take five ticks");
    assert_eq!(outcome.post_state.position, Some(Tile::new(5, 4, 0)));
    assert!(outcome.issues.is_empty());
}

#[test]
fn teleport_sets_position_and_spends_configured_ticks() {
    let simulator = PathSimulator::new(Config::new(4));
    let destination = Tile::new(3200, 3200, 0);

    let outcome = simulator
        .augment_path(
            &[PathStep::Teleport { destination }],
            &MovementState::start(),
            Some(&Rect::from_tile(destination)),
        )
        .expect("simulates");

    assert_eq!(outcome.post_state.tick, 4);
    assert_eq!(outcome.post_state.position, Some(destination));
    assert!(outcome.issues.is_empty());
}

#[test]
fn ending_outside_the_target_is_blocking() {
    let simulator = PathSimulator::default();
    let target = Rect::dig_area(Tile::new(10, 10, 0));

    let outcome = simulator
        .augment_path(
            &[PathStep::Teleport {
                destination: Tile::new(20, 20, 0),
            }],
            &MovementState::start(),
            Some(&target),
        )
        .expect("simulates");

    assert_eq!(outcome.issues.len(), 1);
    assert_eq!(outcome.issues[0].level, IssueLevel::Error);
}

#[test]
fn unknown_final_position_with_target_is_a_warning() {
    let simulator = PathSimulator::default();
    let target = Rect::from_tile(Tile::new(1, 1, 0));

    let outcome = simulator
        .augment_path(&[], &MovementState::start(), Some(&target))
        .expect("simulates");

    assert_eq!(outcome.issues.len(), 1);
    assert_eq!(outcome.issues[0].level, IssueLevel::Warning);
}

#[test]
fn ability_beyond_reach_is_blocking() {
    let simulator = PathSimulator::default();
    let origin = Tile::new(0, 0, 0);

    let outcome = simulator
        .augment_path(
            &[PathStep::Ability {
                ability: MovementAbility::Escape,
                target: Tile::new(0, 8, 0),
            }],
            &start_at(origin),
            None,
        )
        .expect("simulates");

    assert!(outcome
        .issues
        .iter()
        .any(|issue| issue.level == IssueLevel::Error));
    assert_eq!(outcome.post_state.position, Some(Tile::new(0, 8, 0)));
}

#[test]
fn ability_on_cooldown_is_a_warning() {
    let config = Config::default().with_ability(MovementAbility::Surge, AbilityProfile::new(10, 20));
    let simulator = PathSimulator::new(config);
    let steps = [
        PathStep::Ability {
            ability: MovementAbility::Surge,
            target: Tile::new(10, 0, 0),
        },
        PathStep::Wait { ticks: 5 },
        PathStep::Ability {
            ability: MovementAbility::Surge,
            target: Tile::new(20, 0, 0),
        },
    ];

    let outcome = simulator
        .augment_path(&steps, &start_at(Tile::new(0, 0, 0)), None)
        .expect("simulates");

    assert_eq!(outcome.issues.len(), 1);
    assert_eq!(outcome.issues[0].level, IssueLevel::Warning);
    assert_eq!(outcome.post_state.tick, 7);
    assert_eq!(
        outcome.post_state.cooldowns.ready_at(MovementAbility::Surge),
        26
    );
}

#[test]
fn run_starting_elsewhere_is_a_warning() {
    let simulator = PathSimulator::default();
    let steps = [PathStep::Run {
        waypoints: vec![Tile::new(4, 4, 0), Tile::new(6, 4, 0)],
    }];

    let outcome = simulator
        .augment_path(&steps, &start_at(Tile::new(0, 0, 0)), None)
        .expect("simulates");

    assert_eq!(outcome.issues.len(), 1);
    assert_eq!(outcome.issues[0].level, IssueLevel::Warning);
}

#[test]
fn empty_run_cannot_be_simulated() {
    let simulator = PathSimulator::default();

    let error = simulator
        .augment_path(
            &[PathStep::Wait { ticks: 1 }, PathStep::Run { waypoints: vec![] }],
            &MovementState::start(),
            None,
        )
        .unwrap_err();

    assert_eq!(error, SimulationError::EmptyRun { step: 1 });
}
