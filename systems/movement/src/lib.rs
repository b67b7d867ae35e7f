#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement simulator that resolves decision tree movement plans.
//!
//! The simulator counts game ticks while following a plan, tracks where the
//! player ends up and which abilities are cooling down, and reports issues in
//! place of failing whenever the plan can still be followed in principle.

use scan_tree_core::{
    MovementAbility, MovementState, PathAugmenter, PathIssue, PathOutcome, PathStep, Rect, Tile,
};
use thiserror::Error;

/// Tiles covered per tick while running.
pub const RUN_TILES_PER_TICK: u64 = 2;

/// Tuning parameters of the movement simulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    teleport_ticks: u64,
    surge: AbilityProfile,
    escape: AbilityProfile,
    dive: AbilityProfile,
}

impl Config {
    /// Creates a configuration with explicit teleport timing and default abilities.
    #[must_use]
    pub const fn new(teleport_ticks: u64) -> Self {
        Self {
            teleport_ticks,
            surge: AbilityProfile::new(10, 34),
            escape: AbilityProfile::new(7, 34),
            dive: AbilityProfile::new(10, 34),
        }
    }

    /// Replaces the reach and cooldown of a single ability.
    #[must_use]
    pub fn with_ability(mut self, ability: MovementAbility, profile: AbilityProfile) -> Self {
        match ability {
            MovementAbility::Surge => self.surge = profile,
            MovementAbility::Escape => self.escape = profile,
            MovementAbility::Dive => self.dive = profile,
        }
        self
    }

    /// Ticks spent casting a teleport.
    #[must_use]
    pub const fn teleport_ticks(&self) -> u64 {
        self.teleport_ticks
    }

    /// Reach and cooldown of an ability.
    #[must_use]
    pub const fn ability(&self, ability: MovementAbility) -> AbilityProfile {
        match ability {
            MovementAbility::Surge => self.surge,
            MovementAbility::Escape => self.escape,
            MovementAbility::Dive => self.dive,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(3)
    }
}

/// How far an ability reaches and how long it takes to recharge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AbilityProfile {
    /// Largest Chebyshev distance the ability can cover.
    pub reach: u32,
    /// Ticks before the ability can be used again.
    pub cooldown: u64,
}

impl AbilityProfile {
    /// Creates an ability profile.
    #[must_use]
    pub const fn new(reach: u32, cooldown: u64) -> Self {
        Self { reach, cooldown }
    }
}

/// Plans the simulator refuses to follow at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// A run step listed no waypoints.
    #[error("run at step {step} has no waypoints")]
    EmptyRun {
        /// Zero-based index of the offending step.
        step: usize,
    },
}

/// Movement collaborator that follows plans tile by tile.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathSimulator {
    config: Config,
}

impl PathSimulator {
    /// Creates a simulator using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    fn run(
        &self,
        index: usize,
        waypoints: &[Tile],
        state: &mut MovementState,
        issues: &mut Vec<PathIssue>,
    ) -> Result<(), SimulationError> {
        let (&first, rest) = waypoints
            .split_first()
            .ok_or(SimulationError::EmptyRun { step: index })?;

        if let Some(position) = state.position {
            if position != first {
                issues.push(PathIssue::warning(format!(
                    "step {index}: run starts at {first} but the player stands on {position}"
                )));
            }
        }

        let mut current = first;
        let mut tiles = 0u64;
        for &waypoint in rest {
            if waypoint.level() != current.level() {
                issues.push(PathIssue::error(format!(
                    "step {index}: run cannot change level from {current} to {waypoint}"
                )));
            }
            tiles += u64::from(current.chebyshev_distance(waypoint));
            current = waypoint;
        }

        state.tick = state.tick.saturating_add(tiles.div_ceil(RUN_TILES_PER_TICK));
        state.position = Some(current);
        Ok(())
    }

    fn ability(
        &self,
        index: usize,
        ability: MovementAbility,
        target: Tile,
        state: &mut MovementState,
        issues: &mut Vec<PathIssue>,
    ) {
        let profile = self.config.ability(ability);

        match state.position {
            None => issues.push(PathIssue::error(format!(
                "step {index}: {ability:?} used before the player's position is known"
            ))),
            Some(position) if position.level() != target.level() => {
                issues.push(PathIssue::error(format!(
                    "step {index}: {ability:?} cannot change level from {position} to {target}"
                )));
            }
            Some(position) => {
                let distance = position.chebyshev_distance(target);
                if distance > profile.reach {
                    issues.push(PathIssue::error(format!(
                        "step {index}: {ability:?} covers {distance} tiles but reaches at most {}",
                        profile.reach
                    )));
                }
            }
        }

        let ready_at = state.cooldowns.ready_at(ability);
        if ready_at > state.tick {
            issues.push(PathIssue::warning(format!(
                "step {index}: {ability:?} is still cooling down for {} ticks",
                ready_at - state.tick
            )));
        }

        state
            .cooldowns
            .set_ready_at(ability, state.tick.saturating_add(profile.cooldown));
        state.tick = state.tick.saturating_add(1);
        state.position = Some(target);
    }
}

impl PathAugmenter for PathSimulator {
    type Error = SimulationError;

    fn augment_path(
        &self,
        steps: &[PathStep],
        pre_state: &MovementState,
        target: Option<&Rect>,
    ) -> Result<PathOutcome, Self::Error> {
        let mut state = *pre_state;
        let mut issues = Vec::new();

        for (index, step) in steps.iter().enumerate() {
            match step {
                PathStep::Run { waypoints } => self.run(index, waypoints, &mut state, &mut issues)?,
                PathStep::Teleport { destination } => {
                    state.tick = state.tick.saturating_add(self.config.teleport_ticks);
                    state.position = Some(*destination);
                }
                PathStep::Ability { ability, target } => {
                    self.ability(index, *ability, *target, &mut state, &mut issues);
                }
                PathStep::Wait { ticks } => {
                    state.tick = state.tick.saturating_add(u64::from(*ticks));
                }
            }
        }

        if let Some(target) = target {
            match state.position {
                Some(position) if target.contains(position) => {}
                Some(position) => issues.push(PathIssue::error(format!(
                    "path ends on {position}, outside the target area"
                ))),
                None => issues.push(PathIssue::warning(
                    "path never establishes the player's position",
                )),
            }
        }

        Ok(PathOutcome {
            post_state: state,
            issues,
        })
    }
}
