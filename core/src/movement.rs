//! Movement plans and the collaborator that resolves them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Rect, Tile};

/// Movement abilities that relocate the player instantly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementAbility {
    /// Long-range forward dash.
    Surge,
    /// Short-range backwards leap.
    Escape,
    /// Targeted leap to any tile in reach.
    Dive,
}

impl MovementAbility {
    /// Every ability in a stable order.
    pub const ALL: [MovementAbility; 3] = [Self::Surge, Self::Escape, Self::Dive];
}

/// One step of a movement plan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PathStep {
    /// Runs along the provided waypoints in order.
    Run {
        /// Tiles visited by the run, starting with the tile the run begins on.
        waypoints: Vec<Tile>,
    },
    /// Teleports to a fixed destination.
    Teleport {
        /// Tile the teleport lands on.
        destination: Tile,
    },
    /// Uses a movement ability to reach a tile.
    Ability {
        /// Ability used for the step.
        ability: MovementAbility,
        /// Tile the ability lands on.
        target: Tile,
    },
    /// Stands still for a number of ticks.
    Wait {
        /// Number of ticks spent waiting.
        ticks: u32,
    },
}

/// Ticks at which each movement ability becomes available again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbilityCooldowns {
    surge: u64,
    escape: u64,
    dive: u64,
}

impl AbilityCooldowns {
    /// Tick from which the ability may be used again.
    #[must_use]
    pub const fn ready_at(&self, ability: MovementAbility) -> u64 {
        match ability {
            MovementAbility::Surge => self.surge,
            MovementAbility::Escape => self.escape,
            MovementAbility::Dive => self.dive,
        }
    }

    /// Records the tick from which the ability may be used again.
    pub fn set_ready_at(&mut self, ability: MovementAbility, tick: u64) {
        let slot = match ability {
            MovementAbility::Surge => &mut self.surge,
            MovementAbility::Escape => &mut self.escape,
            MovementAbility::Dive => &mut self.dive,
        };
        *slot = tick;
    }
}

/// Player state before or after following a movement plan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MovementState {
    /// Discrete game tick counter.
    pub tick: u64,
    /// Tile the player stands on, unknown before the first positioning step.
    pub position: Option<Tile>,
    /// Ability cooldown bookkeeping.
    pub cooldowns: AbilityCooldowns,
}

impl MovementState {
    /// State at the very start of a clue: tick zero, position unknown.
    #[must_use]
    pub fn start() -> Self {
        Self::default()
    }

    /// Copy of the state with the tick counter advanced.
    #[must_use]
    pub fn advanced(&self, ticks: u64) -> Self {
        Self {
            tick: self.tick.saturating_add(ticks),
            ..*self
        }
    }
}

/// Severity of a movement issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IssueLevel {
    /// Blocking problem; the plan cannot be followed as written.
    Error,
    /// Non-blocking problem worth the author's attention.
    Warning,
}

impl IssueLevel {
    /// Numeric level used by movement simulators: 0 for errors, 1 for warnings.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Error => 0,
            Self::Warning => 1,
        }
    }
}

/// Problem reported while resolving a movement plan.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathIssue {
    /// Severity of the issue.
    pub level: IssueLevel,
    /// Description of the problem.
    pub message: String,
}

impl PathIssue {
    /// Creates a blocking issue.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Error,
            message: message.into(),
        }
    }

    /// Creates a non-blocking issue.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Warning,
            message: message.into(),
        }
    }

    /// Reports whether the issue blocks the plan.
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        self.level == IssueLevel::Error
    }
}

/// What the movement collaborator reports for a plan.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathOutcome {
    /// State after the final step.
    pub post_state: MovementState,
    /// Correctness problems found along the way.
    pub issues: Vec<PathIssue>,
}

/// External movement simulator consulted for every decision tree node.
///
/// Implementations must be shareable across threads because sibling subtrees
/// are resolved concurrently.
pub trait PathAugmenter: Sync {
    /// Failure raised when a plan cannot be simulated at all.
    type Error: fmt::Display;

    /// Simulates `steps` from `pre_state`, checking that the plan ends inside `target`.
    fn augment_path(
        &self,
        steps: &[PathStep],
        pre_state: &MovementState,
        target: Option<&Rect>,
    ) -> Result<PathOutcome, Self::Error>;
}

/// A movement plan resolved against a concrete starting state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AugmentedPath {
    /// State the plan starts from.
    pub pre_state: MovementState,
    /// State the plan ends in.
    pub post_state: MovementState,
    /// Area the plan was required to end in.
    pub target: Option<Rect>,
    /// Problems reported by the collaborator.
    pub issues: Vec<PathIssue>,
}

impl AugmentedPath {
    /// Reports whether any issue blocks the plan.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(PathIssue::is_blocking)
    }

    /// Reports whether any non-blocking issue was raised.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.level == IssueLevel::Warning)
    }

    /// Ticks spent following the plan.
    #[must_use]
    pub fn duration(&self) -> u64 {
        self.post_state.tick.saturating_sub(self.pre_state.tick)
    }
}

/// Resolves a plan through the collaborator, folding failures into node-local issues.
///
/// A failed simulation leaves the player where they were and records a single
/// blocking issue, so traversal of the surrounding tree can continue.
pub fn resolve_path<A>(
    augmenter: &A,
    steps: &[PathStep],
    pre_state: &MovementState,
    target: Option<&Rect>,
) -> AugmentedPath
where
    A: PathAugmenter + ?Sized,
{
    match augmenter.augment_path(steps, pre_state, target) {
        Ok(outcome) => AugmentedPath {
            pre_state: *pre_state,
            post_state: outcome.post_state,
            target: target.copied(),
            issues: outcome.issues,
        },
        Err(error) => {
            tracing::debug!(%error, steps = steps.len(), "movement resolution failed");
            AugmentedPath {
                pre_state: *pre_state,
                post_state: *pre_state,
                target: target.copied(),
                issues: vec![PathIssue::error(format!("movement could not be resolved: {error}"))],
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl PathAugmenter for Failing {
        type Error = &'static str;

        fn augment_path(
            &self,
            _steps: &[PathStep],
            _pre_state: &MovementState,
            _target: Option<&Rect>,
        ) -> Result<PathOutcome, Self::Error> {
            Err("teleport network offline")
        }
    }

    #[test]
    fn failed_resolution_becomes_a_blocking_issue() {
        let pre_state = MovementState {
            tick: 7,
            position: Some(Tile::new(1, 2, 0)),
            cooldowns: AbilityCooldowns::default(),
        };

        let path = resolve_path(&Failing, &[], &pre_state, None);

        assert_eq!(path.post_state, pre_state);
        assert!(path.has_errors());
        assert!(!path.has_warnings());
        assert_eq!(path.duration(), 0);
        assert!(path.issues[0].message.contains("teleport network offline"));
    }

    #[test]
    fn advancing_keeps_position_and_cooldowns() {
        let mut state = MovementState::start();
        state.position = Some(Tile::new(4, 4, 0));
        state.cooldowns.set_ready_at(MovementAbility::Dive, 30);

        let next = state.advanced(1);

        assert_eq!(next.tick, 1);
        assert_eq!(next.position, state.position);
        assert_eq!(next.cooldowns.ready_at(MovementAbility::Dive), 30);
    }

    #[test]
    fn issue_levels_map_to_simulator_codes() {
        assert_eq!(IssueLevel::Error.code(), 0);
        assert_eq!(IssueLevel::Warning.code(), 1);
        assert!(PathIssue::error("x").is_blocking());
        assert!(!PathIssue::warning("x").is_blocking());
    }
}
