#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the scan tree engine.
//!
//! This crate defines the vocabulary that connects the signal model, the
//! candidate filter, the decision tree and its augmentation passes. Tiles and
//! rectangles describe the map, [`Pulse`] values describe what a scan reports,
//! and [`PathAugmenter`] is the seam through which the engine asks an external
//! movement simulator to resolve a node's movement plan.

mod geometry;
mod movement;
mod pulse;

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use geometry::{GeometryError, Rect, Tile};
pub use movement::{
    resolve_path, AbilityCooldowns, AugmentedPath, IssueLevel, MovementAbility, MovementState,
    PathAugmenter, PathIssue, PathOutcome, PathStep,
};
pub use pulse::{Pulse, PulseReading, Strength};

/// Vertical distance between a tile and its mirror in the parallel realm.
pub const COMPLEMENT_OFFSET: i32 = 6400;

/// Height of the band that the complement offset wraps around.
pub const COMPLEMENT_PERIOD: i32 = 12800;

/// Extra slack added to the range when testing proximity to the complement tile.
pub const DIFFERENT_LEVEL_MARGIN: u32 = 15;

/// Range bonus granted while the meerkats familiar is assumed to be active.
///
/// Approximation of the in-game effect; kept tunable.
pub const MEERKATS_RANGE_BONUS: u32 = 5;

/// Ticks assumed to pass between two consecutive scan actions.
///
/// Approximation of player reaction time; kept tunable.
pub const REACTION_TICKS: u64 = 1;

/// Directions text assigned to freshly synthesized decision tree nodes.
pub const MISSING_DIRECTIONS: &str = "Missing directions";

/// Errors raised while constructing scan contracts from caller input.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ScanError {
    /// A rectangle could not be constructed.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    /// Scan ranges must be strictly positive.
    #[error("scan range must be positive")]
    ZeroRange,
    /// A candidate set listed the same tile twice.
    #[error("candidate {0} is listed more than once")]
    DuplicateCandidate(Tile),
}

/// Distance bucket width that turns tile distances into pulse strengths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ScanRange(NonZeroU32);

impl ScanRange {
    /// Creates a range, rejecting zero.
    pub fn new(value: u32) -> Result<Self, ScanError> {
        NonZeroU32::new(value).map(Self).ok_or(ScanError::ZeroRange)
    }

    /// Derives the effective range from a clue's base range and player assumptions.
    #[must_use]
    pub fn assumed(base: ScanRange, assumes_meerkats: bool) -> Self {
        if assumes_meerkats {
            Self(base.0.saturating_add(MEERKATS_RANGE_BONUS))
        } else {
            base
        }
    }

    /// Numeric value of the range.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for ScanRange {
    type Error = ScanError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ScanRange> for u32 {
    fn from(range: ScanRange) -> Self {
        range.get()
    }
}

/// Named rectangle the player scans from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanRegion {
    /// Label shown to the player when directing them to the region.
    #[serde(default)]
    pub name: String,
    /// Tiles the player may stand on while scanning.
    pub area: Rect,
}

impl ScanRegion {
    /// Creates a named scan region.
    #[must_use]
    pub fn new(name: impl Into<String>, area: Rect) -> Self {
        Self {
            name: name.into(),
            area,
        }
    }

    /// Creates an unnamed region covering a single tile.
    #[must_use]
    pub fn at_tile(tile: Tile) -> Self {
        Self::new(String::new(), Rect::from_tile(tile))
    }
}

/// One observed scan: where it was taken and what it reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanInformation {
    /// Area the scan was taken from.
    pub area: Rect,
    /// Pulse that was observed.
    pub pulse: Pulse,
}

/// Whether every movement plan below a node can be followed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Correctness {
    /// No issues anywhere in the subtree.
    Correct,
    /// Only non-blocking issues in the node or its subtree.
    CorrectWithWarnings,
    /// The node's own plan has a blocking issue.
    Error,
    /// The node's plan is fine but a descendant's is not.
    ErrorInChildren,
}

impl Correctness {
    /// Reports whether the node or a descendant has a blocking issue.
    #[must_use]
    pub const fn is_erroneous(self) -> bool {
        matches!(self, Self::Error | Self::ErrorInChildren)
    }
}

/// Whether every leaf below a node identifies a single dig spot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Completeness {
    /// Every leaf in the subtree resolves the spot.
    Complete,
    /// The node is a dead end with more than one candidate left.
    Incomplete,
    /// The node branches but a descendant is a dead end.
    IncompleteChildren,
}

impl Completeness {
    /// Reports whether the node or a descendant is a dead end.
    #[must_use]
    pub const fn is_incomplete(self) -> bool {
        matches!(self, Self::Incomplete | Self::IncompleteChildren)
    }
}

/// Candidate dig spots of a scan clue together with its base range.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ClueRepr", into = "ClueRepr")]
pub struct ScanClue {
    range: ScanRange,
    candidates: Vec<Tile>,
}

impl ScanClue {
    /// Creates a clue, rejecting duplicate candidates.
    pub fn new(range: ScanRange, candidates: Vec<Tile>) -> Result<Self, ScanError> {
        for (index, candidate) in candidates.iter().enumerate() {
            if candidates[..index].contains(candidate) {
                return Err(ScanError::DuplicateCandidate(*candidate));
            }
        }

        Ok(Self { range, candidates })
    }

    /// Base range printed on the clue.
    #[must_use]
    pub const fn range(&self) -> ScanRange {
        self.range
    }

    /// Every tile that may hold the treasure.
    #[must_use]
    pub fn candidates(&self) -> &[Tile] {
        &self.candidates
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct ClueRepr {
    range: ScanRange,
    candidates: Vec<Tile>,
}

impl TryFrom<ClueRepr> for ScanClue {
    type Error = ScanError;

    fn try_from(repr: ClueRepr) -> Result<Self, Self::Error> {
        Self::new(repr.range, repr.candidates)
    }
}

impl From<ScanClue> for ClueRepr {
    fn from(clue: ScanClue) -> Self {
        Self {
            range: clue.range,
            candidates: clue.candidates,
        }
    }
}
