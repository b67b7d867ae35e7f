//! The six-symbol pulse alphabet reported by a scan.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::Tile;

/// How strongly a scan resonates with the hidden dig spot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Strength {
    /// Farther than two range buckets away.
    Single,
    /// Within two range buckets.
    Double,
    /// Within one range bucket.
    Triple,
}

impl Strength {
    /// All strengths from weakest to strongest.
    pub const ALL: [Strength; 3] = [Self::Single, Self::Double, Self::Triple];

    /// Numeric strength in `1..=3`.
    #[must_use]
    pub const fn get(self) -> u8 {
        match self {
            Self::Single => 1,
            Self::Double => 2,
            Self::Triple => 3,
        }
    }

    /// Converts a numeric strength, returning `None` outside `1..=3`.
    #[must_use]
    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Single),
            2 => Some(Self::Double),
            3 => Some(Self::Triple),
            _ => None,
        }
    }
}

/// A scan outcome: a strength and whether the spot is on a different level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pulse {
    /// Strength of the pulse.
    pub strength: Strength,
    /// Indicates the spot is on another level or in the mirrored realm.
    pub different_level: bool,
}

impl Pulse {
    /// Number of symbols in the pulse alphabet.
    pub const COUNT: u8 = 6;

    /// Creates a pulse.
    #[must_use]
    pub const fn new(strength: Strength, different_level: bool) -> Self {
        Self {
            strength,
            different_level,
        }
    }

    /// Canonical position of the pulse in the alphabet, in `0..6`.
    ///
    /// Same-level pulses come first, each group ordered by ascending strength.
    #[must_use]
    pub const fn rank(self) -> u8 {
        let offset = if self.different_level { 3 } else { 0 };
        self.strength.get() - 1 + offset
    }

    /// Inverse of [`Pulse::rank`].
    #[must_use]
    pub const fn from_rank(rank: u8) -> Option<Self> {
        if rank >= Self::COUNT {
            return None;
        }

        match Strength::from_value(rank % 3 + 1) {
            Some(strength) => Some(Self::new(strength, rank >= 3)),
            None => None,
        }
    }

    /// Every pulse in canonical rank order.
    pub fn all() -> impl Iterator<Item = Pulse> {
        (0..Self::COUNT).filter_map(Self::from_rank)
    }
}

impl PartialOrd for Pulse {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pulse {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

/// A pulse as recorded on a decision tree branch.
///
/// Triple pulses narrowed against a single remaining candidate additionally
/// commit to that candidate's exact tile. Two readings are equal only when the
/// pulses match and so do their spots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PulseReading {
    pulse: Pulse,
    #[serde(default)]
    spot: Option<Tile>,
}

impl PulseReading {
    /// Creates a reading without a committed spot.
    #[must_use]
    pub const fn new(pulse: Pulse) -> Self {
        Self { pulse, spot: None }
    }

    /// Creates a triple reading committed to an exact spot.
    #[must_use]
    pub const fn exact(different_level: bool, spot: Tile) -> Self {
        Self {
            pulse: Pulse::new(Strength::Triple, different_level),
            spot: Some(spot),
        }
    }

    /// Underlying pulse.
    #[must_use]
    pub const fn pulse(&self) -> Pulse {
        self.pulse
    }

    /// Spot a triple reading commits to, if any.
    #[must_use]
    pub const fn spot(&self) -> Option<Tile> {
        self.spot
    }
}

impl From<Pulse> for PulseReading {
    fn from(pulse: Pulse) -> Self {
        Self::new(pulse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_matches_canonical_order() {
        let expected = [
            (Strength::Single, false),
            (Strength::Double, false),
            (Strength::Triple, false),
            (Strength::Single, true),
            (Strength::Double, true),
            (Strength::Triple, true),
        ];

        for (rank, (strength, different_level)) in expected.into_iter().enumerate() {
            let pulse = Pulse::new(strength, different_level);
            assert_eq!(usize::from(pulse.rank()), rank);
            assert_eq!(Pulse::from_rank(pulse.rank()), Some(pulse));
        }
    }

    #[test]
    fn from_rank_rejects_out_of_alphabet_values() {
        assert_eq!(Pulse::from_rank(6), None);
        assert_eq!(Pulse::from_rank(u8::MAX), None);
    }

    #[test]
    fn all_enumerates_ascending_ranks() {
        let ranks: Vec<u8> = Pulse::all().map(Pulse::rank).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn ordering_follows_rank() {
        let triple = Pulse::new(Strength::Triple, false);
        let different_single = Pulse::new(Strength::Single, true);
        assert!(triple < different_single);
    }

    #[test]
    fn triple_readings_compare_spots() {
        let a = PulseReading::exact(false, Tile::new(1, 1, 0));
        let b = PulseReading::exact(false, Tile::new(2, 2, 0));
        let plain = PulseReading::new(Pulse::new(Strength::Triple, false));

        assert_eq!(a, a);
        assert_ne!(a, b);
        assert_ne!(a, plain);
        assert_eq!(plain, PulseReading::from(Pulse::new(Strength::Triple, false)));
    }
}
