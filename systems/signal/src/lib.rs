#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure signal model describing what a scan reports.
//!
//! A scan measures the Chebyshev distance between the hidden dig spot and the
//! tile the player stands on, buckets it by the clue's range into a pulse
//! strength, and raises the different-level flag when the spot is on another
//! level or close to the player's mirrored position in the parallel realm.

use scan_tree_core::{Pulse, Rect, ScanRange, Strength, Tile, DIFFERENT_LEVEL_MARGIN};

/// Set of pulses backed by one bit per alphabet rank.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PulseSet {
    bits: u8,
}

impl PulseSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// Creates a set holding exactly one pulse.
    #[must_use]
    pub const fn single(pulse: Pulse) -> Self {
        Self {
            bits: 1 << pulse.rank(),
        }
    }

    /// Adds a pulse to the set.
    pub fn insert(&mut self, pulse: Pulse) {
        self.bits |= 1 << pulse.rank();
    }

    /// Reports whether the pulse is in the set.
    #[must_use]
    pub const fn contains(&self, pulse: Pulse) -> bool {
        self.bits & (1 << pulse.rank()) != 0
    }

    /// Number of pulses in the set.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Reports whether the set is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Pulses in canonical rank order.
    pub fn iter(&self) -> impl Iterator<Item = Pulse> + '_ {
        Pulse::all().filter(|pulse| self.contains(*pulse))
    }
}

impl FromIterator<Pulse> for PulseSet {
    fn from_iter<I: IntoIterator<Item = Pulse>>(iter: I) -> Self {
        let mut set = Self::new();
        for pulse in iter {
            set.insert(pulse);
        }
        set
    }
}

/// Pulse reported about `spot` by a scan taken on `probe`.
///
/// The complement is taken of `spot` only, so swapping the arguments can
/// change the different-level flag when `spot` lies outside the complement band.
#[must_use]
pub fn pulse_at(spot: Tile, probe: Tile, range: ScanRange) -> Pulse {
    let strength = strength_at_distance(spot.chebyshev_distance(probe), range);
    let different_level = spot.level() != probe.level()
        || spot.complement().chebyshev_distance(probe) <= complement_threshold(range);

    Pulse::new(strength, different_level)
}

/// Every pulse a scan taken anywhere inside `region` can report about `spot`.
#[must_use]
pub fn pulses_over_region(spot: Tile, region: &Rect, range: ScanRange) -> PulseSet {
    if region.is_single_tile() {
        return PulseSet::single(pulse_at(spot, region.top_left(), range));
    }

    let same_level = spot.level() == region.level();
    let strongest = strength_at_distance(spot.chebyshev_distance(region.clamp(spot)), range);
    let mut pulses = PulseSet::new();

    if strongest == Strength::Single {
        let complement = spot.complement();
        let threshold = complement_threshold(range);

        let some_tile_near_complement =
            complement.chebyshev_distance(region.clamp(complement)) <= threshold;
        if !same_level || some_tile_near_complement {
            pulses.insert(Pulse::new(Strength::Single, true));
        }

        let some_tile_clear_of_complement =
            complement.chebyshev_distance(region.farthest_corner(complement)) > threshold;
        if same_level && some_tile_clear_of_complement {
            pulses.insert(Pulse::new(Strength::Single, false));
        }
    } else {
        let weakest =
            strength_at_distance(spot.chebyshev_distance(region.farthest_corner(spot)), range);
        for strength in Strength::ALL {
            if (weakest..=strongest).contains(&strength) {
                pulses.insert(Pulse::new(strength, !same_level));
            }
        }
    }

    pulses
}

/// Strength bucket for a Chebyshev distance.
#[must_use]
pub fn strength_at_distance(distance: u32, range: ScanRange) -> Strength {
    match distance.saturating_sub(1) / range.get() {
        0 => Strength::Triple,
        1 => Strength::Double,
        _ => Strength::Single,
    }
}

fn complement_threshold(range: ScanRange) -> u32 {
    range.get().saturating_add(DIFFERENT_LEVEL_MARGIN)
}
