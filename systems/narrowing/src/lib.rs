#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Candidate filter that narrows dig spots by the pulses a scan can report.

use scan_tree_core::{Pulse, PulseReading, Rect, ScanInformation, ScanRange, Strength, Tile};
use scan_tree_system_signal::{pulses_over_region, PulseSet};

/// Candidates that remain if a particular reading is observed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Narrowing {
    /// Reading that would be observed.
    pub reading: PulseReading,
    /// Candidates consistent with the reading, in input order.
    pub candidates: Vec<Tile>,
}

/// Every reading a scan area can produce, each with its narrowed candidates.
///
/// Entries follow the canonical pulse order. Triple pulses are split into one
/// entry per surviving candidate, each committed to that candidate's tile.
/// Entries with no candidates are kept so callers decide what to prune.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NarrowingTable {
    entries: Vec<Narrowing>,
}

impl NarrowingTable {
    /// All entries, empty ones included.
    #[must_use]
    pub fn entries(&self) -> &[Narrowing] {
        &self.entries
    }

    /// Entries that leave at least one candidate.
    pub fn possible(&self) -> impl Iterator<Item = &Narrowing> + '_ {
        self.entries
            .iter()
            .filter(|entry| !entry.candidates.is_empty())
    }

    /// Candidates left by an exact reading, if the table lists it.
    #[must_use]
    pub fn narrowed(&self, reading: &PulseReading) -> Option<&[Tile]> {
        self.entries
            .iter()
            .find(|entry| &entry.reading == reading)
            .map(|entry| entry.candidates.as_slice())
    }

    /// Consumes the table, yielding its entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<Narrowing> {
        self.entries
    }
}

/// Builds the narrowing table for a scan taken anywhere inside `area`.
#[must_use]
pub fn possible_pulses_and_narrowing(
    candidates: &[Tile],
    area: &Rect,
    range: ScanRange,
) -> NarrowingTable {
    let reachable: Vec<(Tile, PulseSet)> = candidates
        .iter()
        .map(|&candidate| (candidate, pulses_over_region(candidate, area, range)))
        .collect();

    let mut entries = Vec::new();
    for pulse in Pulse::all() {
        let remaining = reachable
            .iter()
            .filter(|(_, pulses)| pulses.contains(pulse))
            .map(|(candidate, _)| *candidate);

        if pulse.strength == Strength::Triple {
            entries.extend(remaining.map(|spot| Narrowing {
                reading: PulseReading::exact(pulse.different_level, spot),
                candidates: vec![spot],
            }));
        } else {
            entries.push(Narrowing {
                reading: PulseReading::new(pulse),
                candidates: remaining.collect(),
            });
        }
    }

    NarrowingTable { entries }
}

/// Candidates for which a scan inside `area` could have reported `observed`.
#[must_use]
pub fn filter_by_observed(
    candidates: &[Tile],
    area: &Rect,
    observed: Pulse,
    range: ScanRange,
) -> Vec<Tile> {
    candidates
        .iter()
        .copied()
        .filter(|&candidate| pulses_over_region(candidate, area, range).contains(observed))
        .collect()
}

/// Like [`filter_by_observed`], additionally honouring a reading's committed spot.
#[must_use]
pub fn filter_by_reading(
    candidates: &[Tile],
    area: &Rect,
    reading: &PulseReading,
    range: ScanRange,
) -> Vec<Tile> {
    let mut remaining = filter_by_observed(candidates, area, reading.pulse(), range);
    if let Some(spot) = reading.spot() {
        remaining.retain(|&candidate| candidate == spot);
    }
    remaining
}

/// Replays a sequence of observed scans, narrowing the candidates after each one.
#[must_use]
pub fn filter_by_history(
    candidates: &[Tile],
    history: &[ScanInformation],
    range: ScanRange,
) -> Vec<Tile> {
    history
        .iter()
        .fold(candidates.to_vec(), |remaining, information| {
            filter_by_observed(&remaining, &information.area, information.pulse, range)
        })
}
