use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use scan_tree_core::MovementAbility;
use scan_tree_model::ScanTree;
use scan_tree_system_movement::{AbilityProfile, Config};
use serde::Deserialize;

/// Scenario file format version understood by this binary.
const SUPPORTED_SCENARIO_VERSION: u32 = 1;

/// Decision tree to evaluate together with the simulator tuning to use.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub(crate) struct Scenario {
    version: u32,
    /// Movement simulator tuning; defaults apply when omitted.
    #[serde(default)]
    pub(crate) movement: MovementSettings,
    /// Clue and decision tree.
    pub(crate) tree: ScanTree,
}

/// Overrides for the movement simulator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub(crate) struct MovementSettings {
    #[serde(default)]
    teleport_ticks: Option<u64>,
    #[serde(default)]
    abilities: Vec<AbilityOverride>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
struct AbilityOverride {
    ability: MovementAbility,
    reach: u32,
    cooldown: u64,
}

impl MovementSettings {
    /// Simulator configuration with the overrides applied.
    pub(crate) fn config(&self) -> Config {
        let base = self
            .teleport_ticks
            .map_or_else(Config::default, Config::new);
        self.abilities.iter().fold(base, |config, entry| {
            config.with_ability(entry.ability, AbilityProfile::new(entry.reach, entry.cooldown))
        })
    }
}

/// Reads and parses a scenario file.
pub(crate) fn load(path: &Path) -> Result<Scenario> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid scenario {}", path.display()))
}

fn parse(contents: &str) -> Result<Scenario> {
    let scenario: Scenario =
        toml::from_str(contents).context("failed to parse scenario toml contents")?;
    if scenario.version != SUPPORTED_SCENARIO_VERSION {
        bail!(
            "unsupported scenario version {}; expected {}",
            scenario.version,
            SUPPORTED_SCENARIO_VERSION
        );
    }
    Ok(scenario)
}
