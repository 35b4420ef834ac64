//! Loading rank and level data from an optional TOML file.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use creepydom_core::{LevelCatalog, LevelSpec, RankSpec, RankTable};
use serde::Deserialize;

/// Game data as written in a configuration file.
///
/// Either table may be omitted; the built-in data fills the gap.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct GameConfig {
    #[serde(default)]
    ranks: Vec<RankSpec>,
    #[serde(default)]
    levels: Vec<LevelSpec>,
}

impl GameConfig {
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse game config toml contents")
    }

    /// Validates the data into the read-only registries.
    pub(crate) fn into_tables(self) -> Result<(RankTable, LevelCatalog)> {
        let ranks = if self.ranks.is_empty() {
            RankTable::reference()
        } else {
            RankTable::from_specs(self.ranks).context("invalid [[ranks]] table")?
        };
        let catalog = if self.levels.is_empty() {
            LevelCatalog::reference(&ranks)
        } else {
            LevelCatalog::from_specs(&self.levels, &ranks).context("invalid [[levels]] table")?
        };
        Ok((ranks, catalog))
    }
}

/// Reads the registries from `path`, or returns the built-in data.
pub(crate) fn load(path: Option<&Path>) -> Result<(RankTable, LevelCatalog)> {
    let Some(path) = path else {
        return GameConfig::default().into_tables();
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read game config at {}", path.display()))?;
    GameConfig::parse(&contents)
        .with_context(|| format!("failed to load game config at {}", path.display()))?
        .into_tables()
}
