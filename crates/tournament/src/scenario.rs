//! Scenario files: the divisions of a tournament day and their scripted results

use anyhow::{Context, Result};
use bracket_core::{EventFormat, Side};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A whole tournament day as read from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub tournament: TournamentConfig,
    #[serde(default, rename = "division")]
    pub divisions: Vec<DivisionConfig>,
}

/// Tournament-wide settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    pub name: String,
    /// Randomize each roster before seeding
    pub shuffle: bool,
    /// Seed for the random draw; a fresh draw every run when absent
    pub seed: Option<u64>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            name: "Tournament".to_string(),
            shuffle: false,
            seed: None,
        }
    }
}

/// One division: a roster in seed order plus the results to enter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DivisionConfig {
    pub name: String,
    pub format: EventFormat,
    pub entrants: Vec<String>,
    #[serde(default, rename = "result")]
    pub results: Vec<ResultConfig>,
}

/// A scripted result, applied in file order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultConfig {
    Kata(KataResult),
    Kumite(KumiteResult),
}

/// Score sheet of one kumite match, found by `(round, order)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KumiteResult {
    #[serde(default)]
    pub round: u32,
    pub order: i32,
    #[serde(default)]
    pub aka_points: u16,
    #[serde(default)]
    pub shiro_points: u16,
    #[serde(default)]
    pub aka_warnings: u16,
    #[serde(default)]
    pub shiro_warnings: u16,
    /// Referee decision, needed when points are level
    #[serde(default)]
    pub winner: Option<Side>,
    /// Left as entered when absent
    #[serde(default)]
    pub aka_disqualified: Option<bool>,
    #[serde(default)]
    pub shiro_disqualified: Option<bool>,
    /// `false` reopens the match
    #[serde(default = "default_done")]
    pub done: bool,
}

fn default_done() -> bool {
    true
}

/// Judges' panel for one kata performance. An empty `scores` list clears it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KataResult {
    pub entrant: String,
    #[serde(default)]
    pub round: u32,
    pub scores: Vec<f64>,
}

impl Scenario {
    /// Parse a scenario from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse scenario")
    }

    /// Load a scenario file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Invalid scenario {}", path.display()))
    }
}

#[cfg(test)]
#[path = "scenario_tests.rs"]
mod scenario_tests;
