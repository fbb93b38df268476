//! Tournament results storage and reporting

use anyhow::{Context, Result};
use bracket_core::{Division, DivisionStatus, Placing};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete tournament results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentResults {
    /// Name of the tournament
    pub name: String,
    /// Divisions in running order
    pub divisions: Vec<DivisionEntry>,
}

/// A single division with its standings at the time of saving
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivisionEntry {
    pub name: String,
    pub status: DivisionStatus,
    pub placings: Vec<Placing>,
    /// Full bracket state, so a saved day can be picked up again
    pub division: Division,
}

impl DivisionEntry {
    pub fn new(name: &str, division: Division) -> Self {
        Self {
            name: name.to_string(),
            status: division.status(),
            placings: division.get_winners(),
            division,
        }
    }
}

impl TournamentResults {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            divisions: Vec::new(),
        }
    }

    /// Add a division
    pub fn add_division(&mut self, name: &str, division: Division) {
        self.divisions.push(DivisionEntry::new(name, division));
    }

    /// Save results to JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize results")?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Load results from JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Generate a text report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!("=== Tournament: {} ===\n\n", self.name));

        for entry in &self.divisions {
            let division = &entry.division;
            report.push_str(&format!(
                "{} ({}, {} entrants) - {}\n",
                entry.name,
                division.kind(),
                division.entrants().len(),
                entry.status
            ));
            report.push_str(&"-".repeat(60));
            report.push('\n');

            for placing in &entry.placings {
                let name = placing
                    .competitor
                    .as_ref()
                    .map_or("-", |c| c.name());
                report.push_str(&format!("{:>4}. {}\n", placing.rank, name));
            }
            if let Some(next) = division.next_up() {
                report.push_str(&format!("Next: {}\n", next));
            }
            report.push('\n');
        }

        report
    }

    /// Print report to stdout
    pub fn print_report(&self) {
        println!("{}", self.generate_report());
    }
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod results_tests;
