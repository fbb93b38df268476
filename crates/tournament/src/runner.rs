//! Division runner: builds each bracket and enters its scripted results

use anyhow::{anyhow, Context, Result};
use bracket_core::{
    scores_from, Competitor, Division, DivisionBracket, MatchUpdate, SideUpdate,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::results::TournamentResults;
use crate::scenario::{DivisionConfig, KataResult, KumiteResult, ResultConfig, Scenario};

/// Configuration for a run
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Randomize each roster before seeding
    pub shuffle: bool,
    /// Seed for the draw (None = fresh entropy)
    pub seed: Option<u64>,
}

impl RunConfig {
    /// Command line flags win over the scenario's own settings
    pub fn merged(&self, scenario: &Scenario) -> Self {
        Self {
            shuffle: self.shuffle || scenario.tournament.shuffle,
            seed: self.seed.or(scenario.tournament.seed),
        }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Runs the divisions of a scenario
pub struct DivisionRunner {
    config: RunConfig,
}

impl DivisionRunner {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Build and score every division, in file order
    pub fn run(&self, scenario: &Scenario) -> Result<TournamentResults> {
        let mut rng = self.config.rng();
        let mut results = TournamentResults::new(&scenario.tournament.name);

        for config in &scenario.divisions {
            let division = self.run_division(config, &mut rng)?;
            info!(
                division = %config.name,
                kind = %division.kind(),
                status = %division.status(),
                "division entered"
            );
            results.add_division(&config.name, division);
        }

        Ok(results)
    }

    /// Build one division and apply its results
    pub fn run_division(&self, config: &DivisionConfig, rng: &mut StdRng) -> Result<Division> {
        let mut people: Vec<Competitor> = config
            .entrants
            .iter()
            .map(|name| Competitor::new(name.as_str()))
            .collect();
        if self.config.shuffle {
            people.shuffle(rng);
            debug!(division = %config.name, "roster shuffled");
        }

        let mut division = Division::build(config.format, &people)
            .with_context(|| format!("Failed to build division {}", config.name))?;

        for (i, result) in config.results.iter().enumerate() {
            apply_result(&mut division, result).with_context(|| {
                format!("Division {}: result {} rejected", config.name, i + 1)
            })?;
        }

        Ok(division)
    }
}

/// Enter one scripted result
pub fn apply_result(division: &mut Division, result: &ResultConfig) -> Result<()> {
    match (division.bracket_mut(), result) {
        (DivisionBracket::Kata(bracket), ResultConfig::Kata(kata)) => {
            let id = bracket
                .find_match(kata.round, &Competitor::new(kata.entrant.as_str()))
                .map(|m| m.id)
                .ok_or_else(|| {
                    anyhow!("{} has no performance in round {}", kata.entrant, kata.round + 1)
                })?;
            bracket.score_match(id, scores_from(&kata.scores)?)?;
            debug!(entrant = %kata.entrant, round = kata.round, "kata scored");
            Ok(())
        }
        (DivisionBracket::Kata(_), ResultConfig::Kumite(_)) => {
            Err(anyhow!("kumite result given for a kata division"))
        }
        (other, ResultConfig::Kumite(kumite)) => {
            let bracket = other
                .kumite_mut()
                .ok_or_else(|| anyhow!("not a kumite division"))?;
            let id = bracket
                .get_match(kumite.round, kumite.order)?
                .map(|m| m.id)
                .ok_or_else(|| anyhow!("no match at round {}, order {}", kumite.round, kumite.order))?;
            bracket.save_match(id, kumite_update(kumite))?;
            debug!(round = kumite.round, order = kumite.order, done = kumite.done, "match saved");
            Ok(())
        }
        (_, ResultConfig::Kata(KataResult { entrant, .. })) => {
            Err(anyhow!("kata result for {} given for a kumite division", entrant))
        }
    }
}

fn kumite_update(result: &KumiteResult) -> MatchUpdate {
    MatchUpdate {
        done: result.done,
        winner: result.winner,
        aka: SideUpdate {
            points: Some(result.aka_points),
            warnings: Some(result.aka_warnings),
            disqualified: result.aka_disqualified,
        },
        shiro: SideUpdate {
            points: Some(result.shiro_points),
            warnings: Some(result.shiro_warnings),
            disqualified: result.shiro_disqualified,
        },
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod runner_tests;
