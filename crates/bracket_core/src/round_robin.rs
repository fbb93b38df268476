//! Three-person round robin
//!
//! Everyone fights everyone once: 0 v 1, 1 v 2, 2 v 0. Medals go by wins,
//! then point differential, then total points. A competitor disqualified in
//! one match forfeits their remaining match.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::bracket::{atomically, check_roster, single_round_match, Bracket, BracketKind, Placing};
use crate::competitor::Competitor;
use crate::error::{BracketError, Result};
use crate::match_set::MatchSet;
use crate::matches::{Match, MatchId, MatchUpdate, Side, TiePolicy};

pub const ROUND_ROBIN_SIZE: usize = 3;

/// Ranking key: `[-disqualifications, wins, point differential, total points]`
type Record = [i32; 4];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundRobinBracket {
    matches: MatchSet,
    /// Gold, silver, bronze
    medals: [Option<Competitor>; 3],
}

impl RoundRobinBracket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gold(&self) -> Option<&Competitor> {
        self.medals[0].as_ref()
    }

    pub fn silver(&self) -> Option<&Competitor> {
        self.medals[1].as_ref()
    }

    pub fn bronze(&self) -> Option<&Competitor> {
        self.medals[2].as_ref()
    }

    fn match_callback(&mut self, id: MatchId) -> Result<()> {
        for side in Side::BOTH {
            self.propagate_disqualification(id, side)?;
        }
        self.update_medals()
    }

    /// Mirror `side` of match `id` into the other match its competitor is in.
    ///
    /// Aka of match k is shiro of match k-1, shiro of match k is aka of match
    /// k+1. While the disqualification stands the edge is kept on the match
    /// (winner edge for aka, loser edge for shiro) so the forfeit can't be
    /// undone after the other match is fought.
    fn propagate_disqualification(&mut self, id: MatchId, side: Side) -> Result<()> {
        let m = self.matches.get(id)?;
        let own = m.side(side).ok_or(BracketError::MissingSide(id))?;
        if own.competitor.is_disqualified() {
            return Ok(());
        }

        let step = match side {
            Side::Aka => ROUND_ROBIN_SIZE as i32 - 1,
            Side::Shiro => 1,
        };
        let other_order = (m.order + step).rem_euclid(ROUND_ROBIN_SIZE as i32);
        let Some(other) = self.matches.find(0, other_order) else {
            return Ok(());
        };
        if other.done {
            return Ok(());
        }

        let disqualified = own.disqualified && m.done;
        let replacement = if disqualified {
            Competitor::Disqualified
        } else {
            own.competitor.clone()
        };
        let other_id = other.id;
        let other_side = side.other();
        let current = other
            .side(other_side)
            .ok_or(BracketError::MissingSide(other_id))?;
        if current.competitor == replacement {
            return Ok(());
        }

        debug!(
            from = %id,
            to = %other_id,
            competitor = %replacement,
            "propagate disqualification"
        );
        let slot = self
            .matches
            .get_mut(other_id)?
            .slot_mut(other_side)
            .as_mut()
            .ok_or(BracketError::MissingSide(other_id))?;
        slot.competitor = replacement;
        slot.disqualified = disqualified;

        let edge = disqualified.then_some(other_id);
        match side {
            Side::Aka => self.matches.set_winner_target(id, edge),
            Side::Shiro => self.matches.set_loser_target(id, edge),
        }
    }

    fn update_medals(&mut self) -> Result<()> {
        if !self.matches.all_done() {
            self.medals = Default::default();
            return Ok(());
        }

        let mut records: Vec<(Competitor, Record)> = Vec::with_capacity(ROUND_ROBIN_SIZE);
        for m in self.matches.canonical() {
            let (aka, shiro) = match (&m.aka, &m.shiro) {
                (Some(aka), Some(shiro)) => (aka, shiro),
                _ => return Err(BracketError::MissingSide(m.id)),
            };
            let diff = i32::from(aka.points) - i32::from(shiro.points);
            for (side, s, diff) in [(Side::Aka, aka, diff), (Side::Shiro, shiro, -diff)] {
                if s.competitor.is_disqualified() {
                    continue;
                }
                let idx = match records.iter().position(|(c, _)| *c == s.competitor) {
                    Some(idx) => idx,
                    None => {
                        records.push((s.competitor.clone(), Record::default()));
                        records.len() - 1
                    }
                };
                let record = &mut records[idx].1;
                record[0] -= i32::from(s.disqualified);
                if m.winning_side() == Some(side) {
                    record[1] += 1;
                }
                record[2] += diff;
                record[3] += i32::from(s.points);
            }
        }

        // Stable, so equal records keep match order until rejected below
        records.sort_by(|a, b| b.1.cmp(&a.1));
        if records.windows(2).any(|pair| pair[0].1 == pair[1].1) {
            return Err(BracketError::UnresolvedTie);
        }

        let mut medals: [Option<Competitor>; 3] = Default::default();
        for (medal, (person, record)) in medals.iter_mut().zip(records) {
            *medal = Some(if record[0] != 0 {
                Competitor::Disqualified
            } else {
                person
            });
        }
        info!(
            gold = medals[0].as_ref().map(Competitor::name),
            silver = medals[1].as_ref().map(Competitor::name),
            bronze = medals[2].as_ref().map(Competitor::name),
            "round robin complete"
        );
        self.medals = medals;
        Ok(())
    }
}

impl Bracket for RoundRobinBracket {
    fn kind(&self) -> BracketKind {
        BracketKind::RoundRobin
    }

    fn build(&mut self, people: &[Competitor]) -> Result<()> {
        check_roster(self.is_built(), people)?;
        if people.len() != ROUND_ROBIN_SIZE {
            return Err(BracketError::WrongEntrantCount {
                format: "round robin",
                expected: "exactly 3",
                got: people.len(),
            });
        }

        atomically(self, |bracket| {
            for (i, person) in people.iter().enumerate() {
                let id = bracket.matches.push(0, i as i32);
                let opponent = people[(i + 1) % people.len()].clone();
                bracket.matches.seat(id, Side::Aka, person.clone(), false)?;
                bracket.matches.seat(id, Side::Shiro, opponent, false)?;
            }
            Ok(())
        })?;

        info!(entrants = people.len(), "built round robin");
        Ok(())
    }

    fn matches(&self) -> &MatchSet {
        &self.matches
    }

    fn save_match(&mut self, id: MatchId, update: MatchUpdate) -> Result<()> {
        atomically(self, |bracket| {
            bracket.matches.apply_update(id, &update, TiePolicy::Reject)?;
            bracket.match_callback(id)
        })
    }

    fn get_winners(&self) -> Vec<Placing> {
        self.medals
            .iter()
            .zip(1..)
            .map(|(medal, rank)| Placing::new(rank, medal.clone()))
            .collect()
    }

    fn get_match(&self, round: u32, index: i32) -> Result<Option<&Match>> {
        if index >= ROUND_ROBIN_SIZE as i32 {
            return Err(BracketError::InvalidMatchIndex(index));
        }
        single_round_match(&self.matches, round, index)
    }
}

#[cfg(test)]
#[path = "round_robin_tests.rs"]
mod round_robin_tests;
