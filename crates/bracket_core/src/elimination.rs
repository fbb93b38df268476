//! Single-elimination bracket with a third-place consolation match
//!
//! ```text
//!       2    1      0
//! 0      ____
//! 1          \____
//! 2 ----\____/    \
//! 3 ----/          \____
//! 4 ----\____      /
//! 5 ----/    \____/
//! 6      ____/
//! 7
//! -1                ____
//! ```
//!
//! Rounds count back from the final. Byes put the seeded competitor straight
//! into the next round, so early rounds only hold the matches that are
//! actually fought.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::bracket::{atomically, check_roster, Bracket, BracketKind, Placing};
use crate::competitor::Competitor;
use crate::error::{BracketError, Result};
use crate::match_set::MatchSet;
use crate::matches::{Match, MatchId, MatchSide, MatchUpdate, Side, TiePolicy};
use crate::seeding::{matches_in_round, rounds_for, seed_order};

/// Smallest roster an elimination bracket accepts
pub const MIN_ELIMINATION_ENTRANTS: usize = 4;

/// One side of one match, as picked for a swap
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideRef {
    pub match_id: MatchId,
    pub side: Side,
}

impl SideRef {
    pub fn new(match_id: MatchId, side: Side) -> Self {
        Self { match_id, side }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EliminationBracket {
    rounds: u32,
    matches: MatchSet,
}

/// Fixed inputs of a build, threaded through the recursion
struct Draw<'a> {
    people: &'a [Competitor],
    consolation: MatchId,
}

impl EliminationBracket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rounds, the final included. Zero until built.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn final_match(&self) -> Option<&Match> {
        self.matches.find(0, 0)
    }

    pub fn consolation_match(&self) -> Option<&Match> {
        self.matches.find(0, -1)
    }

    fn build_node(
        &mut self,
        draw: &Draw<'_>,
        round: u32,
        index: i32,
        parent: Option<MatchId>,
        slots: &[usize],
    ) -> Result<()> {
        let n = draw.people.len();
        if slots.len() > 2 {
            let id = self.add_match(draw, round, index, parent)?;
            let (top, bottom) = slots.split_at(slots.len() / 2);
            self.build_node(draw, round + 1, 2 * index, Some(id), top)?;
            self.build_node(draw, round + 1, 2 * index + 1, Some(id), bottom)?;
        } else if slots.len() == 2 {
            let (first, second) = (slots[0], slots[1]);
            if first >= n {
                return Err(BracketError::BracketTooBig(n));
            }
            if second >= n {
                // Bye: the seeded competitor waits in the next round
                let parent = parent.ok_or(BracketError::BracketTooBig(n))?;
                let person = draw.people[first].clone();
                debug!(competitor = %person, round, "bye");
                self.matches.seat(parent, Side::fed_by(index), person, true)?;
            } else {
                let id = self.add_match(draw, round, index, parent)?;
                self.matches.seat(id, Side::Aka, draw.people[first].clone(), true)?;
                self.matches.seat(id, Side::Shiro, draw.people[second].clone(), true)?;
            }
        } else {
            return Err(BracketError::BracketTooBig(n));
        }
        Ok(())
    }

    fn add_match(&mut self, draw: &Draw<'_>, round: u32, index: i32, parent: Option<MatchId>) -> Result<MatchId> {
        let id = self.matches.push(round, index);
        self.matches.set_winner_target(id, parent)?;
        if round == 1 {
            self.matches.set_loser_target(id, Some(draw.consolation))?;
        }
        Ok(id)
    }

    fn match_callback(&mut self, id: MatchId) -> Result<()> {
        for target in self.matches.get(id)?.targets() {
            self.claim(target)?;
        }
        Ok(())
    }

    /// Pull the current winner/loser of each predecessor into `target`.
    ///
    /// Sides that already hold the right competitor are left alone, so
    /// claiming twice changes nothing.
    fn claim(&mut self, target: MatchId) -> Result<()> {
        let mut changed = false;
        for side in Side::BOTH {
            let Some(pred) = self.matches.predecessor_on(target, side) else {
                continue;
            };
            let pred = self.matches.get(pred)?;
            let contribution = if !pred.done {
                None
            } else if pred.winner_target == Some(target) {
                pred.winner()
            } else if pred.loser_target == Some(target) {
                pred.loser()
            } else {
                None
            };

            let current = self.matches.get(target)?;
            if current.competitor(side) == contribution.as_ref() {
                continue;
            }
            if current.done {
                return Err(BracketError::MatchDone(target));
            }

            debug!(
                match_id = %target,
                %side,
                competitor = contribution.as_ref().map(Competitor::name),
                "claim"
            );
            match contribution {
                Some(person) => self.matches.seat(target, side, person, false)?,
                None => *self.matches.get_mut(target)?.slot_mut(side) = None,
            }
            changed = true;
        }

        if changed {
            self.match_callback(target)?;
        }
        Ok(())
    }

    /// First-round sides that can still trade places with one another
    pub fn swappable_sides(&self) -> Vec<SideRef> {
        self.matches
            .canonical()
            .into_iter()
            .filter(|m| !m.done)
            .flat_map(|m| {
                Side::BOTH
                    .into_iter()
                    .filter(move |&side| m.side(side).is_some_and(|s| s.is_first_match))
                    .map(move |side| SideRef::new(m.id, side))
            })
            .collect()
    }

    /// Exchange two untouched first-round sides, e.g. to keep clubmates apart.
    pub fn swap_sides(&mut self, a: SideRef, b: SideRef) -> Result<()> {
        if a == b {
            return Err(BracketError::SwapWithSelf);
        }
        let first = self.swappable(a)?;
        let second = self.swappable(b)?;
        if first.competitor == second.competitor {
            return Err(BracketError::SwapWithSelf);
        }

        info!(first = %first.competitor, second = %second.competitor, "swap");
        atomically(self, |bracket| {
            *bracket.matches.get_mut(a.match_id)?.slot_mut(a.side) = Some(second);
            *bracket.matches.get_mut(b.match_id)?.slot_mut(b.side) = Some(first);
            bracket.match_callback(a.match_id)?;
            if b.match_id != a.match_id {
                bracket.match_callback(b.match_id)?;
            }
            Ok(())
        })
    }

    fn swappable(&self, at: SideRef) -> Result<MatchSide> {
        let m = self.matches.get(at.match_id)?;
        match m.side(at.side) {
            Some(side) if side.is_first_match && !m.done => Ok(side.clone()),
            Some(side) => Err(BracketError::NotSwappable(side.competitor.to_string())),
            None => Err(BracketError::NotSwappable(format!(
                "empty {} side of {}",
                at.side,
                m.display_name()
            ))),
        }
    }
}

impl Bracket for EliminationBracket {
    fn kind(&self) -> BracketKind {
        BracketKind::Elimination
    }

    fn build(&mut self, people: &[Competitor]) -> Result<()> {
        check_roster(self.is_built(), people)?;
        if people.len() < MIN_ELIMINATION_ENTRANTS {
            return Err(BracketError::WrongEntrantCount {
                format: "single elimination",
                expected: "at least 4",
                got: people.len(),
            });
        }

        let rounds = rounds_for(people.len());
        let slots = seed_order(rounds)?;
        atomically(self, |bracket| {
            bracket.rounds = rounds;
            let consolation = bracket.matches.push(0, -1);
            let draw = Draw { people, consolation };
            bracket.build_node(&draw, 0, 0, None, &slots)
        })?;

        info!(
            entrants = people.len(),
            rounds,
            matches = self.matches.len(),
            "built elimination bracket"
        );
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
        let fin = self.final_match();
        vec![
            Placing::new(1, fin.and_then(Match::winner)),
            Placing::new(2, fin.and_then(Match::loser)),
            Placing::new(3, self.consolation_match().and_then(Match::winner)),
        ]
    }

    fn get_match(&self, round: u32, index: i32) -> Result<Option<&Match>> {
        if round >= self.rounds {
            return Err(BracketError::InvalidRound(round));
        }
        if round == 0 && index == -1 {
            return Ok(self.consolation_match());
        }
        if index < 0 || index as usize >= matches_in_round(round) {
            return Err(BracketError::InvalidMatchIndex(index));
        }

        // Walk back from the final, halving the index range each round
        let mut remaining = index as usize;
        let mut current = self.final_match();
        for step in 0..round {
            let Some(m) = current else {
                break;
            };
            let split = matches_in_round(round - step - 1);
            let side = if remaining < split {
                Side::Aka
            } else {
                remaining -= split;
                Side::Shiro
            };
            current = self
                .matches
                .predecessor_on(m.id, side)
                .map(|pred| self.matches.get(pred))
                .transpose()?;
        }
        Ok(current)
    }
}

#[cfg(test)]
#[path = "elimination_tests.rs"]
mod elimination_tests;
