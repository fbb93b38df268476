//! Best-of series between exactly two competitors
//!
//! The pair fights at least twice, swapping corners each time. Points are
//! summed over the series; while the totals stay level after every match is
//! complete, a sudden-death match is appended.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::bracket::{atomically, check_roster, single_round_match, Bracket, BracketKind, Placing};
use crate::competitor::Competitor;
use crate::error::{BracketError, Result};
use crate::match_set::MatchSet;
use crate::matches::{Match, MatchId, MatchUpdate, Side, TiePolicy};

/// Matches scheduled before any tie-break
pub const SERIES_LENGTH: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TwoPersonBracket {
    matches: MatchSet,
    winner: Option<Competitor>,
    loser: Option<Competitor>,
}

/// Running totals for the two competitors, indexed like the first match
#[derive(Debug, Default)]
struct SeriesTally {
    points: [i32; 2],
    disqualified: [u32; 2],
}

impl TwoPersonBracket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn winner(&self) -> Option<&Competitor> {
        self.winner.as_ref()
    }

    pub fn loser(&self) -> Option<&Competitor> {
        self.loser.as_ref()
    }

    fn match_callback(&mut self) -> Result<()> {
        // Matches are only ever appended or cut from the end, so arena order
        // is play order.
        let opener = self.matches.get(MatchId(0))?;
        let pair = [
            opener
                .competitor(Side::Aka)
                .cloned()
                .ok_or(BracketError::MissingSide(opener.id))?,
            opener
                .competitor(Side::Shiro)
                .cloned()
                .ok_or(BracketError::MissingSide(opener.id))?,
        ];
        let slot = |c: &Competitor| usize::from(*c != pair[0]);

        let mut tally = SeriesTally::default();
        let mut all_done = true;
        let mut decided_at = None;
        for (im, m) in self.matches.iter().enumerate() {
            all_done = all_done && m.done;
            if m.done {
                for side in Side::BOTH {
                    let s = m.side(side).ok_or(BracketError::MissingSide(m.id))?;
                    let k = slot(&s.competitor);
                    tally.points[k] += i32::from(s.points);
                    tally.disqualified[k] += u32::from(s.disqualified);
                }
            }
            if !all_done {
                break;
            }

            // At least two matches are always fought
            let have_winner = (tally.points[0] != tally.points[1] && im >= 1)
                || tally.disqualified.iter().any(|&n| n > 0);
            for k in 0..2 {
                if tally.disqualified[k] > 0 {
                    tally.points[k] = -1;
                }
            }
            if have_winner {
                decided_at = Some(im);
                break;
            }
        }

        match decided_at {
            Some(im) => {
                let w = if tally.points[0] > tally.points[1] { 0 } else { 1 };
                let outcome = |k: usize| {
                    if tally.disqualified[k] > 0 {
                        Competitor::Disqualified
                    } else {
                        pair[k].clone()
                    }
                };
                self.winner = Some(outcome(w));
                self.loser = Some(outcome(1 - w));
                if self.matches.len() > im + 1 {
                    debug!(kept = im + 1, dropped = self.matches.len() - im - 1, "series decided early");
                    self.matches.truncate(im + 1);
                }
            }
            None => {
                self.winner = None;
                self.loser = None;
                if all_done {
                    self.add_tie_break()?;
                }
            }
        }
        Ok(())
    }

    /// Append a sudden-death match with corners swapped from the last one
    fn add_tie_break(&mut self) -> Result<()> {
        let last = self.matches.iter().last().ok_or(BracketError::NotBuilt)?;
        let last_id = last.id;
        let order = last.order + 1;
        let aka = last
            .competitor(Side::Shiro)
            .cloned()
            .ok_or(BracketError::MissingSide(last_id))?;
        let shiro = last
            .competitor(Side::Aka)
            .cloned()
            .ok_or(BracketError::MissingSide(last_id))?;

        info!(order, "series tied, adding tie-break match");
        let id = self.matches.push(0, order);
        self.matches.seat(id, Side::Aka, aka, false)?;
        self.matches.seat(id, Side::Shiro, shiro, false)?;
        self.matches.set_winner_target(last_id, Some(id))?;
        self.matches.set_loser_target(last_id, Some(id))?;
        Ok(())
    }
}

impl Bracket for TwoPersonBracket {
    fn kind(&self) -> BracketKind {
        BracketKind::TwoPerson
    }

    fn build(&mut self, people: &[Competitor]) -> Result<()> {
        check_roster(self.is_built(), people)?;
        if people.len() != 2 {
            return Err(BracketError::WrongEntrantCount {
                format: "two person series",
                expected: "exactly 2",
                got: people.len(),
            });
        }

        atomically(self, |bracket| {
            let mut prev = None;
            for i in 0..SERIES_LENGTH {
                let id = bracket.matches.push(0, i as i32);
                bracket.matches.seat(id, Side::Aka, people[i % 2].clone(), false)?;
                bracket.matches.seat(id, Side::Shiro, people[(i + 1) % 2].clone(), false)?;
                if let Some(prev) = prev {
                    bracket.matches.set_winner_target(prev, Some(id))?;
                    bracket.matches.set_loser_target(prev, Some(id))?;
                }
                prev = Some(id);
            }
            Ok(())
        })?;

        info!(aka = %people[0], shiro = %people[1], "built two person series");
        Ok(())
    }

    fn matches(&self) -> &MatchSet {
        &self.matches
    }

    fn save_match(&mut self, id: MatchId, update: MatchUpdate) -> Result<()> {
        atomically(self, |bracket| {
            bracket.matches.apply_update(id, &update, TiePolicy::Allow)?;
            bracket.match_callback()
        })
    }

    fn get_winners(&self) -> Vec<Placing> {
        vec![
            Placing::new(1, self.winner.clone()),
            Placing::new(2, self.loser.clone()),
        ]
    }

    fn get_match(&self, round: u32, index: i32) -> Result<Option<&Match>> {
        single_round_match(&self.matches, round, index)
    }
}

#[cfg(test)]
#[path = "two_person_tests.rs"]
mod two_person_tests;
