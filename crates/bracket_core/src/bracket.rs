//! Contract shared by the kumite bracket formats

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::warn;

use crate::competitor::Competitor;
use crate::error::{BracketError, Result};
use crate::match_set::MatchSet;
use crate::matches::{Match, MatchId, MatchStatus, MatchUpdate};

/// The bracket formats a division can run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketKind {
    Elimination,
    TwoPerson,
    RoundRobin,
    Kata,
}

impl fmt::Display for BracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BracketKind::Elimination => "Single elimination",
            BracketKind::TwoPerson => "Two person",
            BracketKind::RoundRobin => "Round robin",
            BracketKind::Kata => "Kata",
        };
        f.write_str(name)
    }
}

/// One line of the standings. `competitor` is `None` while the place is
/// still undecided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placing {
    pub rank: u32,
    pub competitor: Option<Competitor>,
}

impl Placing {
    pub fn new(rank: u32, competitor: Option<Competitor>) -> Self {
        Self { rank, competitor }
    }
}

/// A kumite bracket: a set of matches plus the rules that move competitors
/// between them.
///
/// Every successful [`save_match`](Bracket::save_match) runs the format's
/// propagation before returning. A failed save leaves the bracket exactly as
/// it was.
pub trait Bracket {
    fn kind(&self) -> BracketKind;

    /// Lay out the matches for `people`. Legal only once.
    fn build(&mut self, people: &[Competitor]) -> Result<()>;

    fn matches(&self) -> &MatchSet;

    /// Record new scores or a new completion state for a match
    fn save_match(&mut self, id: MatchId, update: MatchUpdate) -> Result<()>;

    /// Current standings; undecided places hold `None`
    fn get_winners(&self) -> Vec<Placing>;

    /// Match at `(round, index)`, `None` if that slot has no match
    fn get_match(&self, round: u32, index: i32) -> Result<Option<&Match>>;

    fn get_next_match(&self) -> Option<&Match> {
        self.matches().next_ready()
    }

    fn get_on_deck_match(&self) -> Option<&Match> {
        self.matches().on_deck()
    }

    fn is_built(&self) -> bool {
        !self.matches().is_empty()
    }

    fn match_status(&self, id: MatchId) -> Result<MatchStatus> {
        self.matches().status(id)
    }
}

/// Run `op` against `bracket`, restoring the previous state if it fails.
pub(crate) fn atomically<B, T, F>(bracket: &mut B, op: F) -> Result<T>
where
    B: Clone,
    F: FnOnce(&mut B) -> Result<T>,
{
    let snapshot = bracket.clone();
    match op(bracket) {
        Ok(value) => Ok(value),
        Err(err) => {
            warn!(%err, "change rejected, bracket restored");
            *bracket = snapshot;
            Err(err)
        }
    }
}

/// Reject rebuilding and rosters that list someone twice
pub(crate) fn check_roster(built: bool, people: &[Competitor]) -> Result<()> {
    if built {
        return Err(BracketError::AlreadyBuilt);
    }
    let mut seen = HashSet::with_capacity(people.len());
    for person in people {
        if !seen.insert(person) {
            return Err(BracketError::DuplicateEntrant(person.to_string()));
        }
    }
    Ok(())
}

/// `get_match` for the single-round formats
pub(crate) fn single_round_match(matches: &MatchSet, round: u32, index: i32) -> Result<Option<&Match>> {
    if round != 0 {
        return Err(BracketError::InvalidRound(round));
    }
    if index < 0 {
        return Err(BracketError::InvalidMatchIndex(index));
    }
    Ok(matches.find(0, index))
}
