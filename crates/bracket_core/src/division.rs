//! A division's bracket, whichever format its roster calls for

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bracket::{Bracket, BracketKind, Placing};
use crate::competitor::Competitor;
use crate::elimination::{EliminationBracket, MIN_ELIMINATION_ENTRANTS};
use crate::error::{BracketError, Result};
use crate::kata::KataBracket;
use crate::matches::Side;
use crate::round_robin::{RoundRobinBracket, ROUND_ROBIN_SIZE};
use crate::two_person::TwoPersonBracket;

/// How an event is judged
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventFormat {
    /// Forms, scored by a judges' panel
    Kata,
    /// Sparring, fought in matches
    Kumite,
}

impl fmt::Display for EventFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventFormat::Kata => f.write_str("kata"),
            EventFormat::Kumite => f.write_str("kumite"),
        }
    }
}

/// Pick the bracket format for `entrants` competitors.
///
/// Kumite runs a two-person series for a pair, a round robin for three and a
/// single elimination bracket above that.
pub fn bracket_kind(format: EventFormat, entrants: usize) -> Result<BracketKind> {
    match format {
        EventFormat::Kata => Ok(BracketKind::Kata),
        EventFormat::Kumite => match entrants {
            2 => Ok(BracketKind::TwoPerson),
            ROUND_ROBIN_SIZE => Ok(BracketKind::RoundRobin),
            n if n >= MIN_ELIMINATION_ENTRANTS => Ok(BracketKind::Elimination),
            n => Err(BracketError::WrongEntrantCount {
                format: "kumite",
                expected: "at least 2",
                got: n,
            }),
        },
    }
}

/// Progress of a division as shown on the running order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DivisionStatus {
    /// Built and waiting for its first result. An unbuilt division has no status.
    Ready,
    Started,
    Done,
}

impl fmt::Display for DivisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DivisionStatus::Ready => "Ready",
            DivisionStatus::Started => "Started",
            DivisionStatus::Done => "Done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DivisionBracket {
    Elimination(EliminationBracket),
    TwoPerson(TwoPersonBracket),
    RoundRobin(RoundRobinBracket),
    Kata(KataBracket),
}

impl DivisionBracket {
    fn empty(kind: BracketKind) -> Self {
        match kind {
            BracketKind::Elimination => DivisionBracket::Elimination(EliminationBracket::new()),
            BracketKind::TwoPerson => DivisionBracket::TwoPerson(TwoPersonBracket::new()),
            BracketKind::RoundRobin => DivisionBracket::RoundRobin(RoundRobinBracket::new()),
            BracketKind::Kata => DivisionBracket::Kata(KataBracket::new()),
        }
    }

    pub fn kind(&self) -> BracketKind {
        match self {
            DivisionBracket::Elimination(_) => BracketKind::Elimination,
            DivisionBracket::TwoPerson(_) => BracketKind::TwoPerson,
            DivisionBracket::RoundRobin(_) => BracketKind::RoundRobin,
            DivisionBracket::Kata(_) => BracketKind::Kata,
        }
    }

    /// The kumite formats behind their common contract
    pub fn kumite(&self) -> Option<&dyn Bracket> {
        match self {
            DivisionBracket::Elimination(b) => Some(b),
            DivisionBracket::TwoPerson(b) => Some(b),
            DivisionBracket::RoundRobin(b) => Some(b),
            DivisionBracket::Kata(_) => None,
        }
    }

    pub fn kumite_mut(&mut self) -> Option<&mut dyn Bracket> {
        match self {
            DivisionBracket::Elimination(b) => Some(b),
            DivisionBracket::TwoPerson(b) => Some(b),
            DivisionBracket::RoundRobin(b) => Some(b),
            DivisionBracket::Kata(_) => None,
        }
    }

    pub fn kata(&self) -> Option<&KataBracket> {
        match self {
            DivisionBracket::Kata(b) => Some(b),
            _ => None,
        }
    }

    pub fn kata_mut(&mut self) -> Option<&mut KataBracket> {
        match self {
            DivisionBracket::Kata(b) => Some(b),
            _ => None,
        }
    }

    fn build(&mut self, people: &[Competitor]) -> Result<()> {
        match self {
            DivisionBracket::Elimination(b) => b.build(people),
            DivisionBracket::TwoPerson(b) => b.build(people),
            DivisionBracket::RoundRobin(b) => b.build(people),
            DivisionBracket::Kata(b) => b.build(people),
        }
    }
}

/// The competition of one division
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Division {
    format: EventFormat,
    entrants: Vec<Competitor>,
    bracket: DivisionBracket,
}

impl Division {
    /// Choose the format for `people` and lay out its bracket
    pub fn build(format: EventFormat, people: &[Competitor]) -> Result<Self> {
        let kind = bracket_kind(format, people.len())?;
        let mut bracket = DivisionBracket::empty(kind);
        bracket.build(people)?;
        Ok(Self {
            format,
            entrants: people.to_vec(),
            bracket,
        })
    }

    pub fn format(&self) -> EventFormat {
        self.format
    }

    pub fn kind(&self) -> BracketKind {
        self.bracket.kind()
    }

    /// The roster as seeded, late kata entrants included
    pub fn entrants(&self) -> &[Competitor] {
        &self.entrants
    }

    pub fn bracket(&self) -> &DivisionBracket {
        &self.bracket
    }

    pub fn bracket_mut(&mut self) -> &mut DivisionBracket {
        &mut self.bracket
    }

    /// Seat a late arrival. Only kata rosters stay open after the draw.
    pub fn add_entrant(&mut self, person: Competitor) -> Result<()> {
        match &mut self.bracket {
            DivisionBracket::Kata(b) => {
                b.add_entrant(person.clone())?;
                self.entrants.push(person);
                Ok(())
            }
            other => Err(BracketError::LateEntryClosed(other.kind())),
        }
    }

    /// True once any match or performance has a result
    pub fn is_started(&self) -> bool {
        match &self.bracket {
            DivisionBracket::Kata(b) => b.rounds().iter().any(|r| r.is_started()),
            other => other
                .kumite()
                .is_some_and(|b| b.matches().iter().any(|m| m.done)),
        }
    }

    pub fn is_done(&self) -> bool {
        match &self.bracket {
            DivisionBracket::Kata(b) => b.get_next_match().is_none(),
            other => other
                .kumite()
                .map_or(true, |b| b.get_next_match().is_none()),
        }
    }

    pub fn status(&self) -> DivisionStatus {
        if self.is_done() {
            DivisionStatus::Done
        } else if self.is_started() {
            DivisionStatus::Started
        } else {
            DivisionStatus::Ready
        }
    }

    pub fn get_winners(&self) -> Vec<Placing> {
        match &self.bracket {
            DivisionBracket::Kata(b) => b.get_winners(),
            other => other.kumite().map(|b| b.get_winners()).unwrap_or_default(),
        }
    }

    /// Short description of what is up next, for the running order
    pub fn next_up(&self) -> Option<String> {
        match &self.bracket {
            DivisionBracket::Kata(b) => {
                let m = b.get_next_match()?;
                let depth = b.round(m.id.round).map_or(0, |r| r.round);
                Some(format!("Round {}: {}", depth + 1, m.competitor))
            }
            other => {
                let m = other.kumite()?.get_next_match()?;
                let name = |side| m.competitor(side).map_or("?", Competitor::name);
                Some(format!(
                    "{}: {} vs {}",
                    m.display_name(),
                    name(Side::Aka),
                    name(Side::Shiro)
                ))
            }
        }
    }
}

#[cfg(test)]
#[path = "division_tests.rs"]
mod division_tests;
