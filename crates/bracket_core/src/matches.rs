//! Kumite match records: sides, scoring state and winner determination

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::competitor::Competitor;
use crate::error::{BracketError, Result};

/// Index of a match inside its bracket's [`MatchSet`](crate::MatchSet).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchId(pub usize);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of one [`MatchSide`]. Never reused within a bracket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideId(pub u64);

/// The two competitor slots of a match. Aka is the red corner, shiro the white.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Aka,
    Shiro,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Aka, Side::Shiro];

    pub fn other(self) -> Side {
        match self {
            Side::Aka => Side::Shiro,
            Side::Shiro => Side::Aka,
        }
    }

    /// Side of the parent match fed by the match at `order`: even orders feed
    /// aka, odd orders feed shiro.
    pub fn fed_by(order: i32) -> Side {
        if order.rem_euclid(2) == 0 {
            Side::Aka
        } else {
            Side::Shiro
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Aka => f.write_str("aka"),
            Side::Shiro => f.write_str("shiro"),
        }
    }
}

/// How a format treats equal points when no winner was named
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TiePolicy {
    /// Equal points without an explicit winner is an error
    Reject,
    /// Draws are allowed; the format settles them itself
    Allow,
}

/// One competitor's appearance in one match, with its scoring state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSide {
    pub id: SideId,
    pub competitor: Competitor,
    pub points: u16,
    pub warnings: u16,
    pub disqualified: bool,
    /// Placed by the draw rather than earned in an earlier match
    pub is_first_match: bool,
}

impl MatchSide {
    pub(crate) fn new(id: SideId, competitor: Competitor, is_first_match: bool) -> Self {
        Self {
            id,
            disqualified: competitor.is_disqualified(),
            competitor,
            points: 0,
            warnings: 0,
            is_first_match,
        }
    }

    /// The competitor this side hands on to later matches
    pub fn outcome(&self) -> Competitor {
        if self.disqualified {
            Competitor::Disqualified
        } else {
            self.competitor.clone()
        }
    }
}

/// Partial change to one side's scoring state. `None` leaves a field as is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideUpdate {
    pub points: Option<u16>,
    pub warnings: Option<u16>,
    pub disqualified: Option<bool>,
}

impl SideUpdate {
    fn is_empty(&self) -> bool {
        self.points.is_none() && self.warnings.is_none() && self.disqualified.is_none()
    }

    fn apply(&self, side: &mut MatchSide) {
        if let Some(points) = self.points {
            side.points = points;
        }
        if let Some(warnings) = self.warnings {
            side.warnings = warnings;
        }
        if let Some(disqualified) = self.disqualified {
            side.disqualified = disqualified;
        }
    }
}

/// New state submitted for a match.
///
/// ```
/// use bracket_core::{MatchUpdate, Side};
///
/// let update = MatchUpdate::done().points(2, 2).winner(Side::Shiro);
/// assert!(update.done);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchUpdate {
    pub done: bool,
    /// Explicit decision; inferred from points when absent
    pub winner: Option<Side>,
    pub aka: SideUpdate,
    pub shiro: SideUpdate,
}

impl MatchUpdate {
    /// Mark the match complete
    pub fn done() -> Self {
        Self {
            done: true,
            ..Default::default()
        }
    }

    /// Keep the match open (or reopen a completed one)
    pub fn reopen() -> Self {
        Self::default()
    }

    pub fn points(mut self, aka: u16, shiro: u16) -> Self {
        self.aka.points = Some(aka);
        self.shiro.points = Some(shiro);
        self
    }

    pub fn warnings(mut self, aka: u16, shiro: u16) -> Self {
        self.aka.warnings = Some(aka);
        self.shiro.warnings = Some(shiro);
        self
    }

    pub fn winner(mut self, side: Side) -> Self {
        self.winner = Some(side);
        self
    }

    pub fn disqualify(mut self, side: Side) -> Self {
        self.side_mut(side).disqualified = Some(true);
        self
    }

    pub fn reinstate(mut self, side: Side) -> Self {
        self.side_mut(side).disqualified = Some(false);
        self
    }

    pub fn side(&self, side: Side) -> &SideUpdate {
        match side {
            Side::Aka => &self.aka,
            Side::Shiro => &self.shiro,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut SideUpdate {
        match side {
            Side::Aka => &mut self.aka,
            Side::Shiro => &mut self.shiro,
        }
    }
}

/// Lifecycle of a match
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    /// Waiting on an earlier match
    Pending,
    /// Can be fought now
    Ready,
    Done,
}

/// A single kumite bout between two sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    /// Rounds count back from the final, which is round 0
    pub round: u32,
    /// Position within the round; -1 is the consolation match
    pub order: i32,
    pub aka: Option<MatchSide>,
    pub shiro: Option<MatchSide>,
    pub done: bool,
    /// Only meaningful when `done`
    pub aka_won: bool,
    pub winner_target: Option<MatchId>,
    pub loser_target: Option<MatchId>,
}

impl Match {
    pub(crate) fn new(id: MatchId, round: u32, order: i32) -> Self {
        Self {
            id,
            round,
            order,
            aka: None,
            shiro: None,
            done: false,
            aka_won: false,
            winner_target: None,
            loser_target: None,
        }
    }

    pub fn side(&self, side: Side) -> Option<&MatchSide> {
        match side {
            Side::Aka => self.aka.as_ref(),
            Side::Shiro => self.shiro.as_ref(),
        }
    }

    pub(crate) fn slot_mut(&mut self, side: Side) -> &mut Option<MatchSide> {
        match side {
            Side::Aka => &mut self.aka,
            Side::Shiro => &mut self.shiro,
        }
    }

    pub fn competitor(&self, side: Side) -> Option<&Competitor> {
        self.side(side).map(|s| &s.competitor)
    }

    pub fn is_final(&self) -> bool {
        self.round == 0 && self.order == 0
    }

    pub fn is_consolation(&self) -> bool {
        self.round == 0 && self.order == -1
    }

    pub fn winning_side(&self) -> Option<Side> {
        if !self.done {
            return None;
        }
        Some(if self.aka_won { Side::Aka } else { Side::Shiro })
    }

    /// Winner of a completed match; the disqualified placeholder if the
    /// winning side was disqualified.
    pub fn winner(&self) -> Option<Competitor> {
        let side = self.winning_side()?;
        self.side(side).map(MatchSide::outcome)
    }

    pub fn loser(&self) -> Option<Competitor> {
        let side = self.winning_side()?.other();
        self.side(side).map(MatchSide::outcome)
    }

    /// Downstream matches, winner edge first, without duplicates
    pub fn targets(&self) -> Vec<MatchId> {
        let mut targets = Vec::with_capacity(2);
        for target in [self.winner_target, self.loser_target].into_iter().flatten() {
            if !targets.contains(&target) {
                targets.push(target);
            }
        }
        targets
    }

    pub fn involves(&self, competitor: &Competitor) -> bool {
        Side::BOTH
            .iter()
            .any(|&side| self.competitor(side) == Some(competitor))
    }

    /// Human readable name used on score sheets
    pub fn display_name(&self) -> String {
        if self.is_final() {
            "Final".to_string()
        } else if self.is_consolation() {
            "Consolation Final".to_string()
        } else if self.round == 1 {
            format!("Semi-finals, Match {}", self.order + 1)
        } else if self.round == 2 {
            format!("Quarter-finals, Match {}", self.order + 1)
        } else {
            format!(
                "Round of {}, Match {}",
                1u64 << (self.round + 1),
                self.order + 1
            )
        }
    }

    /// Copy the submitted scoring state onto the sides
    pub(crate) fn apply_scores(&mut self, update: &MatchUpdate) -> Result<()> {
        for side in Side::BOTH {
            let change = update.side(side);
            if change.is_empty() {
                continue;
            }
            match self.slot_mut(side) {
                Some(match_side) => change.apply(match_side),
                None => return Err(BracketError::MissingSide(self.id)),
            }
        }
        Ok(())
    }

    /// Settle `aka_won` for a match that is being completed.
    ///
    /// A lone disqualification forfeits the match to the other side. Otherwise
    /// an explicit decision stands, and failing that the points decide.
    pub(crate) fn decide_winner(&mut self, explicit: Option<Side>, ties: TiePolicy) -> Result<()> {
        let (aka, shiro) = match (&self.aka, &self.shiro) {
            (Some(aka), Some(shiro)) => (aka, shiro),
            _ => return Err(BracketError::MissingSide(self.id)),
        };

        self.aka_won = match (aka.disqualified, shiro.disqualified) {
            (false, true) => true,
            (true, false) => false,
            (true, true) => explicit.map_or(true, |side| side == Side::Aka),
            (false, false) => match explicit {
                Some(side) => side == Side::Aka,
                None => match aka.points.cmp(&shiro.points) {
                    Ordering::Greater => true,
                    Ordering::Less => false,
                    Ordering::Equal => match ties {
                        TiePolicy::Reject => return Err(BracketError::TieNotPermitted(self.id)),
                        TiePolicy::Allow => false,
                    },
                },
            },
        };
        Ok(())
    }
}

#[cfg(test)]
#[path = "matches_tests.rs"]
mod matches_tests;
