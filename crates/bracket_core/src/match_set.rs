//! Arena of matches with winner/loser edges and a reverse-edge index

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use crate::competitor::Competitor;
use crate::error::{BracketError, Result};
use crate::matches::{Match, MatchId, MatchSide, MatchStatus, MatchUpdate, Side, SideId, TiePolicy};

/// All matches of one bracket.
///
/// Matches are addressed by [`MatchId`], their index in the arena. Forward
/// edges live on the matches themselves; `predecessors` is the reverse index so
/// claiming a side never scans the whole bracket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchSet {
    matches: Vec<Match>,
    predecessors: Vec<Vec<MatchId>>,
    next_side: u64,
}

impl MatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Match> {
        self.matches.iter()
    }

    pub fn get(&self, id: MatchId) -> Result<&Match> {
        self.matches
            .get(id.0)
            .ok_or(BracketError::UnknownMatch(id))
    }

    pub(crate) fn get_mut(&mut self, id: MatchId) -> Result<&mut Match> {
        self.matches
            .get_mut(id.0)
            .ok_or(BracketError::UnknownMatch(id))
    }

    /// Match at a `(round, order)` coordinate
    pub fn find(&self, round: u32, order: i32) -> Option<&Match> {
        self.matches
            .iter()
            .find(|m| m.round == round && m.order == order)
    }

    /// Matches in play order: deepest round first, then by order
    pub fn canonical(&self) -> Vec<&Match> {
        let mut ordered: Vec<&Match> = self.matches.iter().collect();
        ordered.sort_by_key(|m| (Reverse(m.round), m.order));
        ordered
    }

    pub(crate) fn push(&mut self, round: u32, order: i32) -> MatchId {
        let id = MatchId(self.matches.len());
        self.matches.push(Match::new(id, round, order));
        self.predecessors.push(Vec::new());
        id
    }

    /// A fresh side for `competitor`; every call yields a new [`SideId`]
    pub(crate) fn new_side(&mut self, competitor: Competitor, is_first_match: bool) -> MatchSide {
        let id = SideId(self.next_side);
        self.next_side += 1;
        MatchSide::new(id, competitor, is_first_match)
    }

    pub(crate) fn seat(&mut self, id: MatchId, side: Side, competitor: Competitor, is_first_match: bool) -> Result<()> {
        let fresh = self.new_side(competitor, is_first_match);
        *self.get_mut(id)?.slot_mut(side) = Some(fresh);
        Ok(())
    }

    pub(crate) fn set_winner_target(&mut self, from: MatchId, to: Option<MatchId>) -> Result<()> {
        let old = self.get(from)?.winner_target;
        self.get_mut(from)?.winner_target = to;
        self.relink(from, old, to)
    }

    pub(crate) fn set_loser_target(&mut self, from: MatchId, to: Option<MatchId>) -> Result<()> {
        let old = self.get(from)?.loser_target;
        self.get_mut(from)?.loser_target = to;
        self.relink(from, old, to)
    }

    fn relink(&mut self, from: MatchId, old: Option<MatchId>, new: Option<MatchId>) -> Result<()> {
        if let Some(old) = old {
            let still_linked = self.get(from)?.targets().contains(&old);
            if !still_linked {
                self.predecessors[old.0].retain(|&p| p != from);
            }
        }
        if let Some(new) = new {
            self.get(new)?;
            let preds = &mut self.predecessors[new.0];
            if !preds.contains(&from) {
                preds.push(from);
            }
        }
        Ok(())
    }

    /// Matches whose winner or loser feeds `id`
    pub fn predecessors(&self, id: MatchId) -> &[MatchId] {
        self.predecessors
            .get(id.0)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The predecessor feeding `side` of `id`, picked by order parity
    pub fn predecessor_on(&self, id: MatchId, side: Side) -> Option<MatchId> {
        self.predecessors(id)
            .iter()
            .copied()
            .find(|&p| Side::fed_by(self.matches[p.0].order) == side)
    }

    /// True if the outcome can change without invalidating another completed match
    pub fn is_editable(&self, id: MatchId) -> Result<bool> {
        let m = self.get(id)?;
        let preds_done = self
            .predecessors(id)
            .iter()
            .all(|p| self.matches[p.0].done);
        let succ_done = m.targets().iter().any(|t| self.matches[t.0].done);
        Ok(preds_done && !succ_done)
    }

    /// True if the match can be fought for the first time
    pub fn is_ready(&self, id: MatchId) -> Result<bool> {
        Ok(!self.get(id)?.done && self.is_editable(id)?)
    }

    pub fn status(&self, id: MatchId) -> Result<MatchStatus> {
        if self.get(id)?.done {
            Ok(MatchStatus::Done)
        } else if self.is_editable(id)? {
            Ok(MatchStatus::Ready)
        } else {
            Ok(MatchStatus::Pending)
        }
    }

    /// First unfinished match in play order that can be fought now
    pub fn next_ready(&self) -> Option<&Match> {
        self.canonical()
            .into_iter()
            .find(|m| !m.done && self.is_editable(m.id).unwrap_or(false))
    }

    /// The unfinished match after the next one
    pub fn on_deck(&self) -> Option<&Match> {
        self.canonical()
            .into_iter()
            .filter(|m| !m.done)
            .nth(1)
    }

    pub fn all_done(&self) -> bool {
        self.matches.iter().all(|m| m.done)
    }

    /// Record a new state for `id`, enforcing the editability rules.
    ///
    /// Nothing downstream may be complete, and a match can only be completed
    /// once everything feeding it is.
    pub(crate) fn apply_update(&mut self, id: MatchId, update: &MatchUpdate, ties: TiePolicy) -> Result<()> {
        let m = self.get(id)?;
        if m.targets().iter().any(|t| self.matches[t.0].done) {
            return Err(BracketError::SuccessorDone(id));
        }
        if update.done && self.predecessors(id).iter().any(|p| !self.matches[p.0].done) {
            return Err(BracketError::PredecessorNotDone(id));
        }

        let m = self.get_mut(id)?;
        m.apply_scores(update)?;
        m.done = update.done;
        if update.done {
            m.decide_winner(update.winner, ties)?;
        } else if let Some(side) = update.winner {
            m.aka_won = side == Side::Aka;
        }
        Ok(())
    }

    /// Drop every match from `len` on, clearing edges that pointed at them
    pub(crate) fn truncate(&mut self, len: usize) {
        if len >= self.matches.len() {
            return;
        }
        self.matches.truncate(len);
        self.predecessors.truncate(len);
        for preds in &mut self.predecessors {
            preds.retain(|p| p.0 < len);
        }
        for m in &mut self.matches {
            if m.winner_target.is_some_and(|t| t.0 >= len) {
                m.winner_target = None;
            }
            if m.loser_target.is_some_and(|t| t.0 >= len) {
                m.loser_target = None;
            }
        }
    }
}

#[cfg(test)]
#[path = "match_set_tests.rs"]
mod match_set_tests;
