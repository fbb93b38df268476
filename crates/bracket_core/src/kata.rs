//! Kata scoring ladder
//!
//! Every competitor performs once in round 0 and five judges score them.
//! Competitors level on the ranking perform again in a tie-break round, and
//! so on, until the podium is settled.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use crate::bracket::{atomically, check_roster, Placing};
use crate::competitor::Competitor;
use crate::error::{BracketError, Result};

/// Number of judges scoring a performance
pub const JUDGES: usize = 5;

/// Places awarded
pub const PODIUM: usize = 3;

/// A single judge's score, 0.0 to 10.0 with at most one decimal.
///
/// Stored as tenths so sums and comparisons are exact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Score(u16);

impl Score {
    pub const MAX_TENTHS: u16 = 100;

    pub fn new(value: f64) -> Result<Self> {
        if !(0.0..=10.0).contains(&value) {
            return Err(BracketError::ScoreOutOfRange(value));
        }
        let tenths = (value * 10.0).round();
        if tenths / 10.0 != value {
            return Err(BracketError::ScorePrecision(value));
        }
        Ok(Score(tenths as u16))
    }

    pub fn from_tenths(tenths: u16) -> Result<Self> {
        if tenths > Self::MAX_TENTHS {
            return Err(BracketError::ScoreOutOfRange(f64::from(tenths) / 10.0));
        }
        Ok(Score(tenths))
    }

    pub fn tenths(self) -> u16 {
        self.0
    }

    pub fn value(self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl TryFrom<f64> for Score {
    type Error = BracketError;

    fn try_from(value: f64) -> Result<Self> {
        Score::new(value)
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> f64 {
        score.value()
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

/// Parse a full judges' panel, e.g. from a score sheet.
pub fn scores_from(values: &[f64]) -> Result<[Option<Score>; JUDGES]> {
    if values.len() != JUDGES && !values.is_empty() {
        return Err(BracketError::PartialScores);
    }
    let mut scores = [None; JUDGES];
    for (slot, &value) in scores.iter_mut().zip(values) {
        *slot = Some(Score::new(value)?);
    }
    Ok(scores)
}

/// Result of one performance, ordered worst to best.
///
/// `combined` drops the best and worst judge; `tie` is the plain sum. Both are
/// in tenths. Anything scored beats anything unscored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Performance {
    #[default]
    Unscored,
    Scored { combined: u32, tie: u32 },
}

impl Performance {
    pub fn from_scores(scores: &[Score; JUDGES]) -> Self {
        let tenths = scores.iter().map(|s| u32::from(s.tenths()));
        let sum: u32 = tenths.clone().sum();
        let best = tenths.clone().max().unwrap_or(0);
        let worst = tenths.min().unwrap_or(0);
        Performance::Scored {
            combined: sum - best - worst,
            tie: sum,
        }
    }

    pub fn combined(self) -> Option<u32> {
        match self {
            Performance::Scored { combined, .. } => Some(combined),
            Performance::Unscored => None,
        }
    }

    pub fn tie(self) -> Option<u32> {
        match self {
            Performance::Scored { tie, .. } => Some(tie),
            Performance::Unscored => None,
        }
    }
}

/// Identity of a round. Never reused, so a respawned round gets a new id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoundId(pub u32);

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "round #{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KataMatchId {
    pub round: RoundId,
    /// Entry order within the round
    pub index: usize,
}

impl fmt::Display for KataMatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, performance {}", self.round, self.index + 1)
    }
}

/// One competitor's performance in one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KataMatch {
    pub id: KataMatchId,
    pub competitor: Competitor,
    pub scores: Option<[Score; JUDGES]>,
    pub performance: Performance,
}

impl KataMatch {
    fn new(id: KataMatchId, competitor: Competitor) -> Self {
        Self {
            id,
            competitor,
            scores: None,
            performance: Performance::Unscored,
        }
    }

    pub fn done(&self) -> bool {
        self.scores.is_some()
    }

    fn set_scores(&mut self, scores: Option<[Score; JUDGES]>) {
        self.scores = scores;
        self.performance = scores
            .as_ref()
            .map_or(Performance::Unscored, Performance::from_scores);
    }
}

/// Competitors performing against each other
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KataRound {
    pub id: RoundId,
    /// Depth in the ladder; 0 holds every entrant
    pub round: u32,
    /// Tie-break groups of the same depth count down from 0, best group first
    pub order: i32,
    pub prev_round: Option<RoundId>,
    /// Set while a later round has results that depend on this one
    pub locked: bool,
    /// How many places this round still has to settle
    pub n_winner_needed: usize,
    pub matches: Vec<KataMatch>,
}

impl KataRound {
    pub fn is_done(&self) -> bool {
        self.matches.iter().all(KataMatch::done)
    }

    pub fn is_started(&self) -> bool {
        self.matches.iter().any(KataMatch::done)
    }

    pub fn get_next_match(&self) -> Option<&KataMatch> {
        self.matches.iter().find(|m| !m.done())
    }

    pub fn competitors(&self) -> impl Iterator<Item = &Competitor> {
        self.matches.iter().map(|m| &m.competitor)
    }

    /// Matches best first; equal performances keep entry order
    pub fn ranked(&self) -> Vec<&KataMatch> {
        let mut ranked: Vec<&KataMatch> = self.matches.iter().collect();
        ranked.sort_by(|a, b| b.performance.cmp(&a.performance));
        ranked
    }

    /// Groups of competitors that still need a tie-break, paired with how
    /// many places each group decides.
    fn tie_groups(&self) -> Vec<(Vec<Competitor>, usize)> {
        let ranked = self.ranked();
        let mut groups = Vec::new();
        let mut batch: Vec<Competitor> = Vec::new();
        let mut placed = 0;
        for (i, m) in ranked.iter().enumerate() {
            batch.push(m.competitor.clone());
            let boundary = ranked
                .get(i + 1)
                .map_or(true, |next| next.performance < m.performance);
            if !boundary {
                continue;
            }

            let size = batch.len();
            if size > 1 {
                let needed = size.min(self.n_winner_needed - placed);
                groups.push((std::mem::take(&mut batch), needed));
            } else {
                batch.clear();
            }
            placed += size;
            if placed >= self.n_winner_needed {
                break;
            }
        }
        groups
    }
}

/// The kata ladder of one division
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KataBracket {
    rounds: Vec<KataRound>,
    next_round_id: u32,
}

impl KataBracket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_built(&self) -> bool {
        !self.rounds.is_empty()
    }

    /// Seat everyone in round 0
    pub fn build(&mut self, people: &[Competitor]) -> Result<()> {
        check_roster(self.is_built(), people)?;
        if people.is_empty() {
            return Err(BracketError::WrongEntrantCount {
                format: "kata",
                expected: "at least 1",
                got: 0,
            });
        }

        let id = self.spawn_round(0, 0, None, PODIUM.min(people.len()), people.to_vec());
        info!(entrants = people.len(), round = %id, "built kata bracket");
        Ok(())
    }

    /// Rounds in play order: by depth, then by `order`
    pub fn rounds(&self) -> Vec<&KataRound> {
        let mut rounds: Vec<&KataRound> = self.rounds.iter().collect();
        rounds.sort_by_key(|r| (r.round, r.order));
        rounds
    }

    pub fn round(&self, id: RoundId) -> Result<&KataRound> {
        self.rounds
            .iter()
            .find(|r| r.id == id)
            .ok_or(BracketError::UnknownRound(id))
    }

    fn round_mut(&mut self, id: RoundId) -> Result<&mut KataRound> {
        self.rounds
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(BracketError::UnknownRound(id))
    }

    pub fn first_round(&self) -> Option<&KataRound> {
        self.rounds.iter().find(|r| r.round == 0)
    }

    /// Number of round levels, counting the first
    pub fn n_round(&self) -> u32 {
        self.rounds.iter().map(|r| r.round + 1).max().unwrap_or(0)
    }

    pub fn get_match(&self, id: KataMatchId) -> Result<&KataMatch> {
        self.round(id.round)?
            .matches
            .get(id.index)
            .ok_or(BracketError::UnknownKataMatch(id))
    }

    /// The performance of `competitor` at depth `round`, if they reached it
    pub fn find_match(&self, round: u32, competitor: &Competitor) -> Option<&KataMatch> {
        self.rounds
            .iter()
            .filter(|r| r.round == round)
            .flat_map(|r| r.matches.iter())
            .find(|m| m.competitor == *competitor)
    }

    pub fn get_next_match(&self) -> Option<&KataMatch> {
        self.rounds().into_iter().find_map(KataRound::get_next_match)
    }

    /// The performance after the next one
    pub fn get_on_deck_match(&self) -> Option<&KataMatch> {
        self.rounds()
            .into_iter()
            .flat_map(|r| r.matches.iter())
            .filter(|m| !m.done())
            .nth(1)
    }

    /// Record a judges' panel for one performance, or clear it with all
    /// `None`. Scores must be all present or all absent.
    pub fn score_match(&mut self, id: KataMatchId, scores: [Option<Score>; JUDGES]) -> Result<()> {
        let scores = complete_panel(scores)?;
        atomically(self, |bracket| {
            let round = bracket.round_mut(id.round)?;
            if round.locked {
                return Err(BracketError::RoundLocked(id.round));
            }
            let m = round
                .matches
                .get_mut(id.index)
                .ok_or(BracketError::UnknownKataMatch(id))?;
            m.set_scores(scores);
            debug!(
                performance = %id,
                competitor = %m.competitor,
                combined = m.performance.combined(),
                "scored"
            );
            bracket.round_callback(id.round)
        })
    }

    /// Late arrival: seat `person` in round 0 while it is still open
    pub fn add_entrant(&mut self, person: Competitor) -> Result<KataMatchId> {
        atomically(self, |bracket| {
            let first = bracket
                .rounds
                .iter_mut()
                .find(|r| r.round == 0)
                .ok_or(BracketError::NotBuilt)?;
            if first.locked {
                return Err(BracketError::RoundLocked(first.id));
            }
            if first.competitors().any(|c| *c == person) {
                return Err(BracketError::DuplicateEntrant(person.to_string()));
            }

            let id = KataMatchId {
                round: first.id,
                index: first.matches.len(),
            };
            info!(competitor = %person, "late entrant");
            first.matches.push(KataMatch::new(id, person));
            first.n_winner_needed = PODIUM.min(first.matches.len());
            bracket.round_callback(id.round)?;
            Ok(id)
        })
    }

    /// Re-derive everything downstream of round `id`.
    ///
    /// Locks the previous round as soon as this one has a result, throws away
    /// any tie-break rounds spawned from an earlier state, and spawns fresh
    /// ones once every performance in this round is scored.
    fn round_callback(&mut self, id: RoundId) -> Result<()> {
        let round = self.round(id)?;
        if round.locked {
            return Err(BracketError::RoundLocked(id));
        }
        let started = round.is_started();
        if let Some(prev) = round.prev_round {
            let prev = self.round_mut(prev)?;
            if prev.locked != started {
                debug!(round = %prev.id, locked = started, "lock");
                prev.locked = started;
            }
        }

        self.delete_children(id);

        let round = self.round(id)?;
        if !round.is_done() {
            return Ok(());
        }
        let (depth, groups) = (round.round, round.tie_groups());
        for ((people, needed), order) in groups.into_iter().zip((0..).map(|k: i32| -k)) {
            self.spawn_round(depth + 1, order, Some(id), needed, people);
        }
        Ok(())
    }

    fn spawn_round(
        &mut self,
        round: u32,
        order: i32,
        prev_round: Option<RoundId>,
        n_winner_needed: usize,
        people: Vec<Competitor>,
    ) -> RoundId {
        let id = RoundId(self.next_round_id);
        self.next_round_id += 1;
        let matches = people
            .into_iter()
            .enumerate()
            .map(|(index, person)| KataMatch::new(KataMatchId { round: id, index }, person))
            .collect::<Vec<_>>();
        if prev_round.is_some() {
            debug!(round = %id, depth = round, order, entrants = matches.len(), n_winner_needed, "tie-break round");
        }
        self.rounds.push(KataRound {
            id,
            round,
            order,
            prev_round,
            locked: false,
            n_winner_needed,
            matches,
        });
        id
    }

    /// Remove every round descending from `id`
    fn delete_children(&mut self, id: RoundId) {
        let mut doomed = Vec::new();
        let mut stack = vec![id];
        while let Some(parent) = stack.pop() {
            for r in self.rounds.iter().filter(|r| r.prev_round == Some(parent)) {
                doomed.push(r.id);
                stack.push(r.id);
            }
        }
        if !doomed.is_empty() {
            self.rounds.retain(|r| !doomed.contains(&r.id));
        }
    }

    /// Standings with competition ranking: level competitors share a rank
    /// and the next rank is skipped.
    ///
    /// Competitors are compared on combined then tie score for each round
    /// depth in turn. Unfilled places up to the podium size are `None`.
    pub fn get_winners(&self) -> Vec<Placing> {
        let Some(first) = self.first_round() else {
            return Vec::new();
        };
        let depth = self.n_round() as usize;
        let n_winner = PODIUM.min(first.matches.len());

        let mut tally: Vec<(Competitor, Vec<u32>, usize)> = first
            .competitors()
            .map(|c| (c.clone(), vec![0; 2 * depth], 0))
            .collect();
        for round in &self.rounds {
            let r = round.round as usize;
            for m in &round.matches {
                let Performance::Scored { combined, tie } = m.performance else {
                    continue;
                };
                if let Some(entry) = tally.iter_mut().find(|(c, _, _)| *c == m.competitor) {
                    entry.1[2 * r] += combined;
                    entry.1[2 * r + 1] += tie;
                    entry.2 += 1;
                }
            }
        }
        tally.retain(|(_, _, appearances)| *appearances > 0);
        tally.sort_by(|a, b| b.1.cmp(&a.1));

        let mut winners = Vec::with_capacity(n_winner);
        let mut rank = 0;
        let mut n_tie = 0;
        let mut prev: Option<&Vec<u32>> = None;
        for (person, score, _) in &tally {
            n_tie += 1;
            if prev != Some(score) {
                rank += n_tie;
                n_tie = 0;
            }
            if rank > n_winner {
                break;
            }
            winners.push(Placing::new(rank as u32, Some(person.clone())));
            prev = Some(score);
        }
        for rank in winners.len() + 1..=n_winner {
            winners.push(Placing::new(rank as u32, None));
        }
        winners
    }
}

fn complete_panel(scores: [Option<Score>; JUDGES]) -> Result<Option<[Score; JUDGES]>> {
    if scores.iter().all(Option::is_none) {
        return Ok(None);
    }
    let mut panel = [Score::default(); JUDGES];
    for (slot, score) in panel.iter_mut().zip(scores) {
        *slot = score.ok_or(BracketError::PartialScores)?;
    }
    Ok(Some(panel))
}

#[cfg(test)]
#[path = "kata_tests.rs"]
mod kata_tests;
