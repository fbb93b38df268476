//! Errors raised by bracket mutations and lookups

use thiserror::Error;

use crate::bracket::BracketKind;
use crate::kata::{KataMatchId, RoundId};
use crate::matches::MatchId;

pub type Result<T> = std::result::Result<T, BracketError>;

/// Broad grouping of [`BracketError`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Wrong roster size, rebuilding a built bracket
    Build,
    /// Completing or editing a match out of order, touching locked rounds
    Editability,
    /// Score values the input layer should have caught
    Scoring,
    /// A tie the format has no rule for
    UnresolvedTie,
    /// Navigation outside the bracket
    Lookup,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BracketError {
    #[error("bracket has already been built")]
    AlreadyBuilt,
    #[error("bracket has not been built")]
    NotBuilt,
    #[error("{format} needs {expected} competitors, got {got}")]
    WrongEntrantCount {
        format: &'static str,
        expected: &'static str,
        got: usize,
    },
    #[error("competitor {0} is entered twice")]
    DuplicateEntrant(String),
    #[error("bracket is too big for {0} competitors")]
    BracketTooBig(usize),
    #[error("rounds should be a positive integer, got {0}")]
    InvalidRounds(u32),
    #[error("{0} brackets don't take late entrants")]
    LateEntryClosed(BracketKind),

    #[error("can't complete match {0} before its predecessors are complete")]
    PredecessorNotDone(MatchId),
    #[error("can't change match {0} while a match it feeds is complete")]
    SuccessorDone(MatchId),
    #[error("can't modify the people in match {0} because it is done")]
    MatchDone(MatchId),
    #[error("match {0} needs two competitors before it can be completed")]
    MissingSide(MatchId),
    #[error("{0} is locked")]
    RoundLocked(RoundId),
    #[error("{0} can't be swapped")]
    NotSwappable(String),
    #[error("can't swap a competitor with themselves")]
    SwapWithSelf,

    #[error("{0} is not a score between 0 and 10")]
    ScoreOutOfRange(f64),
    #[error("score {0} has more than one decimal place")]
    ScorePrecision(f64),
    #[error("set either all or none of the scores")]
    PartialScores,

    #[error("ties not permitted in match {0}")]
    TieNotPermitted(MatchId),
    #[error("ties not implemented")]
    UnresolvedTie,

    #[error("invalid round {0}")]
    InvalidRound(u32),
    #[error("invalid match index {0}")]
    InvalidMatchIndex(i32),
    #[error("no match {0}")]
    UnknownMatch(MatchId),
    #[error("no {0}")]
    UnknownRound(RoundId),
    #[error("no {0}")]
    UnknownKataMatch(KataMatchId),
    #[error("{0} is not entered in this bracket")]
    UnknownEntrant(String),
}

impl BracketError {
    pub fn category(&self) -> ErrorCategory {
        use BracketError::*;
        match self {
            AlreadyBuilt
            | NotBuilt
            | WrongEntrantCount { .. }
            | DuplicateEntrant(_)
            | BracketTooBig(_)
            | InvalidRounds(_)
            | LateEntryClosed(_) => ErrorCategory::Build,
            PredecessorNotDone(_)
            | SuccessorDone(_)
            | MatchDone(_)
            | MissingSide(_)
            | RoundLocked(_)
            | NotSwappable(_)
            | SwapWithSelf => ErrorCategory::Editability,
            ScoreOutOfRange(_) | ScorePrecision(_) | PartialScores => ErrorCategory::Scoring,
            TieNotPermitted(_) | UnresolvedTie => ErrorCategory::UnresolvedTie,
            InvalidRound(_)
            | InvalidMatchIndex(_)
            | UnknownMatch(_)
            | UnknownRound(_)
            | UnknownKataMatch(_)
            | UnknownEntrant(_) => ErrorCategory::Lookup,
        }
    }

    /// True when the caller can fix the request and retry, false when the
    /// request ran into a structural rule of the bracket.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Build | ErrorCategory::Scoring | ErrorCategory::Lookup
        )
    }
}
