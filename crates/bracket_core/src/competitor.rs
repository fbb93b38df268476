//! Competitor identity as seen by the bracket engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name shown for the disqualified placeholder
pub const DISQUALIFIED_NAME: &str = "DISQUALIFIED";

/// An entrant in a division.
///
/// The engine only ever compares competitors for equality and asks whether a
/// slot holds the disqualified placeholder. Everything else about a person
/// (age, rank, club) belongs to roster management.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Competitor {
    /// A registered entrant, identified by name
    Entrant(String),
    /// Placeholder standing in for a disqualified entrant downstream
    Disqualified,
}

impl Competitor {
    pub fn new(name: impl Into<String>) -> Self {
        Competitor::Entrant(name.into())
    }

    pub fn is_disqualified(&self) -> bool {
        matches!(self, Competitor::Disqualified)
    }

    pub fn name(&self) -> &str {
        match self {
            Competitor::Entrant(name) => name,
            Competitor::Disqualified => DISQUALIFIED_NAME,
        }
    }
}

impl fmt::Display for Competitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for Competitor {
    fn from(name: &str) -> Self {
        Competitor::new(name)
    }
}

impl From<String> for Competitor {
    fn from(name: String) -> Self {
        Competitor::Entrant(name)
    }
}
