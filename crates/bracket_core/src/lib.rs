//! Bracket engine for martial-arts tournaments
//!
//! This crate provides the state machines behind a division:
//! - Building a competition tree or fixed schedule from an ordered roster
//! - Propagating winners and losers between dependent matches
//! - Undoing or editing completed matches without corrupting later rounds
//! - Computing standings from partial or complete results
//!
//! Kumite formats (single elimination, two-person series, three-person round
//! robin) implement the [`Bracket`] trait. Kata uses the independent
//! [`KataBracket`] scoring ladder. [`Division`] picks the right one for a
//! roster.
//!
//! # Usage
//!
//! ```
//! use bracket_core::{Bracket, Competitor, EliminationBracket, MatchUpdate};
//!
//! let people: Vec<Competitor> = ["a", "b", "c", "d"].into_iter().map(Competitor::from).collect();
//! let mut bracket = EliminationBracket::new();
//! bracket.build(&people).unwrap();
//!
//! let first = bracket.get_next_match().unwrap().id;
//! bracket.save_match(first, MatchUpdate::done().points(3, 1)).unwrap();
//! ```

pub mod bracket;
pub mod competitor;
pub mod division;
pub mod elimination;
pub mod error;
pub mod kata;
pub mod match_set;
pub mod matches;
pub mod round_robin;
pub mod seeding;
pub mod two_person;

pub use bracket::*;
pub use competitor::*;
pub use division::*;
pub use elimination::*;
pub use error::*;
pub use kata::*;
pub use match_set::MatchSet;
pub use matches::*;
pub use round_robin::*;
pub use seeding::*;
pub use two_person::*;
