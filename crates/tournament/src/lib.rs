//! Tournament runner for dojo-tournament
//!
//! This crate provides infrastructure for:
//! - Loading a tournament day from a TOML scenario
//! - Building every division and entering its scripted results
//! - Saving the bracket state and generating standings reports
//!
//! # Usage
//!
//! ```bash
//! # Run a scenario and keep the results
//! cargo run -p tournament -- run scenarios/spring_open.toml --out results.json
//!
//! # Random draw, reproducible with a seed
//! cargo run -p tournament -- run scenarios/spring_open.toml --shuffle --seed 7
//!
//! # Print a saved report
//! cargo run -p tournament -- report results.json
//! ```

mod results;
mod runner;
mod scenario;

pub use results::*;
pub use runner::*;
pub use scenario::*;
