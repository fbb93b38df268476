//! Seed order for single-elimination draws

use crate::error::{BracketError, Result};

/// Returns the order for assigning competitors to the first round.
///
/// `seed_order(2)` is `[0, 3, 1, 2]` for a four person bracket: the first
/// match is between competitors 0 and 3, the second between 1 and 2. Seed 0
/// always meets the lowest seed, and top seeds can't meet until the last
/// rounds.
///
/// # Errors
/// `InvalidRounds` if `rounds` is zero.
pub fn seed_order(rounds: u32) -> Result<Vec<usize>> {
    if rounds == 0 {
        return Err(BracketError::InvalidRounds(rounds));
    }

    let mut slots: Vec<usize> = vec![0, 1];
    for _ in 1..rounds {
        let upper = slots.iter().map(|&x| 2 * x);
        let lower = slots.iter().rev().map(|&x| 2 * x + 1);
        slots = upper.chain(lower).collect();
    }

    // Slot -> seed becomes seed -> slot
    let mut order: Vec<usize> = (0..slots.len()).collect();
    order.sort_by_key(|&k| slots[k]);
    Ok(order)
}

/// Number of rounds needed to seat `entrants` competitors, i.e. `ceil(log2 n)`.
pub fn rounds_for(entrants: usize) -> u32 {
    entrants.next_power_of_two().trailing_zeros()
}

/// Number of matches in a round, counting back from the final (round 0).
pub fn matches_in_round(round: u32) -> usize {
    1usize << round
}

#[cfg(test)]
#[path = "seeding_tests.rs"]
mod seeding_tests;
