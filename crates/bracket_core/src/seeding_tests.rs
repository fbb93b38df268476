use super::*;

#[test]
fn test_seed_order_known_values() {
    assert_eq!(seed_order(1).unwrap(), vec![0, 1]);
    assert_eq!(seed_order(2).unwrap(), vec![0, 3, 1, 2]);
    assert_eq!(seed_order(3).unwrap(), vec![0, 7, 3, 4, 1, 6, 2, 5]);
}

#[test]
fn test_seed_order_is_permutation() {
    for rounds in 1..=6 {
        let mut order = seed_order(rounds).unwrap();
        order.sort_unstable();
        let expected: Vec<usize> = (0..1 << rounds).collect();
        assert_eq!(order, expected, "rounds = {}", rounds);
    }
}

#[test]
fn test_seed_order_pairs_top_with_bottom() {
    // Every first-round pair sums to the last seed index
    for rounds in 1..=5 {
        let order = seed_order(rounds).unwrap();
        let last = (1 << rounds) - 1;
        for pair in order.chunks(2) {
            assert_eq!(pair[0] + pair[1], last);
            assert!(pair[0] < pair[1]);
        }
    }
}

#[test]
fn test_seed_order_rejects_zero_rounds() {
    assert_eq!(seed_order(0), Err(BracketError::InvalidRounds(0)));
}

#[test]
fn test_rounds_for() {
    assert_eq!(rounds_for(2), 1);
    assert_eq!(rounds_for(4), 2);
    assert_eq!(rounds_for(5), 3);
    assert_eq!(rounds_for(8), 3);
    assert_eq!(rounds_for(9), 4);
}

#[test]
fn test_matches_in_round() {
    assert_eq!(matches_in_round(0), 1);
    assert_eq!(matches_in_round(1), 2);
    assert_eq!(matches_in_round(3), 8);
}
