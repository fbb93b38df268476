use super::*;

fn make_bracket() -> TwoPersonBracket {
    let mut bracket = TwoPersonBracket::new();
    bracket
        .build(&[Competitor::new("a"), Competitor::new("b")])
        .unwrap();
    bracket
}

fn names(m: &Match) -> (&str, &str) {
    (
        m.competitor(Side::Aka).unwrap().name(),
        m.competitor(Side::Shiro).unwrap().name(),
    )
}

#[test]
fn test_build() {
    let b = make_bracket();
    assert_eq!(b.matches().len(), 2);

    let m0 = b.matches().get(MatchId(0)).unwrap();
    let m1 = b.matches().get(MatchId(1)).unwrap();
    assert_eq!(names(m0), ("a", "b"));
    assert_eq!(names(m1), ("b", "a"));
    assert_eq!(m0.winner_target, Some(m1.id));
    assert_eq!(m0.loser_target, Some(m1.id));
    assert_eq!(b.get_winners(), vec![Placing::new(1, None), Placing::new(2, None)]);
}

#[test]
fn test_build_needs_two() {
    let mut b = TwoPersonBracket::new();
    assert!(matches!(
        b.build(&[Competitor::new("a")]),
        Err(BracketError::WrongEntrantCount { got: 1, .. })
    ));
    assert!(!b.is_built());
}

#[test]
fn test_second_match_waits_for_first() {
    let mut b = make_bracket();
    assert_eq!(
        b.save_match(MatchId(1), MatchUpdate::done().points(1, 0)),
        Err(BracketError::PredecessorNotDone(MatchId(1)))
    );
    assert_eq!(b.get_next_match().map(|m| m.id), Some(MatchId(0)));
}

#[test]
fn test_one_match_never_decides() {
    let mut b = make_bracket();
    b.save_match(MatchId(0), MatchUpdate::done().points(8, 0)).unwrap();
    assert_eq!(b.winner(), None);
    assert_eq!(b.get_next_match().map(|m| m.id), Some(MatchId(1)));
}

#[test]
fn test_series_winner() {
    let mut b = make_bracket();
    b.save_match(MatchId(0), MatchUpdate::done().points(3, 1)).unwrap();
    // b is aka in the second match
    b.save_match(MatchId(1), MatchUpdate::done().points(0, 2)).unwrap();

    assert_eq!(b.winner(), Some(&Competitor::new("a")));
    assert_eq!(b.loser(), Some(&Competitor::new("b")));
    assert!(b.get_next_match().is_none());
}

#[test]
fn test_drawn_match_allowed() {
    let mut b = make_bracket();
    b.save_match(MatchId(0), MatchUpdate::done().points(1, 1)).unwrap();
    assert!(b.matches().get(MatchId(0)).unwrap().done);
}

#[test]
fn test_tie_break_chain() {
    let mut b = make_bracket();
    b.save_match(MatchId(0), MatchUpdate::done().points(2, 1)).unwrap();
    b.save_match(MatchId(1), MatchUpdate::done().points(1, 0)).unwrap();

    // 2 - 2 overall
    assert_eq!(b.matches().len(), 3);
    assert_eq!(b.winner(), None);
    let tie_break = b.matches().get(MatchId(2)).unwrap();
    assert_eq!(tie_break.order, 2);
    assert_eq!(names(tie_break), ("a", "b"));
    let m1 = b.matches().get(MatchId(1)).unwrap();
    assert_eq!(m1.winner_target, Some(MatchId(2)));
    assert_eq!(m1.loser_target, Some(MatchId(2)));

    // Still level after sudden death
    b.save_match(MatchId(2), MatchUpdate::done().points(0, 0)).unwrap();
    assert_eq!(b.matches().len(), 4);
    assert_eq!(names(b.matches().get(MatchId(3)).unwrap()), ("b", "a"));

    b.save_match(MatchId(3), MatchUpdate::done().points(1, 0)).unwrap();
    assert_eq!(b.winner(), Some(&Competitor::new("b")));
    assert_eq!(b.loser(), Some(&Competitor::new("a")));
    assert_eq!(b.matches().len(), 4);
}

#[test]
fn test_trailing_matches_discarded() {
    let mut b = make_bracket();
    b.save_match(MatchId(0), MatchUpdate::done().points(2, 1)).unwrap();
    b.save_match(MatchId(1), MatchUpdate::done().points(1, 0)).unwrap();
    assert_eq!(b.matches().len(), 3);

    // Correcting the second match settles the series
    b.save_match(MatchId(1), MatchUpdate::done().points(3, 0)).unwrap();
    assert_eq!(b.matches().len(), 2);
    assert_eq!(b.winner(), Some(&Competitor::new("b")));
    let m1 = b.matches().get(MatchId(1)).unwrap();
    assert_eq!(m1.winner_target, None);
    assert_eq!(m1.loser_target, None);
}

#[test]
fn test_edit_blocked_by_tie_break_result() {
    let mut b = make_bracket();
    b.save_match(MatchId(0), MatchUpdate::done().points(1, 0)).unwrap();
    b.save_match(MatchId(1), MatchUpdate::done().points(1, 0)).unwrap();
    b.save_match(MatchId(2), MatchUpdate::done().points(0, 1)).unwrap();

    assert_eq!(
        b.save_match(MatchId(1), MatchUpdate::reopen()),
        Err(BracketError::SuccessorDone(MatchId(1)))
    );
}

#[test]
fn test_disqualification_ends_series() {
    let mut b = make_bracket();
    b.save_match(MatchId(0), MatchUpdate::done().points(4, 0).disqualify(Side::Aka))
        .unwrap();

    assert_eq!(b.winner(), Some(&Competitor::new("b")));
    assert_eq!(b.loser(), Some(&Competitor::Disqualified));
    assert_eq!(b.matches().len(), 1);

    // Reinstating reopens the series with a fresh second match
    b.save_match(MatchId(0), MatchUpdate::done().reinstate(Side::Aka))
        .unwrap();
    assert_eq!(b.winner(), None);
    assert_eq!(b.matches().len(), 2);
    assert_eq!(names(b.matches().get(MatchId(1)).unwrap()), ("b", "a"));
}

#[test]
fn test_both_disqualified() {
    let mut b = make_bracket();
    b.save_match(
        MatchId(0),
        MatchUpdate::done()
            .disqualify(Side::Aka)
            .disqualify(Side::Shiro),
    )
    .unwrap();
    assert_eq!(b.winner(), Some(&Competitor::Disqualified));
    assert_eq!(b.loser(), Some(&Competitor::Disqualified));
}

#[test]
fn test_get_match() {
    let b = make_bracket();
    assert_eq!(b.get_match(0, 1).unwrap().map(|m| m.id), Some(MatchId(1)));
    assert_eq!(b.get_match(0, 5).unwrap(), None);
    assert_eq!(b.get_match(1, 0), Err(BracketError::InvalidRound(1)));
}
